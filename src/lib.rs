#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]

extern crate alloc;

pub mod compare;
pub use compare::Comparator;

mod node;
pub use node::{Color, NodeRef};

mod tree;
pub use tree::RbTree;

mod iter;
pub use iter::Iter;

mod balance;
mod validate;
