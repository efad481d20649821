//! Test doubles for code that talks to a chain node.

pub mod faults;
pub mod toy_chain;

pub use faults::{FaultyToyChain, TestFault};
pub use toy_chain::{toy_hash, ToyChain, ToyChainBuilder};
