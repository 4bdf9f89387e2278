//! # qc-quotes
//!
//! Observable market quotes: the leaf inputs of the dependency graph.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Quote trait and the settable `SimpleQuote`.
pub mod quote;

pub use quote::{Quote, SimpleQuote};
