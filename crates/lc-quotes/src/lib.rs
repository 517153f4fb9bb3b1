//! # lc-quotes
//!
//! Observable market quotes.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `Quote` trait and concrete implementations.
pub mod quote;

pub use quote::{Quote, SimpleQuote};
