//! # lc-instruments
//!
//! Instruments priced lazily by pluggable pricing engines.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bond;
pub mod instrument;

pub use bond::{fixed_rate_bond, Bond, BondArguments};
pub use instrument::{Instrument, PricingEngine, PricingResults};
