//! # lc-pricingengines
//!
//! Pricing engines for the instruments in `lc-instruments`.
//!
//! - [`DiscountingBondEngine`]: discounted cash flows on a yield curve handle

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod discounting_bond_engine;

pub use discounting_bond_engine::DiscountingBondEngine;
