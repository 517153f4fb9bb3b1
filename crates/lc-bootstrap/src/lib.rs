//! # lc-bootstrap
//!
//! Bootstrap helpers: adapters that turn a calibrating instrument into a
//! model-implied quote for an external curve-fitting solver.
//!
//! A helper is bound to the solver's trial curve through a handle that does
//! **not** observe the curve.  The solver moves the curve many times per
//! pillar and asks for a fresh [`implied_quote`][BootstrapHelper::implied_quote]
//! only when it needs one.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bond_helper;
pub mod bootstrap_helper;

pub use bond_helper::FixedRateBondHelper;
pub use bootstrap_helper::{
    check_distinct_latest_dates, sort_helpers_by_latest_date, BootstrapHelper,
};
