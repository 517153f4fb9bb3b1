//! # lazycurve
//!
//! Lazy market-data propagation for term structures and bootstrap helpers.
//!
//! Market quotes, curves and instruments form a dependency graph.  Changing
//! a quote only flips dirty flags downstream; every curve and instrument
//! recomputes on its next query, and at most once per change.
//!
//! This crate is a **façade** that re-exports the `lc-*` workspace crates.
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use lazycurve::quotes::SimpleQuote;
//! use lazycurve::termstructures::{CapVolatilityStructure, CapVolatilityVector};
//! use lazycurve::time::{Actual365Fixed, BusinessDayConvention, Date, NullCalendar, Period};
//!
//! let tenors: Vec<Period> = ["1Y", "2Y", "3Y", "5Y"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! let two_year = SimpleQuote::new(0.22);
//! let quotes = vec![
//!     SimpleQuote::new(0.20).handle(),
//!     two_year.handle(),
//!     SimpleQuote::new(0.21).handle(),
//!     SimpleQuote::new(0.23).handle(),
//! ];
//! let curve = CapVolatilityVector::fixed_with_quotes(
//!     Date::from_ymd(2024, 1, 15).unwrap(),
//!     Rc::new(NullCalendar),
//!     tenors,
//!     quotes,
//!     BusinessDayConvention::Following,
//!     Rc::new(Actual365Fixed),
//! )
//! .unwrap();
//!
//! let two_years = Date::from_ymd(2026, 1, 15).unwrap();
//! assert!((curve.volatility_at_date(two_years).unwrap() - 0.22).abs() < 1e-12);
//!
//! two_year.set_value(0.25).unwrap();
//! assert!((curve.volatility_at_date(two_years).unwrap() - 0.25).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Observer, lazy-object and handle machinery; errors and type aliases.
pub use lc_core as core;

/// Dates, calendars, day counters, schedules and session settings.
pub use lc_time as time;

/// Interpolation.
pub use lc_math as math;

/// Market quotes.
pub use lc_quotes as quotes;

/// Yield and cap-volatility term structures.
pub use lc_termstructures as termstructures;

/// Cash flows and coupons.
pub use lc_cashflows as cashflows;

/// Lazily priced instruments.
pub use lc_instruments as instruments;

/// Pricing engines.
pub use lc_pricingengines as pricingengines;

/// Bootstrap helpers.
pub use lc_bootstrap as bootstrap;
