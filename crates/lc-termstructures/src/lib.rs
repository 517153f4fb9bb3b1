//! # lc-termstructures
//!
//! Term structures: the common reference-date machinery, a flat yield curve
//! driven by a rate quote, and the interpolated cap-volatility vector.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `TermStructure`: base trait and shared reference-date state.
pub mod term_structure;

/// `YieldTermStructure`: discount curves.
pub mod yield_term_structure;

/// `FlatForward`: constant continuously-compounded rate curve.
pub mod flat_forward;

/// `VolatilityTermStructure`: base trait for volatility term structures.
pub mod volatility_term_structure;

/// `CapVolatilityStructure`: term structures of cap/floor volatilities.
pub mod cap_volatility_structure;

/// `CapVolatilityVector`: cap volatilities interpolated over option tenors.
pub mod cap_volatility_vector;

/// Declarative construction of cap-volatility vectors.
pub mod config;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use cap_volatility_structure::CapVolatilityStructure;
pub use cap_volatility_vector::{CapVolatilityVector, VolatilityInputs};
pub use config::{CalendarId, CapVolatilityConfig, DayCounterId, ReferenceConfig};
pub use flat_forward::FlatForward;
pub use term_structure::{ReferenceDate, TermStructure, TermStructureBase};
pub use volatility_term_structure::VolatilityTermStructure;
pub use yield_term_structure::YieldTermStructure;
