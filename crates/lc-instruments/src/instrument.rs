//! `Instrument` and `PricingEngine` base traits.
//!
//! An instrument is a lazy object: it caches the results of its pricing
//! engine and is marked dirty when the engine (or anything else it observes)
//! changes.  Engines are observable so that relinking the curves they price
//! on reaches the instruments using them.

use lc_core::errors::Result;
use lc_core::patterns::lazy_object::LazyObject;
use lc_core::patterns::observable::Observable;
use lc_core::Real;
use lc_time::Date;

/// Results of pricing an instrument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingResults {
    /// Net present value as of the pricing curve's reference date.
    pub value: Real,
    /// Value as of the instrument's settlement date, when the engine
    /// provides it.
    pub settlement_value: Option<Real>,
}

impl PricingResults {
    /// Results holding just a value.
    pub fn from_value(value: Real) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Set the settlement value.
    pub fn with_settlement_value(mut self, value: Real) -> Self {
        self.settlement_value = Some(value);
        self
    }
}

/// A pricing engine computes [`PricingResults`] from an instrument's
/// arguments.
pub trait PricingEngine<Args>: Observable + std::fmt::Debug {
    /// Price the instrument described by `args`.
    fn calculate(&self, args: &Args) -> Result<PricingResults>;
}

/// Base trait for all financial instruments.
pub trait Instrument: LazyObject + std::fmt::Debug {
    /// Net present value, recalculated first if stale.
    fn npv(&self) -> Result<Real>;

    /// Whether every cash flow has been paid as of the evaluation date.
    fn is_expired(&self) -> bool;

    /// The maturity or last relevant date.
    fn maturity_date(&self) -> Option<Date> {
        None
    }
}
