//! `CapVolatilityStructure`: flat cap/floor volatilities by option time.

use lc_core::errors::Result;
use lc_core::{Time, Volatility};
use lc_time::{Date, Period};

use crate::volatility_term_structure::VolatilityTermStructure;

/// A term structure of flat cap/floor volatilities.
///
/// Implementors provide [`volatility_impl`][Self::volatility_impl]; the
/// public accessors check the query range first.
pub trait CapVolatilityStructure: VolatilityTermStructure {
    /// Volatility at time `t`, without range checks.
    fn volatility_impl(&self, t: Time) -> Result<Volatility>;

    /// Volatility at time `t`.
    fn volatility(&self, t: Time) -> Result<Volatility> {
        self.volatility_with(t, false)
    }

    /// Volatility at time `t`, allowing extrapolation past the last option
    /// time if `extrapolate` is set.
    fn volatility_with(&self, t: Time, extrapolate: bool) -> Result<Volatility> {
        self.check_range(t, extrapolate)?;
        self.volatility_impl(t)
    }

    /// Volatility for an option expiring on `date`.
    fn volatility_at_date(&self, date: Date) -> Result<Volatility> {
        self.volatility(self.time_from_reference(date)?)
    }

    /// Volatility for an option with the given tenor.
    fn volatility_for_tenor(&self, tenor: Period) -> Result<Volatility> {
        self.volatility_at_date(self.option_date_from_tenor(tenor)?)
    }
}
