//! `VolatilityTermStructure`: base trait for volatility term structures.
//!
//! Extends [`TermStructure`] with the business-day convention used to turn
//! option tenors into expiry dates.

use lc_core::errors::Result;
use lc_time::{BusinessDayConvention, Date, Period};

use crate::term_structure::TermStructure;

/// Base trait for all volatility term structures.
pub trait VolatilityTermStructure: TermStructure {
    /// The business-day convention used for option-expiry adjustments.
    fn business_day_convention(&self) -> BusinessDayConvention;

    /// The expiry date of an option with the given tenor: the reference date
    /// advanced by `tenor` on the curve's calendar.
    fn option_date_from_tenor(&self, tenor: Period) -> Result<Date> {
        self.calendar()
            .advance_by(self.reference_date()?, tenor, self.business_day_convention())
    }
}
