//! `YieldTermStructure`: interest-rate term structures.
//!
//! Implementors provide [`discount_impl`][YieldTermStructure::discount_impl];
//! range checking, date conversion and zero rates are derived from it.

use lc_core::errors::Result;
use lc_core::{DiscountFactor, Rate, Time};
use lc_time::Date;

use crate::term_structure::TermStructure;

/// A yield (discount) term structure.
pub trait YieldTermStructure: TermStructure {
    /// Discount factor for time `t`, without range checks.
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor>;

    /// Discount factor for time `t`.
    fn discount(&self, t: Time) -> Result<DiscountFactor> {
        self.check_range(t, false)?;
        self.discount_impl(t)
    }

    /// Discount factor for a date.
    fn discount_date(&self, date: Date) -> Result<DiscountFactor> {
        self.discount(self.time_from_reference(date)?)
    }

    /// Continuously-compounded zero rate for time `t`.
    ///
    /// At `t = 0` the rate over the first hundredth of a year is returned.
    fn zero_rate(&self, t: Time) -> Result<Rate> {
        let t = if t == 0.0 { DT } else { t };
        Ok(-self.discount(t)?.ln() / t)
    }
}

const DT: Time = 0.01;
