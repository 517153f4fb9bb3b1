//! `FlatForward`: a yield term structure with a constant forward rate.
//!
//! The rate is read from a quote handle on every query, so moving the quote
//! moves the curve.  The curve forwards the handle's notifications to its own
//! observers.

use std::rc::Rc;

use lc_core::errors::Result;
use lc_core::handle::Handle;
use lc_core::patterns::observable::{register_with, Observable, ObservableImpl, Observer};
use lc_core::{DiscountFactor, Rate, Time};
use lc_quotes::{Quote, SimpleQuote};
use lc_time::{Calendar, Date, DayCounter, NullCalendar};

use crate::term_structure::{ReferenceDate, TermStructure, TermStructureBase};
use crate::yield_term_structure::YieldTermStructure;

/// A flat, continuously-compounded yield curve.
///
/// `P(t) = exp(-r t)`, where `r` is the current value of the rate quote.
#[derive(Debug)]
pub struct FlatForward {
    base: TermStructureBase,
    rate: Handle<dyn Quote>,
    observers: ObservableImpl,
}

impl FlatForward {
    /// Create a curve following the quote behind `rate`.
    pub fn new(
        reference: ReferenceDate,
        rate: Handle<dyn Quote>,
        day_counter: Rc<dyn DayCounter>,
    ) -> Rc<Self> {
        Self::with_calendar(reference, rate, Rc::new(NullCalendar), day_counter)
    }

    /// Create a curve with an explicit calendar, used to roll a floating
    /// reference date.
    pub fn with_calendar(
        reference: ReferenceDate,
        rate: Handle<dyn Quote>,
        calendar: Rc<dyn Calendar>,
        day_counter: Rc<dyn DayCounter>,
    ) -> Rc<Self> {
        let curve = Rc::new(Self {
            base: TermStructureBase::new(reference, calendar, day_counter),
            rate,
            observers: ObservableImpl::new(),
        });
        register_with(&curve, &curve.rate);
        curve.base.observe_evaluation_date(&curve);
        curve
    }

    /// A curve at a fixed rate, anchored at `reference_date`.
    pub fn with_rate(
        reference_date: Date,
        rate: Rate,
        day_counter: Rc<dyn DayCounter>,
    ) -> Rc<Self> {
        Self::new(
            ReferenceDate::Fixed(reference_date),
            SimpleQuote::new(rate).handle(),
            day_counter,
        )
    }

    /// The current continuously-compounded rate.
    pub fn rate(&self) -> Result<Rate> {
        self.rate.current()?.require_value()
    }
}

impl Observable for FlatForward {
    fn observers(&self) -> &ObservableImpl {
        &self.observers
    }
}

impl Observer for FlatForward {
    fn update(&self) -> Result<()> {
        self.notify_observers()
    }
}

impl TermStructure for FlatForward {
    fn base(&self) -> &TermStructureBase {
        &self.base
    }

    fn max_date(&self) -> Result<Date> {
        Ok(Date::max_date())
    }
}

impl YieldTermStructure for FlatForward {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        Ok((-self.rate()? * t).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lc_core::patterns::observable::Flag;
    use lc_time::{Actual365Fixed, Settings};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn discount_is_exponential() {
        let curve = FlatForward::with_rate(date(2024, 1, 15), 0.05, Rc::new(Actual365Fixed));
        assert_abs_diff_eq!(curve.discount(0.0).unwrap(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.discount(2.0).unwrap(), (-0.1f64).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(
            curve.discount_date(date(2025, 1, 14)).unwrap(),
            (-0.05f64).exp(),
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(curve.zero_rate(3.0).unwrap(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn rejects_negative_times() {
        let curve = FlatForward::with_rate(date(2024, 1, 15), 0.05, Rc::new(Actual365Fixed));
        assert!(curve.discount(-0.5).unwrap_err().is_configuration());
        assert!(curve.discount_date(date(2023, 1, 15)).is_err());
    }

    #[test]
    fn follows_rate_quote() {
        let rate = SimpleQuote::new(0.03);
        let curve = FlatForward::new(
            ReferenceDate::Fixed(date(2024, 1, 15)),
            rate.handle(),
            Rc::new(Actual365Fixed),
        );
        let flag = Flag::new();
        register_with(&flag, &*curve);

        rate.set_value(0.04).unwrap();
        assert!(flag.is_up());
        assert_abs_diff_eq!(curve.discount(1.0).unwrap(), (-0.04f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn unset_rate_is_not_ready() {
        let curve = FlatForward::new(
            ReferenceDate::Fixed(date(2024, 1, 15)),
            SimpleQuote::empty().handle(),
            Rc::new(Actual365Fixed),
        );
        assert!(curve.discount(1.0).unwrap_err().is_state_ordering());
    }

    #[test]
    fn floating_curve_moves_with_evaluation_date() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let curve = FlatForward::new(
            ReferenceDate::floating(0, &settings),
            SimpleQuote::new(0.05).handle(),
            Rc::new(Actual365Fixed),
        );
        let flag = Flag::new();
        register_with(&flag, &*curve);

        settings.set_evaluation_date(date(2024, 7, 1)).unwrap();
        assert!(flag.is_up());
        assert_eq!(curve.reference_date().unwrap(), date(2024, 7, 1));
    }
}
