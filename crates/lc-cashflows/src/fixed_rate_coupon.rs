//! Fixed-rate coupons and leg builders.

use std::rc::Rc;

use lc_core::errors::Result;
use lc_core::{ensure, Rate, Real};
use lc_time::{BusinessDayConvention, Date, DayCounter, Schedule, Thirty360};

use crate::cashflow::{CashFlow, Leg, Redemption};
use crate::coupon::Coupon;

/// A coupon paying a fixed, simply-compounded rate.
#[derive(Debug, Clone)]
pub struct FixedRateCoupon {
    nominal: Real,
    payment_date: Date,
    rate: Rate,
    day_counter: Rc<dyn DayCounter>,
    accrual_start: Date,
    accrual_end: Date,
    ref_start: Date,
    ref_end: Date,
}

impl FixedRateCoupon {
    /// Create a coupon whose reference period equals its accrual period.
    pub fn new(
        payment_date: Date,
        nominal: Real,
        rate: Rate,
        day_counter: Rc<dyn DayCounter>,
        accrual_start: Date,
        accrual_end: Date,
    ) -> Self {
        Self {
            nominal,
            payment_date,
            rate,
            day_counter,
            accrual_start,
            accrual_end,
            ref_start: accrual_start,
            ref_end: accrual_end,
        }
    }

    /// Set an explicit reference period (for irregular coupons).
    pub fn with_reference_period(mut self, start: Date, end: Date) -> Self {
        self.ref_start = start;
        self.ref_end = end;
        self
    }
}

impl CashFlow for FixedRateCoupon {
    fn date(&self) -> Date {
        self.payment_date
    }

    fn amount(&self) -> Real {
        self.nominal * self.rate * self.accrual_period()
    }

    fn as_coupon(&self) -> Option<&dyn Coupon> {
        Some(self)
    }
}

impl Coupon for FixedRateCoupon {
    fn nominal(&self) -> Real {
        self.nominal
    }

    fn accrual_start_date(&self) -> Date {
        self.accrual_start
    }

    fn accrual_end_date(&self) -> Date {
        self.accrual_end
    }

    fn reference_period_start(&self) -> Date {
        self.ref_start
    }

    fn reference_period_end(&self) -> Date {
        self.ref_end
    }

    fn day_counter(&self) -> &dyn DayCounter {
        self.day_counter.as_ref()
    }

    fn rate(&self) -> Rate {
        self.rate
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixed-rate leg builder
// ────────────────────────────────────────────────────────────────────────────

/// Build a fixed-rate leg from a schedule.
///
/// Rates given as a vector apply period by period; the last value is
/// repeated for the remaining periods.
#[derive(Debug)]
pub struct FixedRateLegBuilder<'a> {
    schedule: &'a Schedule,
    notional: Real,
    coupon_rates: Vec<Rate>,
    day_counter: Rc<dyn DayCounter>,
    payment_convention: BusinessDayConvention,
    redemption: Option<Real>,
}

impl<'a> FixedRateLegBuilder<'a> {
    /// Start building a leg on `schedule`.  Defaults: notional 100,
    /// 30/360, `Following` payment adjustment, no redemption.
    pub fn new(schedule: &'a Schedule) -> Self {
        Self {
            schedule,
            notional: 100.0,
            coupon_rates: Vec::new(),
            day_counter: Rc::new(Thirty360),
            payment_convention: BusinessDayConvention::Following,
            redemption: None,
        }
    }

    /// Set the notional of every period.
    pub fn with_notional(mut self, notional: Real) -> Self {
        self.notional = notional;
        self
    }

    /// Set a single coupon rate for all periods.
    pub fn with_coupon_rate(mut self, rate: Rate) -> Self {
        self.coupon_rates = vec![rate];
        self
    }

    /// Set coupon rates per period.
    pub fn with_coupon_rates(mut self, rates: Vec<Rate>) -> Self {
        self.coupon_rates = rates;
        self
    }

    /// Set the accrual day counter.
    pub fn with_day_counter(mut self, day_counter: Rc<dyn DayCounter>) -> Self {
        self.day_counter = day_counter;
        self
    }

    /// Set the payment business-day convention.
    pub fn with_payment_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.payment_convention = convention;
        self
    }

    /// Add a final redemption of `amount`, paid with the last coupon.
    pub fn with_redemption(mut self, amount: Real) -> Self {
        self.redemption = Some(amount);
        self
    }

    /// Build the leg.
    ///
    /// # Errors
    /// Fails if no coupon rate was given or if more rates than periods were
    /// given.
    pub fn build(self) -> Result<Leg> {
        let periods = self.schedule.len().saturating_sub(1);
        ensure!(!self.coupon_rates.is_empty(), "no coupon rates given");
        ensure!(
            self.coupon_rates.len() <= periods,
            "too many coupon rates ({}) for {periods} periods",
            self.coupon_rates.len()
        );

        let calendar = self.schedule.calendar();
        let tenor = self.schedule.tenor();
        let mut leg: Leg = Vec::with_capacity(periods + 1);
        for (i, (start, end)) in self.schedule.periods().enumerate() {
            let rate = self.coupon_rates[i.min(self.coupon_rates.len() - 1)];
            let payment_date = calendar.adjust(end, self.payment_convention);
            let mut coupon = FixedRateCoupon::new(
                payment_date,
                self.notional,
                rate,
                Rc::clone(&self.day_counter),
                start,
                end,
            );
            if !self.schedule.is_regular(i) && tenor.length > 0 {
                // Stubs accrue against a full-length notional period.
                coupon = if i == 0 {
                    let ref_start = end.advance(-tenor.length, tenor.unit)?;
                    coupon.with_reference_period(ref_start, end)
                } else {
                    let ref_end = start.advance_by(tenor)?;
                    coupon.with_reference_period(start, ref_end)
                };
            }
            leg.push(Rc::new(coupon));
        }

        if let (Some(amount), Some(&last)) = (self.redemption, self.schedule.dates().last()) {
            let payment_date = calendar.adjust(last, self.payment_convention);
            leg.push(Rc::new(Redemption::new(amount, payment_date)));
        }
        Ok(leg)
    }
}
