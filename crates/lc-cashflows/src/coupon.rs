//! `Coupon` trait: base for all interest-rate coupons.
//!
//! A coupon accrues interest over `[accrual_start, accrual_end)` and pays on
//! its payment date.

use lc_core::{Rate, Real, Time};
use lc_time::{Date, DayCounter};

use crate::cashflow::CashFlow;

/// Base trait for interest-rate coupons.
pub trait Coupon: CashFlow {
    /// The notional (face) amount.
    fn nominal(&self) -> Real;

    /// Start of the accrual period.
    fn accrual_start_date(&self) -> Date;

    /// End of the accrual period.
    fn accrual_end_date(&self) -> Date;

    /// Reference period start (differs from the accrual start for stubs).
    fn reference_period_start(&self) -> Date {
        self.accrual_start_date()
    }

    /// Reference period end (differs from the accrual end for stubs).
    fn reference_period_end(&self) -> Date {
        self.accrual_end_date()
    }

    /// The day counter used for accrual.
    fn day_counter(&self) -> &dyn DayCounter;

    /// The annualized rate of the coupon.
    fn rate(&self) -> Rate;

    /// The accrual period as a year fraction.
    fn accrual_period(&self) -> Time {
        self.accrual_period_to(self.accrual_end_date())
    }

    /// Year fraction accrued from the accrual start up to `date`, capped at
    /// the accrual end.
    fn accrual_period_to(&self, date: Date) -> Time {
        let end = date.min(self.accrual_end_date());
        self.day_counter().year_fraction_with_ref(
            self.accrual_start_date(),
            end,
            self.reference_period_start(),
            self.reference_period_end(),
        )
    }

    /// Interest accrued up to `date`.
    ///
    /// Zero outside `(accrual_start, payment_date]`.
    fn accrued_amount(&self, date: Date) -> Real {
        if date <= self.accrual_start_date() || date > self.date() {
            return 0.0;
        }
        self.nominal() * self.rate() * self.accrual_period_to(date)
    }
}
