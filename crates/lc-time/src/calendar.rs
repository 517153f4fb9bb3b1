//! `Calendar` trait and the two trivial calendars.
//!
//! A calendar knows which dates are business days; everything else (date
//! adjustment, advancing by a period, business-day counting) is derived from
//! that single predicate.

use lc_core::errors::Result;

use crate::business_day_convention::BusinessDayConvention;
use crate::date::Date;
use crate::period::Period;
use crate::time_unit::TimeUnit;

/// A financial calendar.
pub trait Calendar: std::fmt::Debug {
    /// Human-readable name (e.g. `"TARGET"`).
    fn name(&self) -> &str;

    /// Return `true` if `date` is a business day in this calendar.
    fn is_business_day(&self, date: Date) -> bool;

    /// Return `true` if `date` is a holiday (non-business) day.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Return `true` if `date` is the last business day of its month.
    fn is_end_of_month(&self, date: Date) -> bool {
        date.month() != self.adjust(date + 1, BusinessDayConvention::Following).month()
    }

    /// Return the last business day of the month containing `date`.
    fn end_of_month(&self, date: Date) -> Date {
        self.adjust(date.end_of_month(), BusinessDayConvention::Preceding)
    }

    /// Adjust `date` according to the given business-day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        let roll = |mut d: Date, step: i64| {
            while self.is_holiday(d) {
                d = d + step;
            }
            d
        };
        match convention {
            BusinessDayConvention::Unadjusted => date,
            BusinessDayConvention::Following => roll(date, 1),
            BusinessDayConvention::Preceding => roll(date, -1),
            BusinessDayConvention::ModifiedFollowing => {
                let adjusted = roll(date, 1);
                if adjusted.month() != date.month() {
                    roll(date, -1)
                } else {
                    adjusted
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let adjusted = roll(date, -1);
                if adjusted.month() != date.month() {
                    roll(date, 1)
                } else {
                    adjusted
                }
            }
            BusinessDayConvention::Nearest => {
                let forward = roll(date, 1);
                let backward = roll(date, -1);
                if forward - date <= date - backward {
                    forward
                } else {
                    backward
                }
            }
        }
    }

    /// Advance `date` by `n` units.
    ///
    /// Day steps count business days.  Week steps move in calendar time and
    /// adjust.  Month and year steps move in calendar time too; with
    /// `end_of_month` set, a start on the last business day of a month lands
    /// on the last business day of the target month.
    fn advance(
        &self,
        date: Date,
        n: i32,
        unit: TimeUnit,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> Result<Date> {
        if n == 0 {
            return Ok(self.adjust(date, convention));
        }
        match unit {
            TimeUnit::Days => {
                let step: i64 = if n > 0 { 1 } else { -1 };
                let mut d = date;
                for _ in 0..n.unsigned_abs() {
                    d = d.add_days(step)?;
                    while self.is_holiday(d) {
                        d = d.add_days(step)?;
                    }
                }
                Ok(d)
            }
            TimeUnit::Weeks => Ok(self.adjust(date.advance(n, unit)?, convention)),
            TimeUnit::Months | TimeUnit::Years => {
                let shifted = date.advance(n, unit)?;
                if end_of_month && self.is_end_of_month(date) {
                    Ok(self.end_of_month(shifted))
                } else {
                    Ok(self.adjust(shifted, convention))
                }
            }
        }
    }

    /// Advance `date` by a [`Period`], adjusting with `convention`.
    fn advance_by(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
    ) -> Result<Date> {
        self.advance(date, period.length, period.unit, convention, false)
    }
}

/// A calendar where every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

/// A calendar whose only holidays are Saturdays and Sundays.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendsOnly;

impl Calendar for WeekendsOnly {
    fn name(&self) -> &str {
        "Weekends Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}
