//! `DayCounter` trait and built-in day-count conventions.
//!
//! A day counter computes the fraction of a year between two dates, used when
//! mapping dates onto curve times and when accruing interest.

use lc_core::{Real, Time};

use crate::date::Date;

/// A convention for counting the fraction of a year between two dates.
pub trait DayCounter: std::fmt::Debug {
    /// Human-readable name of this convention (e.g. `"Actual/365 (Fixed)"`).
    fn name(&self) -> &str;

    /// Number of days between `d1` and `d2` according to this convention.
    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        d1.days_between(d2)
    }

    /// Fraction of a year between `d1` and `d2`.
    fn year_fraction(&self, d1: Date, d2: Date) -> Time;

    /// Fraction of a year between `d1` and `d2` given the reference period
    /// of the coupon they belong to.  Only some conventions use it.
    fn year_fraction_with_ref(&self, d1: Date, d2: Date, _ref_start: Date, _ref_end: Date) -> Time {
        self.year_fraction(d1, d2)
    }
}

/// Actual/365 (Fixed): `actual days / 365`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual365Fixed;

impl DayCounter for Actual365Fixed {
    fn name(&self) -> &str {
        "Actual/365 (Fixed)"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 365.0
    }
}

/// Actual/360: `actual days / 360`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual360;

impl DayCounter for Actual360 {
    fn name(&self) -> &str {
        "Actual/360"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

/// 30/360 (Bond Basis).
///
/// `[360(Y2−Y1) + 30(M2−M1) + (D2−D1)] / 360`, where a 31st is treated as the
/// 30th, and an end-date 31st only when the start day is 30 or 31.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thirty360;

impl DayCounter for Thirty360 {
    fn name(&self) -> &str {
        "30/360 (Bond Basis)"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        let dd1 = (d1.day_of_month() as i64).min(30);
        let mut dd2 = d2.day_of_month() as i64;
        if dd2 == 31 && dd1 == 30 {
            dd2 = 30;
        }
        360 * (d2.year() - d1.year()) as i64
            + 30 * (d2.month() as i64 - d1.month() as i64)
            + (dd2 - dd1)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

/// Actual/Actual (ISDA).
///
/// Days falling in leap years count over 366, the others over 365.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActualActualIsda;

impl DayCounter for ActualActualIsda {
    fn name(&self) -> &str {
        "Actual/Actual (ISDA)"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        if d1 == d2 {
            return 0.0;
        }
        if d1 > d2 {
            return -self.year_fraction(d2, d1);
        }
        let basis = |y: i32| if Date::is_leap_year(y) { 366.0 } else { 365.0 };
        let (y1, y2) = (d1.year(), d2.year());
        let start_of = |y: i32| Date::from_ymd(y, 1, 1);
        match (start_of(y1 + 1), start_of(y2)) {
            (Ok(next_year), Ok(last_year)) if y1 != y2 => {
                d1.days_between(next_year) as Real / basis(y1)
                    + (y2 - y1 - 1) as Real
                    + last_year.days_between(d2) as Real / basis(y2)
            }
            _ => d1.days_between(d2) as Real / basis(y1),
        }
    }
}
