//! `Date` type.
//!
//! A thin wrapper around [`chrono::NaiveDate`] adding the month-end aware
//! arithmetic that schedules and curves need.  All fallible arithmetic
//! returns [`Error::Date`] instead of panicking; the `+`/`-` operators are
//! reserved for day steps inside loops that stay well within range.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use lc_core::errors::{Error, Result};

use crate::period::Period;
use crate::time_unit::TimeUnit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A calendar date.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Create a date from year, month (1–12), and day-of-month (1–31).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| Error::Date(format!("invalid date {year}-{month:02}-{day:02}")))
    }

    /// Wrap a `chrono` date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Date(date)
    }

    /// Latest date a curve may extend to (31 December 2199).
    pub fn max_date() -> Self {
        Date(NaiveDate::from_ymd_opt(2199, 12, 31).unwrap_or(NaiveDate::MAX))
    }

    /// Today's date on the local clock.
    pub fn todays_date() -> Self {
        Date(chrono::Local::now().date_naive())
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The underlying `chrono` date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Return the year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Return the month (1–12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Return the day of the month (1–31).
    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    /// Return the day of the year (1–366).
    pub fn day_of_year(&self) -> u32 {
        self.0.ordinal()
    }

    /// Return the weekday.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// `true` for Saturdays and Sundays.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    /// Advance by `n` calendar days.
    pub fn add_days(self, n: i64) -> Result<Self> {
        let shifted = if n >= 0 {
            self.0.checked_add_days(Days::new(n.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(n.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| Error::Date(format!("{self} shifted by {n} days is out of range")))
    }

    /// Advance by `n` units.  Month and year steps clamp to the end of the
    /// target month (31 January + 1M = 28/29 February).
    pub fn advance(self, n: i32, unit: TimeUnit) -> Result<Self> {
        match unit {
            TimeUnit::Days => self.add_days(n as i64),
            TimeUnit::Weeks => self.add_days(7 * n as i64),
            TimeUnit::Months => {
                let months = Months::new(n.unsigned_abs());
                let shifted = if n >= 0 {
                    self.0.checked_add_months(months)
                } else {
                    self.0.checked_sub_months(months)
                };
                shifted.map(Date).ok_or_else(|| {
                    Error::Date(format!("{self} shifted by {n} months is out of range"))
                })
            }
            TimeUnit::Years => {
                let months = n.checked_mul(12).ok_or_else(|| {
                    Error::Date(format!("{self} shifted by {n} years is out of range"))
                })?;
                self.advance(months, TimeUnit::Months)
            }
        }
    }

    /// Advance by a [`Period`].
    pub fn advance_by(self, period: Period) -> Result<Self> {
        self.advance(period.length, period.unit)
    }

    /// Number of calendar days from `self` to `other`, positive if
    /// `other > self`.
    pub fn days_between(self, other: Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Return the last day of the month containing this date.
    pub fn end_of_month(self) -> Self {
        let first = self.0.with_day(1).unwrap_or(self.0);
        first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .map(Date)
            .unwrap_or(self)
    }

    /// Return `true` if this is the last calendar day of its month.
    pub fn is_end_of_month(self) -> bool {
        self == self.end_of_month()
    }

    /// Whether `year` is a leap year.
    pub fn is_leap_year(year: i32) -> bool {
        NaiveDate::from_ymd_opt(year, 2, 29).is_some()
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

impl std::ops::Add<i64> for Date {
    type Output = Self;
    fn add(self, rhs: i64) -> Self {
        self.add_days(rhs).expect("date addition overflow")
    }
}

impl std::ops::Sub<i64> for Date {
    type Output = Self;
    fn sub(self, rhs: i64) -> Self {
        self.add_days(-rhs).expect("date subtraction underflow")
    }
}

impl std::ops::Sub<Date> for Date {
    type Output = i64;
    fn sub(self, rhs: Date) -> i64 {
        rhs.days_between(self)
    }
}

// ── Parsing / display ─────────────────────────────────────────────────────────

impl FromStr for Date {
    type Err = Error;

    /// Parse an ISO-8601 date (`2024-01-15`).
    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| Error::Date(format!("cannot parse {s:?} as a date: {e}")))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%B %-d, %Y"))
    }
}

impl fmt::Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date({})", self.0.format("%Y-%m-%d"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
