//! `Schedule`: the coupon dates of a fixed-income instrument.
//!
//! A `Schedule` is generated from an effective date, a termination date, a
//! tenor, a calendar and business-day conventions.  Dates are rolled in
//! unadjusted calendar time from the anchor date (the termination date for
//! backward generation, the effective date for forward generation) and
//! adjusted afterwards, so that adjustments never accumulate.

use std::rc::Rc;

use lc_core::errors::{Error, Result};

use crate::business_day_convention::BusinessDayConvention;
use crate::calendar::Calendar;
use crate::date::Date;
use crate::frequency::Frequency;
use crate::period::Period;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Date generation rule for schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DateGeneration {
    /// Dates generated backward from the termination date; any stub is at
    /// the front.
    Backward,
    /// Dates generated forward from the effective date; any stub is at the
    /// back.
    Forward,
    /// Only the effective and termination dates.
    Zero,
}

/// An ordered sequence of coupon dates.
#[derive(Debug, Clone)]
pub struct Schedule {
    dates: Vec<Date>,
    is_regular: Vec<bool>,
    tenor: Period,
    calendar: Rc<dyn Calendar>,
    convention: BusinessDayConvention,
    termination_convention: BusinessDayConvention,
    rule: DateGeneration,
}

impl Schedule {
    /// Build a schedule from explicit, strictly increasing dates generated
    /// with `tenor`.
    pub fn from_dates(
        dates: Vec<Date>,
        tenor: Period,
        calendar: Rc<dyn Calendar>,
        convention: BusinessDayConvention,
    ) -> Result<Self> {
        if dates.len() < 2 {
            return Err(Error::InvalidArgument(format!(
                "a schedule needs at least two dates, got {}",
                dates.len()
            )));
        }
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::InvalidArgument(format!(
                "schedule dates must increase strictly: {} is followed by {}",
                w[0], w[1]
            )));
        }
        Ok(Self {
            is_regular: vec![true; dates.len() - 1],
            dates,
            tenor,
            calendar,
            convention,
            termination_convention: convention,
            rule: DateGeneration::Forward,
        })
    }

    /// All dates in the schedule.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always `false`: a schedule holds at least two dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The (adjusted) effective date.
    pub fn start_date(&self) -> Date {
        self.dates[0]
    }

    /// The (adjusted) termination date.
    pub fn end_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Consecutive `(start, end)` accrual periods.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }

    /// `true` if accrual period `i` (0-based) spans a full tenor.
    pub fn is_regular(&self, i: usize) -> bool {
        self.is_regular.get(i).copied().unwrap_or(false)
    }

    /// The generation tenor.
    pub fn tenor(&self) -> Period {
        self.tenor
    }

    /// Coupon frequency implied by the tenor.
    pub fn frequency(&self) -> Frequency {
        self.tenor.frequency()
    }

    /// The calendar used for adjustment.
    pub fn calendar(&self) -> &Rc<dyn Calendar> {
        &self.calendar
    }

    /// Convention applied to every date but the last.
    pub fn business_day_convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// Convention applied to the termination date.
    pub fn termination_convention(&self) -> BusinessDayConvention {
        self.termination_convention
    }

    /// The generation rule.
    pub fn rule(&self) -> DateGeneration {
        self.rule
    }
}

/// Builder for [`Schedule`].
#[derive(Debug)]
pub struct ScheduleBuilder {
    effective_date: Date,
    termination_date: Date,
    tenor: Period,
    calendar: Rc<dyn Calendar>,
    convention: BusinessDayConvention,
    termination_convention: BusinessDayConvention,
    rule: DateGeneration,
    end_of_month: bool,
}

impl ScheduleBuilder {
    /// Begin building a schedule.  Defaults: `Unadjusted` conventions,
    /// backward generation, no end-of-month rolling.
    pub fn new(
        effective_date: Date,
        termination_date: Date,
        tenor: Period,
        calendar: Rc<dyn Calendar>,
    ) -> Self {
        Self {
            effective_date,
            termination_date,
            tenor,
            calendar,
            convention: BusinessDayConvention::Unadjusted,
            termination_convention: BusinessDayConvention::Unadjusted,
            rule: DateGeneration::Backward,
            end_of_month: false,
        }
    }

    /// Set the business-day convention for all but the termination date.
    pub fn with_convention(mut self, c: BusinessDayConvention) -> Self {
        self.convention = c;
        self
    }

    /// Set the business-day convention for the termination date.
    pub fn with_termination_convention(mut self, c: BusinessDayConvention) -> Self {
        self.termination_convention = c;
        self
    }

    /// Set the date-generation rule.
    pub fn with_rule(mut self, rule: DateGeneration) -> Self {
        self.rule = rule;
        self
    }

    /// Roll intermediate dates to month ends when the anchor is a month end.
    pub fn end_of_month(mut self, flag: bool) -> Self {
        self.end_of_month = flag;
        self
    }

    /// Build the `Schedule`.
    pub fn build(self) -> Result<Schedule> {
        let (start, end) = (self.effective_date, self.termination_date);
        if start >= end {
            return Err(Error::InvalidArgument(format!(
                "effective date ({start}) must be before termination date ({end})"
            )));
        }
        if self.tenor.length < 0 {
            return Err(Error::InvalidArgument(format!(
                "non-negative tenor required, got {}",
                self.tenor
            )));
        }

        let zero = self.tenor.length == 0 || self.rule == DateGeneration::Zero;
        let (unadjusted, is_regular, anchor) = if zero {
            (vec![start, end], vec![true], end)
        } else if self.rule == DateGeneration::Forward {
            self.roll(start, end, 1)?
        } else {
            self.roll(end, start, -1)?
        };

        let cal = &self.calendar;
        let roll_to_eom = self.end_of_month && anchor.is_end_of_month();
        let last = unadjusted.len() - 1;
        let mut dates: Vec<Date> = unadjusted
            .iter()
            .enumerate()
            .map(|(i, &d)| match i {
                0 => cal.adjust(d, self.convention),
                i if i == last => cal.adjust(d, self.termination_convention),
                _ if roll_to_eom => cal.end_of_month(d),
                _ => cal.adjust(d, self.convention),
            })
            .collect();
        dates.dedup();

        Ok(Schedule {
            is_regular: if dates.len() == unadjusted.len() {
                is_regular
            } else {
                vec![false; dates.len() - 1]
            },
            dates,
            tenor: self.tenor,
            calendar: Rc::clone(&self.calendar),
            convention: self.convention,
            termination_convention: self.termination_convention,
            rule: self.rule,
        })
    }

    /// Step from `anchor` towards `limit` one tenor at a time.  Returns the
    /// unadjusted dates in increasing order, the regularity of each period
    /// and the anchor.
    fn roll(
        &self,
        anchor: Date,
        limit: Date,
        direction: i32,
    ) -> Result<(Vec<Date>, Vec<bool>, Date)> {
        let mut dates = vec![anchor];
        let mut regular = Vec::new();
        let mut i = 1;
        loop {
            let d = anchor.advance(direction * i * self.tenor.length, self.tenor.unit)?;
            let beyond = if direction > 0 { d >= limit } else { d <= limit };
            if beyond {
                regular.push(d == limit);
                break;
            }
            dates.push(d);
            regular.push(true);
            i += 1;
        }
        dates.push(limit);
        if direction < 0 {
            dates.reverse();
            regular.reverse();
        }
        Ok((dates, regular, anchor))
    }
}
