//! `TermStructure`: base trait for all term structures.
//!
//! Every term structure has a **reference date**, a **day counter**, a
//! **calendar**, and a **maximum date** (beyond which it may only be queried
//! with extrapolation enabled).
//!
//! The reference date is either fixed at construction or floats a number of
//! business days after the session evaluation date.  Floating term
//! structures register with the evaluation date so that moving it marks them
//! stale.

use std::cell::Cell;
use std::rc::Rc;

use lc_core::errors::{Error, Result};
use lc_core::patterns::observable::{register_with, Observable, Observer};
use lc_core::{Natural, Time};
use lc_time::{BusinessDayConvention, Calendar, Date, DayCounter, Settings, TimeUnit};

/// Slack allowed when comparing a query time against the maximum time.
const TIME_TOLERANCE: Time = 1.0e-12;

/// How a term structure determines its reference date.
#[derive(Debug, Clone)]
pub enum ReferenceDate {
    /// A date fixed at construction.
    Fixed(Date),
    /// `settlement_days` business days after the session evaluation date.
    Floating {
        /// Business days between evaluation and reference date.
        settlement_days: Natural,
        /// The session providing the evaluation date.
        settings: Settings,
    },
}

impl ReferenceDate {
    /// A reference date following the evaluation date of `settings`.
    pub fn floating(settlement_days: Natural, settings: &Settings) -> Self {
        ReferenceDate::Floating {
            settlement_days,
            settings: settings.clone(),
        }
    }

    /// `true` if the reference date moves with the evaluation date.
    pub fn is_floating(&self) -> bool {
        matches!(self, ReferenceDate::Floating { .. })
    }
}

/// State shared by every concrete term structure.
#[derive(Debug)]
pub struct TermStructureBase {
    reference: ReferenceDate,
    calendar: Rc<dyn Calendar>,
    day_counter: Rc<dyn DayCounter>,
    extrapolate: Cell<bool>,
}

impl TermStructureBase {
    /// Bundle the reference-date rule, calendar and day counter.
    pub fn new(
        reference: ReferenceDate,
        calendar: Rc<dyn Calendar>,
        day_counter: Rc<dyn DayCounter>,
    ) -> Self {
        Self {
            reference,
            calendar,
            day_counter,
            extrapolate: Cell::new(false),
        }
    }

    /// The reference date under the current evaluation date.
    pub fn reference_date(&self) -> Result<Date> {
        match &self.reference {
            ReferenceDate::Fixed(date) => Ok(*date),
            ReferenceDate::Floating {
                settlement_days,
                settings,
            } => {
                let today = settings.evaluation_date().value();
                let days = i32::try_from(*settlement_days).map_err(|_| {
                    Error::InvalidArgument(format!(
                        "settlement days out of range: {settlement_days}"
                    ))
                })?;
                self.calendar.advance(
                    today,
                    days,
                    TimeUnit::Days,
                    BusinessDayConvention::Following,
                    false,
                )
            }
        }
    }

    /// The reference-date rule.
    pub fn reference(&self) -> &ReferenceDate {
        &self.reference
    }

    /// The calendar.
    pub fn calendar(&self) -> &Rc<dyn Calendar> {
        &self.calendar
    }

    /// The day counter.
    pub fn day_counter(&self) -> &Rc<dyn DayCounter> {
        &self.day_counter
    }

    /// Whether queries beyond the maximum date are allowed.
    pub fn allows_extrapolation(&self) -> bool {
        self.extrapolate.get()
    }

    /// Allow or forbid queries beyond the maximum date.
    pub fn enable_extrapolation(&self, enabled: bool) {
        self.extrapolate.set(enabled);
    }

    /// Register `observer` with the evaluation date if the reference date
    /// floats.  Returns `false` for fixed reference dates.
    pub fn observe_evaluation_date<O: Observer + 'static>(&self, observer: &Rc<O>) -> bool {
        match &self.reference {
            ReferenceDate::Fixed(_) => false,
            ReferenceDate::Floating { settings, .. } => {
                register_with(observer, &**settings.evaluation_date())
            }
        }
    }
}

/// Base trait for all term structures.
pub trait TermStructure: Observable + std::fmt::Debug {
    /// Shared reference-date state.
    fn base(&self) -> &TermStructureBase;

    /// The latest date for which the curve can be used.
    fn max_date(&self) -> Result<Date>;

    /// The date at which time is zero.
    fn reference_date(&self) -> Result<Date> {
        self.base().reference_date()
    }

    /// The day counter used for date → time conversions.
    fn day_counter(&self) -> &dyn DayCounter {
        self.base().day_counter().as_ref()
    }

    /// The calendar used for date adjustments.
    fn calendar(&self) -> &dyn Calendar {
        self.base().calendar().as_ref()
    }

    /// The latest time for which the curve can be used.
    fn max_time(&self) -> Result<Time> {
        self.time_from_reference(self.max_date()?)
    }

    /// Year fraction between the reference date and `date`.
    fn time_from_reference(&self, date: Date) -> Result<Time> {
        Ok(self.day_counter().year_fraction(self.reference_date()?, date))
    }

    /// Whether queries beyond the maximum date are allowed.
    fn allows_extrapolation(&self) -> bool {
        self.base().allows_extrapolation()
    }

    /// Allow or forbid queries beyond the maximum date.
    fn enable_extrapolation(&self, enabled: bool) {
        self.base().enable_extrapolation(enabled);
    }

    /// Fail unless `t` can be queried.
    ///
    /// Negative times are always rejected; times past
    /// [`max_time`][Self::max_time] only when neither `extrapolate` nor the
    /// curve's own extrapolation flag is set.
    fn check_range(&self, t: Time, extrapolate: bool) -> Result<()> {
        if t < 0.0 || t.is_nan() {
            return Err(Error::InvalidArgument(format!(
                "negative time ({t}) given"
            )));
        }
        if extrapolate || self.allows_extrapolation() {
            return Ok(());
        }
        let max = self.max_time()?;
        if t > max + TIME_TOLERANCE {
            return Err(Error::InvalidArgument(format!(
                "time ({t}) is past max curve time ({max})"
            )));
        }
        Ok(())
    }
}
