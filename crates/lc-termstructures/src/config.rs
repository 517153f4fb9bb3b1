//! Declarative description of a cap-volatility vector.
//!
//! A [`CapVolatilityConfig`] names its calendar and day counter by
//! identifier, so it can be written by hand or, with the `serde` feature,
//! loaded from JSON:
//!
//! ```json
//! {
//!   "reference": { "Floating": { "settlement_days": 2 } },
//!   "calendar": "Target",
//!   "day_counter": "Actual365Fixed",
//!   "business_day_convention": "ModifiedFollowing",
//!   "option_tenors": ["1Y", "2Y", "3Y", "5Y"],
//!   "volatilities": [0.20, 0.22, 0.21, 0.23]
//! }
//! ```

use std::rc::Rc;

use lc_core::errors::Result;
use lc_core::{Natural, Volatility};
use lc_time::{
    Actual360, Actual365Fixed, ActualActualIsda, BusinessDayConvention, Calendar, Date,
    DayCounter, NullCalendar, Period, Settings, Target, Thirty360, WeekendsOnly,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cap_volatility_vector::{CapVolatilityVector, VolatilityInputs};
use crate::term_structure::ReferenceDate;

/// Built-in calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalendarId {
    /// Every day is a business day.
    #[default]
    Null,
    /// Saturdays and Sundays are holidays.
    WeekendsOnly,
    /// The TARGET settlement calendar.
    Target,
}

impl CalendarId {
    /// A fresh instance of the calendar.
    pub fn calendar(self) -> Rc<dyn Calendar> {
        match self {
            CalendarId::Null => Rc::new(NullCalendar),
            CalendarId::WeekendsOnly => Rc::new(WeekendsOnly),
            CalendarId::Target => Rc::new(Target),
        }
    }
}

/// Built-in day counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DayCounterId {
    /// Actual/360.
    Actual360,
    /// Actual/365 (Fixed).
    #[default]
    Actual365Fixed,
    /// 30/360 (Bond Basis).
    Thirty360,
    /// Actual/Actual (ISDA).
    ActualActualIsda,
}

impl DayCounterId {
    /// A fresh instance of the day counter.
    pub fn day_counter(self) -> Rc<dyn DayCounter> {
        match self {
            DayCounterId::Actual360 => Rc::new(Actual360),
            DayCounterId::Actual365Fixed => Rc::new(Actual365Fixed),
            DayCounterId::Thirty360 => Rc::new(Thirty360),
            DayCounterId::ActualActualIsda => Rc::new(ActualActualIsda),
        }
    }
}

/// How the reference date is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReferenceConfig {
    /// An explicit date.
    Fixed {
        /// The reference date.
        date: Date,
    },
    /// Business days after the session evaluation date.
    Floating {
        /// Settlement lag in business days.
        settlement_days: Natural,
    },
}

/// A cap-volatility vector with fixed volatilities, described by value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CapVolatilityConfig {
    /// Reference-date rule.
    pub reference: ReferenceConfig,
    /// Calendar used to roll option dates.
    #[cfg_attr(feature = "serde", serde(default))]
    pub calendar: CalendarId,
    /// Day counter for option times.
    #[cfg_attr(feature = "serde", serde(default))]
    pub day_counter: DayCounterId,
    /// Adjustment of option dates.
    pub business_day_convention: BusinessDayConvention,
    /// Option tenors, in increasing order.
    pub option_tenors: Vec<Period>,
    /// One volatility per tenor.
    pub volatilities: Vec<Volatility>,
}

impl CapVolatilityConfig {
    /// Build the described curve within `settings`' session.
    pub fn build(&self, settings: &Settings) -> Result<Rc<CapVolatilityVector>> {
        let reference = match self.reference {
            ReferenceConfig::Fixed { date } => ReferenceDate::Fixed(date),
            ReferenceConfig::Floating { settlement_days } => {
                ReferenceDate::floating(settlement_days, settings)
            }
        };
        CapVolatilityVector::new(
            reference,
            self.calendar.calendar(),
            self.option_tenors.clone(),
            VolatilityInputs::Fixed(self.volatilities.clone()),
            self.business_day_convention,
            self.day_counter.day_counter(),
        )
    }
}
