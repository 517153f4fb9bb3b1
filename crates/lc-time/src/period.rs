//! `Period`: a time span expressed in a [`TimeUnit`].
//!
//! Periods parse from and print as market tenor strings: `"6M"`, `"10Y"`,
//! `"2W"`, `"1D"`.

use std::fmt;
use std::str::FromStr;

use lc_core::errors::{Error, Result};

use crate::frequency::Frequency;
use crate::time_unit::TimeUnit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A time span made up of an integer length and a [`TimeUnit`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Period {
    /// Number of units.
    pub length: i32,
    /// The unit of time.
    pub unit: TimeUnit,
}

impl Period {
    /// Create a new period.
    pub fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// The frequency of events spaced by this period.
    pub fn frequency(&self) -> Frequency {
        let length = self.length.unsigned_abs();
        if length == 0 {
            return match self.unit {
                TimeUnit::Years => Frequency::Once,
                _ => Frequency::NoFrequency,
            };
        }
        match (self.unit, length) {
            (TimeUnit::Years, 1) => Frequency::Annual,
            (TimeUnit::Months, 12) => Frequency::Annual,
            (TimeUnit::Months, 6) => Frequency::Semiannual,
            (TimeUnit::Months, 4) => Frequency::EveryFourthMonth,
            (TimeUnit::Months, 3) => Frequency::Quarterly,
            (TimeUnit::Months, 2) => Frequency::Bimonthly,
            (TimeUnit::Months, 1) => Frequency::Monthly,
            (TimeUnit::Weeks, 4) => Frequency::EveryFourthWeek,
            (TimeUnit::Weeks, 2) => Frequency::Biweekly,
            (TimeUnit::Weeks, 1) => Frequency::Weekly,
            (TimeUnit::Days, 1) => Frequency::Daily,
            _ => Frequency::OtherFrequency,
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidArgument(format!("cannot parse {s:?} as a period"));
        let suffix = s.chars().last().ok_or_else(invalid)?;
        let unit = TimeUnit::from_suffix(suffix).ok_or_else(invalid)?;
        let length = s[..s.len() - suffix.len_utf8()]
            .parse::<i32>()
            .map_err(|_| invalid())?;
        Ok(Period::new(length, unit))
    }
}

impl TryFrom<String> for Period {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> String {
        p.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}

impl fmt::Debug for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Period({self})")
    }
}
