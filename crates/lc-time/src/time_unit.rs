//! `TimeUnit`: units of time used in `Period`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unit of calendar time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeUnit {
    /// Calendar days (business days when advancing on a calendar).
    Days,
    /// Calendar weeks (7 days).
    Weeks,
    /// Calendar months.
    Months,
    /// Calendar years (12 months).
    Years,
}

impl TimeUnit {
    /// Single-letter tenor suffix (`D`, `W`, `M`, `Y`).
    pub fn suffix(self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        }
    }

    /// Parse a tenor suffix, case-insensitively.
    pub fn from_suffix(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'D' => Some(TimeUnit::Days),
            'W' => Some(TimeUnit::Weeks),
            'M' => Some(TimeUnit::Months),
            'Y' => Some(TimeUnit::Years),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Days => write!(f, "Day(s)"),
            TimeUnit::Weeks => write!(f, "Week(s)"),
            TimeUnit::Months => write!(f, "Month(s)"),
            TimeUnit::Years => write!(f, "Year(s)"),
        }
    }
}
