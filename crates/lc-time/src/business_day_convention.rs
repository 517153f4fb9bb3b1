//! Business-day convention.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How to adjust a date that falls on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BusinessDayConvention {
    /// First business day after the holiday.
    Following,
    /// First business day after the holiday, unless that crosses into the
    /// next month; then the first business day before it.
    ModifiedFollowing,
    /// First business day before the holiday.
    Preceding,
    /// First business day before the holiday, unless that crosses into the
    /// previous month; then the first business day after it.
    ModifiedPreceding,
    /// Keep the original date.
    Unadjusted,
    /// Nearest business day, ties going forward.
    Nearest,
}

impl std::fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
            BusinessDayConvention::Unadjusted => "Unadjusted",
            BusinessDayConvention::Nearest => "Nearest",
        };
        write!(f, "{s}")
    }
}
