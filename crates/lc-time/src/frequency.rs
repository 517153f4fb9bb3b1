//! Coupon frequencies.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How often a schedule pays.
///
/// Derived from a schedule tenor by [`Period::frequency`](crate::Period::frequency);
/// bootstrap helpers report it so that callers can group instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Frequency {
    /// Zero-length tenor in days, weeks or months.
    NoFrequency,
    /// Paid at maturity only.
    Once,
    /// 1 per year.
    Annual,
    /// 2 per year.
    Semiannual,
    /// 3 per year.
    EveryFourthMonth,
    /// 4 per year.
    Quarterly,
    /// 6 per year.
    Bimonthly,
    /// 12 per year.
    Monthly,
    /// 13 per year.
    EveryFourthWeek,
    /// 26 per year.
    Biweekly,
    /// 52 per year.
    Weekly,
    /// Every calendar day.
    Daily,
    /// A tenor that does not divide the year.
    OtherFrequency,
}

impl Frequency {
    /// Coupons per year, `None` where the notion has no count.
    pub fn per_year(self) -> Option<u32> {
        use Frequency::*;
        Some(match self {
            NoFrequency | OtherFrequency => return None,
            Once => 0,
            Annual => 1,
            Semiannual => 2,
            EveryFourthMonth => 3,
            Quarterly => 4,
            Bimonthly => 6,
            Monthly => 12,
            EveryFourthWeek => 13,
            Biweekly => 26,
            Weekly => 52,
            Daily => 365,
        })
    }

    /// `true` if coupons recur at a fixed count per year.
    pub fn is_regular(self) -> bool {
        matches!(self.per_year(), Some(n) if n > 0)
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.per_year() {
            Some(0) => f.write_str("once"),
            Some(n) => write!(f, "{n}/year"),
            None => write!(f, "{self:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Period, TimeUnit};

    #[test]
    fn counts_follow_tenor() {
        assert_eq!(Period::new(6, TimeUnit::Months).frequency().per_year(), Some(2));
        assert_eq!(Period::new(1, TimeUnit::Years).frequency().per_year(), Some(1));
        assert_eq!(Period::new(5, TimeUnit::Months).frequency().per_year(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Frequency::Quarterly.to_string(), "4/year");
        assert_eq!(Frequency::Once.to_string(), "once");
        assert_eq!(Frequency::OtherFrequency.to_string(), "OtherFrequency");
        assert!(!Frequency::Once.is_regular());
        assert!(Frequency::Weekly.is_regular());
    }
}
