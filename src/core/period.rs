//! Calendar year-month buckets (`YYYY-MM`).
//!
//! Periods are kept as their canonical string so that the plain string ordering is
//! also the chronological ordering.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A validated `YYYY-MM` period
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(String);

impl Period {
    /// The period a date falls in.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{:04}-{:02}", date.year(), date.month()))
    }

    /// The canonical `YYYY-MM` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a date falls inside this period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::from_date(date) == *self
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || Error::InvalidPeriod {
            value: trimmed.to_string(),
        };

        // chrono accepts unpadded months, so re-format and compare
        let first_day =
            NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
        let period = Self::from_date(first_day);
        if period.as_str() == trimmed {
            Ok(period)
        } else {
            Err(invalid())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(Period::from_date(date).as_str(), "2024-03");
    }

    #[test]
    fn test_parse_valid_period() {
        let period: Period = "2024-11".parse().unwrap();
        assert_eq!(period.to_string(), "2024-11");
        assert!(period.contains(NaiveDate::from_ymd_opt(2024, 11, 30).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()));
    }

    #[test]
    fn test_parse_rejects_malformed_periods() {
        for bad in ["2024-3", "2024-13", "24-03", "2024/03", "2024-03-01", ""] {
            assert!(
                matches!(bad.parse::<Period>(), Err(Error::InvalidPeriod { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_string_order_is_chronological() {
        let mut periods: Vec<Period> = ["2024-10", "2023-12", "2024-02"]
            .iter()
            .map(|p| p.parse().unwrap())
            .collect();
        periods.sort();
        let sorted: Vec<&str> = periods.iter().map(Period::as_str).collect();
        assert_eq!(sorted, vec!["2023-12", "2024-02", "2024-10"]);
    }
}
