//! Date ranges and calendar months used by reports and budgets

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive range of dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `end < start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodParseError> {
        if end < start {
            return Err(PeriodParseError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Check if a date falls within this range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Parse "2025-01-01..2025-01-15" or a single month "2025-01"
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        if let Some((start, end)) = s.split_once("..") {
            let start = parse_date(start)?;
            let end = parse_date(end)?;
            return Self::new(start, end);
        }
        Ok(Month::parse(s)?.range())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// A calendar month, displayed as "YYYY-MM"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    /// Create a month, `None` when `month` is outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.next().start_date() - Duration::days(1)
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date(),
            end: self.end_date(),
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Parse "2025-01"
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();
        let invalid = || PeriodParseError::InvalidFormat(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, PeriodParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PeriodParseError::InvalidFormat(s.trim().to_string()))
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodParseError {
    #[error("Invalid period format: {0} (expected YYYY-MM or YYYY-MM-DD..YYYY-MM-DD)")]
    InvalidFormat(String),

    #[error("Range end {end} is before start {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let feb = Month::new(2024, 2).unwrap();
        assert_eq!(feb.start_date(), date(2024, 2, 1));
        assert_eq!(feb.end_date(), date(2024, 2, 29));

        let dec = Month::new(2025, 12).unwrap();
        assert_eq!(dec.end_date(), date(2025, 12, 31));
        assert_eq!(dec.next(), Month::new(2026, 1).unwrap());
        assert_eq!(Month::new(2025, 1).unwrap().prev(), Month::new(2024, 12).unwrap());
    }

    #[test]
    fn test_month_parse_and_display() {
        let month = Month::parse("2025-03").unwrap();
        assert_eq!(month.to_string(), "2025-03");
        assert!(Month::parse("2025-13").is_err());
        assert!(Month::parse("March").is_err());
        assert!(Month::new(2025, 0).is_none());
    }

    #[test]
    fn test_range_contains() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        assert!(range.contains(date(2025, 1, 1)));
        assert!(range.contains(date(2025, 1, 31)));
        assert!(!range.contains(date(2025, 2, 1)));
        assert_eq!(range.days(), 31);
    }

    #[test]
    fn test_range_parse() {
        let range = DateRange::parse("2025-01-05..2025-02-10").unwrap();
        assert_eq!(range.start, date(2025, 1, 5));
        assert_eq!(range.end, date(2025, 2, 10));

        let month = DateRange::parse("2025-02").unwrap();
        assert_eq!(month.end, date(2025, 2, 28));

        assert!(matches!(
            DateRange::parse("2025-02-10..2025-01-01"),
            Err(PeriodParseError::InvertedRange { .. })
        ));
    }
}
