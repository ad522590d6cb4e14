//! Calendar month reference.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

/// A calendar month, serialized as `YYYY-MM`.
///
/// Internally anchored on the first day of the month, so every value is a
/// valid month.
///
/// # Example
///
/// ```
/// use hr_engine::models::YearMonth;
/// use chrono::NaiveDate;
///
/// let month: YearMonth = "2024-02".parse().unwrap();
/// assert_eq!(month.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(month.previous().to_string(), "2024-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Creates a month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Returns the month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The 1-based month number.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// The last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// The month before this one.
    pub fn previous(&self) -> Self {
        self.0
            .checked_sub_months(Months::new(1))
            .map(Self)
            .unwrap_or(*self)
    }

    /// Returns true if `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    /// Short month label for charts (e.g. "Mar").
    pub fn label(&self) -> String {
        self.0.format("%b").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidInput {
            field: "month".to_string(),
            message: format!("expected YYYY-MM, got '{}'", s),
        };

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
