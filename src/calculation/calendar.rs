//! Calendar utilities.
//!
//! Pure functions for inclusive day spans, weekday-only working day counts
//! and date enumeration. No holiday calendar is modelled: Saturday and Sunday
//! are excluded unconditionally.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{EngineError, EngineResult};
use crate::models::YearMonth;

/// Returns the number of days from `start` to `end`, both included.
///
/// Fails with [`EngineError::InvalidRange`] if `end` is before `start`.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::days_between_inclusive;
/// use chrono::NaiveDate;
///
/// let d = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
/// assert_eq!(days_between_inclusive(d, d).unwrap(), 1);
/// assert_eq!(days_between_inclusive(d, d + chrono::Days::new(6)).unwrap(), 7);
/// ```
pub fn days_between_inclusive(start: NaiveDate, end: NaiveDate) -> EngineResult<u32> {
    if end < start {
        return Err(EngineError::InvalidRange { start, end });
    }
    // NaiveDate's whole range is well under u32::MAX days.
    Ok((end - start).num_days() as u32 + 1)
}

/// Returns true for Monday through Friday.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts the weekdays (Monday to Friday) in `month`.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::working_days_in_month;
/// use hr_engine::models::YearMonth;
///
/// // March 2024 has 31 days, 10 of them on weekends.
/// assert_eq!(working_days_in_month(YearMonth::new(2024, 3).unwrap()), 21);
/// ```
pub fn working_days_in_month(month: YearMonth) -> u32 {
    DateSpan {
        start: month.first_day(),
        end: month.last_day(),
    }
    .iter()
    .filter(|d| is_working_day(*d))
    .count() as u32
}

/// Returns true if `date` lies in `[start, end]`.
pub fn date_in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

/// An inclusive, ascending span of dates.
///
/// The span is `Copy`; every call to [`DateSpan::iter`] starts over from
/// `start`, so it can be walked any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    /// First date in the span.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date in the span.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates in the span.
    pub fn len(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }

    /// A span always holds at least one date.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates the span from the start.
    pub fn iter(&self) -> DateSpanIter {
        DateSpanIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateSpan {
    type Item = NaiveDate;
    type IntoIter = DateSpanIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`DateSpan`].
#[derive(Debug, Clone)]
pub struct DateSpanIter {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateSpanIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }
}

/// Builds the inclusive span `[start, end]`.
///
/// Fails with [`EngineError::InvalidRange`] if `end` is before `start`.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::enumerate_dates;
/// use chrono::NaiveDate;
///
/// let span = enumerate_dates(
///     NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
/// ).unwrap();
/// let days: Vec<String> = span.iter().map(|d| d.to_string()).collect();
/// assert_eq!(days, vec!["2024-03-10", "2024-03-11", "2024-03-12"]);
/// ```
pub fn enumerate_dates(start: NaiveDate, end: NaiveDate) -> EngineResult<DateSpan> {
    if end < start {
        return Err(EngineError::InvalidRange { start, end });
    }
    Ok(DateSpan { start, end })
}
