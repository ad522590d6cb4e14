//! Monthly attendance statistics.
//!
//! A pure reduction over a set of attendance records. Absence has two
//! readings: payroll counts explicit `absent` records, while the inferred
//! complement (`working_days - attended - leave`) is offered separately for
//! dashboards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, AttendanceStatus};

/// Counts per status plus total worked hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days with status `present`.
    pub present_days: u32,
    /// Days with status `half_day`.
    pub half_days: u32,
    /// Days explicitly marked `absent`.
    pub absent_days: u32,
    /// Days with status `leave`.
    pub leave_days: u32,
    /// Sum of `total_hours` over every record that has it.
    pub total_hours: Decimal,
}

impl AttendanceSummary {
    /// Summarizes `records`.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_engine::calculation::AttendanceSummary;
    /// use hr_engine::models::AttendanceRecord;
    ///
    /// let records: Vec<AttendanceRecord> = Vec::new();
    /// let summary = AttendanceSummary::from_records(&records);
    /// assert_eq!(summary.present_days, 0);
    /// ```
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        records
            .into_iter()
            .fold(Self::default(), |mut summary, record| {
                match record.status {
                    AttendanceStatus::Present => summary.present_days += 1,
                    AttendanceStatus::HalfDay => summary.half_days += 1,
                    AttendanceStatus::Absent => summary.absent_days += 1,
                    AttendanceStatus::Leave => summary.leave_days += 1,
                }
                if let Some(hours) = record.total_hours {
                    summary.total_hours += hours;
                }
                summary
            })
    }

    /// Working days with no present, half-day or leave record.
    ///
    /// Saturates at zero when weekend work pushes the recorded days above
    /// the working-day count.
    pub fn inferred_absent_days(&self, working_days: u32) -> u32 {
        working_days.saturating_sub(self.present_days + self.half_days + self.leave_days)
    }
}
