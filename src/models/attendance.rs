//! Attendance record model.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attendance status for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Worked at least the half-day threshold (or still checked in).
    Present,
    /// Worked less than the half-day threshold.
    HalfDay,
    /// Explicitly marked absent.
    Absent,
    /// Covered by an approved leave request.
    Leave,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::HalfDay => write!(f, "half_day"),
            AttendanceStatus::Absent => write!(f, "absent"),
            AttendanceStatus::Leave => write!(f, "leave"),
        }
    }
}

/// One attendance row, unique per `(user_id, date)`.
///
/// `total_hours` stays `None` until `check_out` is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Row id.
    pub id: Uuid,
    /// The employee.
    pub user_id: Uuid,
    /// The attendance day.
    pub date: NaiveDate,
    /// Check-in instant.
    #[serde(default)]
    pub check_in: Option<DateTime<Utc>>,
    /// Check-out instant; never before `check_in`.
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
    /// Hours between check-in and check-out, rounded to 2 dp.
    #[serde(default)]
    pub total_hours: Option<Decimal>,
    /// Status for the day.
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// A fresh record opened by a check-in.
    pub fn checked_in(user_id: Uuid, date: NaiveDate, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            check_in: Some(at),
            check_out: None,
            total_hours: None,
            status: AttendanceStatus::Present,
        }
    }

    /// A synthetic record with no check-in, e.g. for leave or absence.
    pub fn synthetic(user_id: Uuid, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            check_in: None,
            check_out: None,
            total_hours: None,
            status,
        }
    }

    /// Returns true if the employee checked in and has not checked out.
    pub fn is_open(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_none()
    }

    /// Returns true if the day counts as attended (present or half day).
    pub fn is_attended(&self) -> bool {
        matches!(
            self.status,
            AttendanceStatus::Present | AttendanceStatus::HalfDay
        )
    }
}
