//! Employee directory filter.
//!
//! One predicate type shared by every listing of employees: free-text
//! search, department, active flag and today's attendance.

use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, Profile};

/// Which profiles to keep by active flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityFilter {
    /// Every profile.
    #[default]
    All,
    /// Only active profiles.
    Active,
    /// Only deactivated profiles.
    Inactive,
}

/// Which profiles to keep by today's attendance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceFilter {
    /// Ignore attendance.
    #[default]
    All,
    /// Has a present or half-day record today.
    Present,
    /// Has no record today.
    Absent,
}

/// Filter over the employee directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFilter {
    /// Case-insensitive substring over name, email and employee id.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact department match.
    #[serde(default)]
    pub department: Option<String>,
    /// Active flag filter.
    #[serde(default, rename = "status")]
    pub activity: ActivityFilter,
    /// Today's attendance filter.
    #[serde(default, rename = "attendance")]
    pub attendance_today: AttendanceFilter,
}

impl EmployeeFilter {
    /// Returns true if `profile`, with its attendance record for today (if
    /// any), passes every criterion.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_engine::calculation::{AttendanceFilter, EmployeeFilter};
    /// # use hr_engine::models::Profile;
    /// # use chrono::{DateTime, Utc};
    /// # use uuid::Uuid;
    /// # let profile = Profile {
    /// #     id: Uuid::nil(), employee_id: "EMP001".into(), first_name: "Asha".into(),
    /// #     last_name: "Rao".into(), email: "asha@example.com".into(), department: None,
    /// #     designation: None, date_of_joining: None, is_active: true, phone: None,
    /// #     address: None, created_at: DateTime::<Utc>::UNIX_EPOCH,
    /// # };
    ///
    /// let filter = EmployeeFilter {
    ///     attendance_today: AttendanceFilter::Absent,
    ///     ..Default::default()
    /// };
    /// assert!(filter.matches(&profile, None));
    /// ```
    pub fn matches(&self, profile: &Profile, today: Option<&AttendanceRecord>) -> bool {
        let matches_search = self
            .search
            .as_deref()
            .is_none_or(|needle| profile.matches_search(needle));

        let matches_department = match self.department.as_deref() {
            None | Some("all") => true,
            Some(department) => profile.department.as_deref() == Some(department),
        };

        let matches_activity = match self.activity {
            ActivityFilter::All => true,
            ActivityFilter::Active => profile.is_active,
            ActivityFilter::Inactive => !profile.is_active,
        };

        let matches_attendance = match self.attendance_today {
            AttendanceFilter::All => true,
            AttendanceFilter::Present => today.is_some_and(AttendanceRecord::is_attended),
            AttendanceFilter::Absent => today.is_none(),
        };

        matches_search && matches_department && matches_activity && matches_attendance
    }
}
