//! Report reductions.
//!
//! Read-only rollups over already-queried rows. Each function is a pure
//! reduction; the engine layer decides which rows to feed in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{
    AttendanceRecord, AttendanceStatus, LeaveRequest, LeaveStatus, LeaveType, Profile, YearMonth,
};

/// Present vs absent record counts for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAttendanceCount {
    /// The month.
    pub month: YearMonth,
    /// Short label (e.g. "Mar").
    pub label: String,
    /// Records with status `present`.
    pub present: u32,
    /// Records with status `absent`.
    pub absent: u32,
}

/// Approved request count for one leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeCount {
    /// The leave type.
    pub leave_type: LeaveType,
    /// Display name (e.g. "Sick").
    pub name: String,
    /// Number of approved requests.
    pub count: u32,
}

/// Active headcount for one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentCount {
    /// Department name, or "Unassigned".
    pub name: String,
    /// Number of active profiles.
    pub count: u32,
}

/// Counts present and absent records falling in `month`.
pub fn count_month_attendance<'a, I>(month: YearMonth, records: I) -> MonthlyAttendanceCount
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let (present, absent) = records
        .into_iter()
        .filter(|r| month.contains(r.date))
        .fold((0, 0), |(present, absent), r| match r.status {
            AttendanceStatus::Present => (present + 1, absent),
            AttendanceStatus::Absent => (present, absent + 1),
            _ => (present, absent),
        });

    MonthlyAttendanceCount {
        month,
        label: month.label(),
        present,
        absent,
    }
}

/// The `count` months ending at `last`, oldest first.
pub fn trailing_months(last: YearMonth, count: u32) -> Vec<YearMonth> {
    let mut months = Vec::with_capacity(count as usize);
    let mut current = last;
    for _ in 0..count {
        months.push(current);
        current = current.previous();
    }
    months.reverse();
    months
}

/// Counts approved requests per leave type.
///
/// Every leave type is present in the output, in [`LeaveType::ALL`] order.
pub fn leave_distribution<'a, I>(requests: I) -> Vec<LeaveTypeCount>
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    let mut counts: BTreeMap<LeaveType, u32> = BTreeMap::new();
    for request in requests
        .into_iter()
        .filter(|r| r.status == LeaveStatus::Approved)
    {
        *counts.entry(request.leave_type).or_default() += 1;
    }

    LeaveType::ALL
        .iter()
        .map(|leave_type| LeaveTypeCount {
            leave_type: *leave_type,
            name: leave_type.label().to_string(),
            count: counts.get(leave_type).copied().unwrap_or(0),
        })
        .collect()
}

/// Counts active profiles per department, sorted by department name.
///
/// Profiles without a department are bucketed as "Unassigned".
pub fn department_distribution<'a, I>(profiles: I) -> Vec<DepartmentCount>
where
    I: IntoIterator<Item = &'a Profile>,
{
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for profile in profiles.into_iter().filter(|p| p.is_active) {
        *counts
            .entry(profile.department_or_unassigned().to_string())
            .or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(name, count)| DepartmentCount { name, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn month(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn profile(department: Option<&str>, is_active: bool) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            employee_id: "EMP".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@b.c".to_string(),
            department: department.map(str::to_string),
            designation: None,
            date_of_joining: None,
            is_active,
            phone: None,
            address: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn request(leave_type: LeaveType, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            leave_type,
            start_date: date("2024-03-10"),
            end_date: date("2024-03-10"),
            reason: String::new(),
            status,
            reviewed_by: None,
            reviewed_at: None,
            review_comments: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_month_count_ignores_other_months_and_statuses() {
        let records = vec![
            AttendanceRecord::synthetic(Uuid::nil(), date("2024-03-01"), AttendanceStatus::Present),
            AttendanceRecord::synthetic(Uuid::nil(), date("2024-03-02"), AttendanceStatus::Absent),
            AttendanceRecord::synthetic(Uuid::nil(), date("2024-03-03"), AttendanceStatus::HalfDay),
            AttendanceRecord::synthetic(Uuid::nil(), date("2024-04-01"), AttendanceStatus::Present),
        ];
        let count = count_month_attendance(month("2024-03"), &records);
        assert_eq!(count.present, 1);
        assert_eq!(count.absent, 1);
        assert_eq!(count.label, "Mar");
    }

    #[test]
    fn test_trailing_months_oldest_first() {
        let months = trailing_months(month("2024-02"), 3);
        assert_eq!(months, vec![month("2023-12"), month("2024-01"), month("2024-02")]);
        assert!(trailing_months(month("2024-02"), 0).is_empty());
    }

    #[test]
    fn test_leave_distribution_counts_only_approved() {
        let requests = vec![
            request(LeaveType::Sick, LeaveStatus::Approved),
            request(LeaveType::Sick, LeaveStatus::Approved),
            request(LeaveType::Sick, LeaveStatus::Rejected),
            request(LeaveType::Paid, LeaveStatus::Pending),
            request(LeaveType::Unpaid, LeaveStatus::Approved),
        ];
        let distribution = leave_distribution(&requests);
        let counts: Vec<(&str, u32)> = distribution
            .iter()
            .map(|c| (c.name.as_str(), c.count))
            .collect();
        assert_eq!(
            counts,
            vec![("Paid", 0), ("Sick", 2), ("Casual", 0), ("Unpaid", 1)]
        );
    }

    #[test]
    fn test_department_distribution_buckets_unassigned() {
        let profiles = vec![
            profile(Some("Engineering"), true),
            profile(Some("Engineering"), true),
            profile(None, true),
            profile(Some(""), true),
            profile(Some("Finance"), false),
        ];
        let distribution = department_distribution(&profiles);
        assert_eq!(
            distribution,
            vec![
                DepartmentCount { name: "Engineering".to_string(), count: 2 },
                DepartmentCount { name: "Unassigned".to_string(), count: 2 },
            ]
        );
    }
}
