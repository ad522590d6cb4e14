//! Read-only rollups for dashboards and reports.
//!
//! Every method queries current store contents and reduces them; nothing is
//! cached between calls.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::calculation::{
    DepartmentCount, LeaveTypeCount, MonthlyAttendanceCount, count_month_attendance,
    department_distribution, leave_distribution, trailing_months,
};
use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, AttendanceStatus, LeaveBalance, LeaveRequest, LeaveStatus, Notification,
    YearMonth,
};
use crate::store::{AttendanceQuery, AttendanceStore, LeaveQuery, LeaveRequestStore, ProfileStore};

use super::attendance::AttendanceLedger;
use super::clock::Clock;
use super::leave::LeaveEngine;
use super::notifications::Notifier;

/// Rows shown in each section of the employee dashboard.
pub const DASHBOARD_LIST_LIMIT: usize = 5;

/// Organization-wide headline numbers for today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Active employees.
    pub total_employees: usize,
    /// Records for today with status `present`.
    pub present_today: usize,
    /// Active employees minus those present today, floored at zero.
    pub absent_today: usize,
    /// Requests awaiting review.
    pub pending_leaves: usize,
    /// Employees, active or not, who joined on or after the first of this
    /// month.
    pub new_hires: usize,
}

/// One employee's landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeDashboard {
    /// Today's attendance record, if any.
    pub today: Option<AttendanceRecord>,
    /// Remaining leave.
    pub leave_balance: LeaveBalance,
    /// Most recent leave requests.
    pub recent_leaves: Vec<LeaveRequest>,
    /// Most recent unread notifications.
    pub unread_notifications: Vec<Notification>,
}

/// Computes reports over the ledgers.
#[derive(Clone)]
pub struct ReportingAggregator {
    profiles: Arc<dyn ProfileStore>,
    attendance: Arc<dyn AttendanceStore>,
    requests: Arc<dyn LeaveRequestStore>,
    ledger: AttendanceLedger,
    leave: LeaveEngine,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    default_months: u32,
}

impl ReportingAggregator {
    /// Creates an aggregator. `default_months` is the attendance trend
    /// window used when none is requested.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        attendance: Arc<dyn AttendanceStore>,
        requests: Arc<dyn LeaveRequestStore>,
        ledger: AttendanceLedger,
        leave: LeaveEngine,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
        default_months: u32,
    ) -> Self {
        Self {
            profiles,
            attendance,
            requests,
            ledger,
            leave,
            notifier,
            clock,
            default_months,
        }
    }

    /// Present and absent record counts for the `months` months ending with
    /// the current one, oldest first.
    pub fn attendance_by_month(&self, months: Option<u32>) -> EngineResult<Vec<MonthlyAttendanceCount>> {
        let months = trailing_months(
            YearMonth::of(self.clock.today()),
            months.unwrap_or(self.default_months),
        );
        let (Some(first), Some(last)) = (months.first(), months.last()) else {
            return Ok(Vec::new());
        };

        let records = self.attendance.list_attendance(&AttendanceQuery::for_everyone(
            first.first_day(),
            last.last_day(),
        ))?;
        Ok(months
            .iter()
            .map(|month| count_month_attendance(*month, &records))
            .collect())
    }

    /// Approved request counts per leave type.
    pub fn leave_distribution(&self) -> EngineResult<Vec<LeaveTypeCount>> {
        let approved = self.requests.list_leave_requests(&LeaveQuery {
            status: Some(LeaveStatus::Approved),
            ..Default::default()
        })?;
        Ok(leave_distribution(&approved))
    }

    /// Active headcount per department.
    pub fn department_distribution(&self) -> EngineResult<Vec<DepartmentCount>> {
        let profiles = self.profiles.list_profiles()?;
        Ok(department_distribution(&profiles))
    }

    /// Headline numbers for the admin dashboard.
    pub fn summary(&self) -> EngineResult<DashboardSummary> {
        let today = self.clock.today();
        let month_start = YearMonth::of(today).first_day();

        let profiles = self.profiles.list_profiles()?;
        let active = profiles.iter().filter(|p| p.is_active).count();
        let present_today = self
            .attendance
            .count_attendance(today, Some(AttendanceStatus::Present))?;
        let pending_leaves = self
            .requests
            .count_leave_requests(Some(LeaveStatus::Pending))?;
        let new_hires = profiles
            .iter()
            .filter(|p| p.date_of_joining.is_some_and(|d| d >= month_start))
            .count();

        Ok(DashboardSummary {
            total_employees: active,
            present_today,
            absent_today: active.saturating_sub(present_today),
            pending_leaves,
            new_hires,
        })
    }

    /// Landing page data for `user_id`.
    pub fn employee_dashboard(&self, user_id: Uuid) -> EngineResult<EmployeeDashboard> {
        Ok(EmployeeDashboard {
            today: self.ledger.today(user_id)?,
            leave_balance: self.leave.balance(user_id)?,
            recent_leaves: self
                .leave
                .list_for_user(user_id, Some(DASHBOARD_LIST_LIMIT))?,
            unread_notifications: self
                .notifier
                .list(user_id, true, Some(DASHBOARD_LIST_LIMIT))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::FixedClock;
    use crate::engine::leave::NewLeaveRequest;
    use crate::models::{LeaveType, NotificationKind, Profile};
    use crate::store::InMemoryStore;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct Fixture {
        reports: ReportingAggregator,
        ledger: AttendanceLedger,
        leave: LeaveEngine,
        notifier: Notifier,
        store: Arc<InMemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap(),
        ));
        let ledger = AttendanceLedger::new(store.clone(), clock.clone());
        let notifier = Notifier::new(store.clone(), clock.clone());
        let leave = LeaveEngine::new(
            store.clone(),
            store.clone(),
            store.clone(),
            ledger.clone(),
            notifier.clone(),
            clock.clone(),
        );
        let reports = ReportingAggregator::new(
            store.clone(),
            store.clone(),
            store.clone(),
            ledger.clone(),
            leave.clone(),
            notifier.clone(),
            clock,
            6,
        );
        Fixture {
            reports,
            ledger,
            leave,
            notifier,
            store,
        }
    }

    fn add_profile(
        store: &InMemoryStore,
        department: Option<&str>,
        is_active: bool,
        joined: Option<&str>,
    ) -> Uuid {
        let profile = Profile {
            id: Uuid::new_v4(),
            employee_id: "EMP".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: "test@example.com".to_string(),
            department: department.map(str::to_string),
            designation: None,
            date_of_joining: joined.map(date),
            is_active,
            phone: None,
            address: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        store.insert_profile(&profile).unwrap();
        profile.id
    }

    #[test]
    fn test_attendance_by_month_covers_trailing_window() {
        let f = fixture();
        let user = Uuid::new_v4();
        f.ledger.check_in(user, date("2024-03-11")).unwrap();
        f.ledger.mark_absent(user, date("2024-02-05")).unwrap();
        f.ledger.mark_absent(user, date("2023-09-05")).unwrap();

        let trend = f.reports.attendance_by_month(None).unwrap();
        let labels: Vec<&str> = trend.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        assert_eq!(trend[4].absent, 1);
        assert_eq!(trend[5].present, 1);
        assert_eq!(trend.iter().map(|m| m.absent).sum::<u32>(), 1);

        assert_eq!(f.reports.attendance_by_month(Some(2)).unwrap().len(), 2);
        assert!(f.reports.attendance_by_month(Some(0)).unwrap().is_empty());
    }

    #[test]
    fn test_leave_distribution_counts_approved_only() {
        let f = fixture();
        let user = Uuid::new_v4();
        let request = |leave_type| NewLeaveRequest {
            leave_type,
            start_date: date("2024-03-12"),
            end_date: date("2024-03-12"),
            reason: String::new(),
        };
        let a = f.leave.submit(user, request(LeaveType::Casual)).unwrap();
        let b = f.leave.submit(user, request(LeaveType::Paid)).unwrap();
        f.leave.submit(user, request(LeaveType::Sick)).unwrap();
        f.leave.approve(a.id, Uuid::new_v4(), None).unwrap();
        f.leave.reject(b.id, Uuid::new_v4(), None).unwrap();

        let counts: Vec<u32> = f
            .reports
            .leave_distribution()
            .unwrap()
            .iter()
            .map(|c| c.count)
            .collect();
        assert_eq!(counts, vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_summary_counts() {
        let f = fixture();
        let present = add_profile(&f.store, Some("Sales"), true, Some("2024-03-04"));
        let half = add_profile(&f.store, Some("Sales"), true, Some("2023-01-01"));
        add_profile(&f.store, None, true, None);
        add_profile(&f.store, Some("Sales"), false, Some("2024-03-05"));

        f.ledger.check_in(present, date("2024-03-11")).unwrap();
        f.store
            .insert_attendance(&AttendanceRecord::synthetic(
                half,
                date("2024-03-11"),
                AttendanceStatus::HalfDay,
            ))
            .unwrap();
        f.leave
            .submit(
                half,
                NewLeaveRequest {
                    leave_type: LeaveType::Paid,
                    start_date: date("2024-03-20"),
                    end_date: date("2024-03-21"),
                    reason: String::new(),
                },
            )
            .unwrap();

        let summary = f.reports.summary().unwrap();
        assert_eq!(
            summary,
            DashboardSummary {
                total_employees: 3,
                present_today: 1,
                absent_today: 2,
                pending_leaves: 1,
                new_hires: 2,
            }
        );
    }

    #[test]
    fn test_department_distribution_uses_active_profiles() {
        let f = fixture();
        add_profile(&f.store, Some("Sales"), true, None);
        add_profile(&f.store, None, true, None);
        add_profile(&f.store, Some("Finance"), false, None);

        let names: Vec<String> = f
            .reports
            .department_distribution()
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Sales", "Unassigned"]);
    }

    #[test]
    fn test_employee_dashboard_limits_lists() {
        let f = fixture();
        let user = Uuid::new_v4();
        f.ledger.check_in(user, date("2024-03-11")).unwrap();
        for i in 0..7 {
            f.notifier
                .emit(user, &format!("n{}", i), "m", NotificationKind::Info)
                .unwrap();
            f.leave
                .submit(
                    user,
                    NewLeaveRequest {
                        leave_type: LeaveType::Casual,
                        start_date: date("2024-04-01") + Duration::days(i),
                        end_date: date("2024-04-01") + Duration::days(i),
                        reason: String::new(),
                    },
                )
                .unwrap();
        }

        let dashboard = f.reports.employee_dashboard(user).unwrap();
        assert!(dashboard.today.is_some());
        assert_eq!(dashboard.leave_balance, LeaveBalance::empty(user));
        assert_eq!(dashboard.recent_leaves.len(), DASHBOARD_LIST_LIMIT);
        assert_eq!(dashboard.unread_notifications.len(), DASHBOARD_LIST_LIMIT);
    }
}
