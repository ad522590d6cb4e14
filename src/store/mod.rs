//! Storage abstraction.
//!
//! One repository trait per entity. The engines depend only on these traits,
//! so any record store offering point lookup, ordered range queries, insert,
//! update-by-key and filtered counts can back them. Every method is a single
//! round trip and is atomic at the single-row level only.

mod memory;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, AttendanceStatus, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType,
    Notification, Profile, SalaryStructure, UserRole,
};

pub use memory::InMemoryStore;

/// Sort direction for range queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

/// Range query over attendance rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceQuery {
    /// Restrict to one user; `None` spans every user.
    pub user_id: Option<Uuid>,
    /// First date (inclusive).
    pub start: NaiveDate,
    /// Last date (inclusive).
    pub end: NaiveDate,
    /// Order by date.
    pub order: SortOrder,
    /// Maximum rows returned.
    pub limit: Option<usize>,
}

impl AttendanceQuery {
    /// All rows for one user in `[start, end]`, newest first.
    pub fn for_user(user_id: Uuid, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            user_id: Some(user_id),
            start,
            end,
            order: SortOrder::Descending,
            limit: None,
        }
    }

    /// All rows for every user in `[start, end]`, newest first.
    pub fn for_everyone(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            user_id: None,
            start,
            end,
            order: SortOrder::Descending,
            limit: None,
        }
    }
}

/// Filter for leave request listings. Results are newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveQuery {
    /// Restrict to one requester.
    pub user_id: Option<Uuid>,
    /// Restrict to one status.
    pub status: Option<LeaveStatus>,
    /// Maximum rows returned.
    pub limit: Option<usize>,
}

/// Profiles and roles.
pub trait ProfileStore: Send + Sync {
    /// Looks up a profile by user id.
    fn get_profile(&self, id: Uuid) -> EngineResult<Option<Profile>>;

    /// Inserts a new profile. Returns false if the id is taken.
    fn insert_profile(&self, profile: &Profile) -> EngineResult<bool>;

    /// Overwrites an existing profile; `NotFound` if absent.
    fn update_profile(&self, profile: &Profile) -> EngineResult<()>;

    /// Every profile, newest registration first.
    fn list_profiles(&self) -> EngineResult<Vec<Profile>>;

    /// Looks up a user's role.
    fn get_role(&self, user_id: Uuid) -> EngineResult<Option<UserRole>>;

    /// Sets a user's role.
    fn set_role(&self, user_id: Uuid, role: UserRole) -> EngineResult<()>;
}

/// Attendance rows, unique per `(user_id, date)`.
pub trait AttendanceStore: Send + Sync {
    /// Looks up the row for `(user_id, date)`.
    fn get_attendance(&self, user_id: Uuid, date: NaiveDate)
    -> EngineResult<Option<AttendanceRecord>>;

    /// Inserts a row. Returns false if `(user_id, date)` already has one.
    fn insert_attendance(&self, record: &AttendanceRecord) -> EngineResult<bool>;

    /// Overwrites the row keyed by `(user_id, date)`; `NotFound` if absent.
    fn update_attendance(&self, record: &AttendanceRecord) -> EngineResult<()>;

    /// Rows matching `query`.
    fn list_attendance(&self, query: &AttendanceQuery) -> EngineResult<Vec<AttendanceRecord>>;

    /// Counts rows on `date`, optionally with a given status.
    fn count_attendance(
        &self,
        date: NaiveDate,
        status: Option<AttendanceStatus>,
    ) -> EngineResult<usize>;
}

/// Leave requests.
pub trait LeaveRequestStore: Send + Sync {
    /// Looks up a request by id.
    fn get_leave_request(&self, id: Uuid) -> EngineResult<Option<LeaveRequest>>;

    /// Inserts a new request.
    fn insert_leave_request(&self, request: &LeaveRequest) -> EngineResult<()>;

    /// Overwrites the stored request only if its current status is
    /// `expected`. Returns false when the status no longer matches.
    fn update_leave_request_if(
        &self,
        request: &LeaveRequest,
        expected: LeaveStatus,
    ) -> EngineResult<bool>;

    /// Requests matching `query`, newest first.
    fn list_leave_requests(&self, query: &LeaveQuery) -> EngineResult<Vec<LeaveRequest>>;

    /// Counts requests, optionally with a given status.
    fn count_leave_requests(&self, status: Option<LeaveStatus>) -> EngineResult<usize>;
}

/// Leave balances and the per-request deduction marker.
pub trait LeaveBalanceStore: Send + Sync {
    /// Looks up a user's balance.
    fn get_leave_balance(&self, user_id: Uuid) -> EngineResult<Option<LeaveBalance>>;

    /// Inserts or overwrites a balance.
    fn put_leave_balance(&self, balance: &LeaveBalance) -> EngineResult<()>;

    /// Deducts `days` from the user's `leave_type` counter, floored at zero,
    /// unless a deduction was already recorded for `request_id`.
    ///
    /// The marker check, the deduction and recording the marker happen as
    /// one step. Returns the new balance, or `None` if the marker was
    /// already present. A missing balance is treated as all zeros.
    fn apply_leave_deduction(
        &self,
        request_id: Uuid,
        user_id: Uuid,
        leave_type: LeaveType,
        days: u32,
    ) -> EngineResult<Option<LeaveBalance>>;

    /// Returns true if a deduction was recorded for `request_id`.
    fn deduction_applied(&self, request_id: Uuid) -> EngineResult<bool>;
}

/// Salary structures, one per user, no history.
pub trait SalaryStore: Send + Sync {
    /// Looks up a user's salary structure.
    fn get_salary(&self, user_id: Uuid) -> EngineResult<Option<SalaryStructure>>;

    /// Inserts or overwrites a salary structure.
    fn put_salary(&self, structure: &SalaryStructure) -> EngineResult<()>;
}

/// Notifications.
pub trait NotificationStore: Send + Sync {
    /// Inserts a notification.
    fn insert_notification(&self, notification: &Notification) -> EngineResult<()>;

    /// Looks up a notification by id.
    fn get_notification(&self, id: Uuid) -> EngineResult<Option<Notification>>;

    /// A user's notifications, newest first.
    fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: Option<usize>,
    ) -> EngineResult<Vec<Notification>>;

    /// Marks one notification read. Returns the updated row, or `None` if it
    /// does not exist.
    fn mark_notification_read(&self, id: Uuid) -> EngineResult<Option<Notification>>;

    /// Marks every unread notification of `user_id` read; returns how many
    /// changed.
    fn mark_all_notifications_read(&self, user_id: Uuid) -> EngineResult<usize>;

    /// Counts a user's unread notifications.
    fn count_unread_notifications(&self, user_id: Uuid) -> EngineResult<usize>;
}
