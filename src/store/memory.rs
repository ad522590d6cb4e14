//! In-process record store.
//!
//! Each table sits behind its own `RwLock`. Leave balances share a lock with
//! the applied-deduction markers so a deduction and its marker commit
//! together. A poisoned lock surfaces as a permanent storage error.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceStatus, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType,
    Notification, Profile, SalaryStructure, UserRole,
};

use super::{
    AttendanceQuery, AttendanceStore, LeaveBalanceStore, LeaveQuery, LeaveRequestStore,
    NotificationStore, ProfileStore, SalaryStore, SortOrder,
};

#[derive(Debug, Default)]
struct BalanceTable {
    balances: HashMap<Uuid, LeaveBalance>,
    applied: HashSet<Uuid>,
}

/// A [`Send`] + [`Sync`] store keeping every table in memory.
///
/// Used by the HTTP binary and by tests. Data does not survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    roles: RwLock<HashMap<Uuid, UserRole>>,
    attendance: RwLock<BTreeMap<(Uuid, NaiveDate), AttendanceRecord>>,
    leave_requests: RwLock<HashMap<Uuid, LeaveRequest>>,
    leave_balances: RwLock<BalanceTable>,
    salaries: RwLock<HashMap<Uuid, SalaryStructure>>,
    notifications: RwLock<HashMap<Uuid, Notification>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<'a, T>(lock: &'a RwLock<T>, table: &str) -> EngineResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| poisoned(table))
}

fn write<'a, T>(lock: &'a RwLock<T>, table: &str) -> EngineResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| poisoned(table))
}

fn poisoned(table: &str) -> EngineError {
    EngineError::Storage {
        message: format!("{} table lock poisoned", table),
        transient: false,
    }
}

fn take<T>(rows: impl Iterator<Item = T>, limit: Option<usize>) -> Vec<T> {
    match limit {
        Some(n) => rows.take(n).collect(),
        None => rows.collect(),
    }
}

impl ProfileStore for InMemoryStore {
    fn get_profile(&self, id: Uuid) -> EngineResult<Option<Profile>> {
        Ok(read(&self.profiles, "profiles")?.get(&id).cloned())
    }

    fn insert_profile(&self, profile: &Profile) -> EngineResult<bool> {
        let mut profiles = write(&self.profiles, "profiles")?;
        if profiles.contains_key(&profile.id) {
            return Ok(false);
        }
        profiles.insert(profile.id, profile.clone());
        Ok(true)
    }

    fn update_profile(&self, profile: &Profile) -> EngineResult<()> {
        let mut profiles = write(&self.profiles, "profiles")?;
        match profiles.get_mut(&profile.id) {
            Some(existing) => {
                *existing = profile.clone();
                Ok(())
            }
            None => Err(EngineError::NotFound {
                entity: "profile",
                key: profile.id.to_string(),
            }),
        }
    }

    fn list_profiles(&self) -> EngineResult<Vec<Profile>> {
        let mut profiles: Vec<Profile> =
            read(&self.profiles, "profiles")?.values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(profiles)
    }

    fn get_role(&self, user_id: Uuid) -> EngineResult<Option<UserRole>> {
        Ok(read(&self.roles, "roles")?.get(&user_id).copied())
    }

    fn set_role(&self, user_id: Uuid, role: UserRole) -> EngineResult<()> {
        write(&self.roles, "roles")?.insert(user_id, role);
        Ok(())
    }
}

impl AttendanceStore for InMemoryStore {
    fn get_attendance(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<Option<AttendanceRecord>> {
        Ok(read(&self.attendance, "attendance")?
            .get(&(user_id, date))
            .cloned())
    }

    fn insert_attendance(&self, record: &AttendanceRecord) -> EngineResult<bool> {
        let mut rows = write(&self.attendance, "attendance")?;
        let key = (record.user_id, record.date);
        if rows.contains_key(&key) {
            return Ok(false);
        }
        rows.insert(key, record.clone());
        Ok(true)
    }

    fn update_attendance(&self, record: &AttendanceRecord) -> EngineResult<()> {
        let mut rows = write(&self.attendance, "attendance")?;
        match rows.get_mut(&(record.user_id, record.date)) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(EngineError::NotFound {
                entity: "attendance record",
                key: format!("{}/{}", record.user_id, record.date),
            }),
        }
    }

    fn list_attendance(&self, query: &AttendanceQuery) -> EngineResult<Vec<AttendanceRecord>> {
        if query.end < query.start {
            return Ok(Vec::new());
        }
        let rows = read(&self.attendance, "attendance")?;
        let mut matched: Vec<AttendanceRecord> = match query.user_id {
            Some(user_id) => rows
                .range((user_id, query.start)..=(user_id, query.end))
                .map(|(_, r)| r.clone())
                .collect(),
            None => rows
                .values()
                .filter(|r| r.date >= query.start && r.date <= query.end)
                .cloned()
                .collect(),
        };

        matched.sort_by(|a, b| a.date.cmp(&b.date).then(a.user_id.cmp(&b.user_id)));
        if query.order == SortOrder::Descending {
            matched.reverse();
        }
        Ok(take(matched.into_iter(), query.limit))
    }

    fn count_attendance(
        &self,
        date: NaiveDate,
        status: Option<AttendanceStatus>,
    ) -> EngineResult<usize> {
        Ok(read(&self.attendance, "attendance")?
            .values()
            .filter(|r| r.date == date && status.is_none_or(|s| r.status == s))
            .count())
    }
}

impl LeaveRequestStore for InMemoryStore {
    fn get_leave_request(&self, id: Uuid) -> EngineResult<Option<LeaveRequest>> {
        Ok(read(&self.leave_requests, "leave_requests")?
            .get(&id)
            .cloned())
    }

    fn insert_leave_request(&self, request: &LeaveRequest) -> EngineResult<()> {
        write(&self.leave_requests, "leave_requests")?.insert(request.id, request.clone());
        Ok(())
    }

    fn update_leave_request_if(
        &self,
        request: &LeaveRequest,
        expected: LeaveStatus,
    ) -> EngineResult<bool> {
        let mut requests = write(&self.leave_requests, "leave_requests")?;
        match requests.get_mut(&request.id) {
            Some(existing) if existing.status == expected => {
                *existing = request.clone();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(EngineError::NotFound {
                entity: "leave request",
                key: request.id.to_string(),
            }),
        }
    }

    fn list_leave_requests(&self, query: &LeaveQuery) -> EngineResult<Vec<LeaveRequest>> {
        let requests = read(&self.leave_requests, "leave_requests")?;
        let mut matched: Vec<LeaveRequest> = requests
            .values()
            .filter(|r| query.user_id.is_none_or(|u| r.user_id == u))
            .filter(|r| query.status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(take(matched.into_iter(), query.limit))
    }

    fn count_leave_requests(&self, status: Option<LeaveStatus>) -> EngineResult<usize> {
        Ok(read(&self.leave_requests, "leave_requests")?
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .count())
    }
}

impl LeaveBalanceStore for InMemoryStore {
    fn get_leave_balance(&self, user_id: Uuid) -> EngineResult<Option<LeaveBalance>> {
        Ok(read(&self.leave_balances, "leave_balances")?
            .balances
            .get(&user_id)
            .cloned())
    }

    fn put_leave_balance(&self, balance: &LeaveBalance) -> EngineResult<()> {
        write(&self.leave_balances, "leave_balances")?
            .balances
            .insert(balance.user_id, balance.clone());
        Ok(())
    }

    fn apply_leave_deduction(
        &self,
        request_id: Uuid,
        user_id: Uuid,
        leave_type: LeaveType,
        days: u32,
    ) -> EngineResult<Option<LeaveBalance>> {
        let mut table = write(&self.leave_balances, "leave_balances")?;
        if table.applied.contains(&request_id) {
            return Ok(None);
        }
        let balance = table
            .balances
            .entry(user_id)
            .or_insert_with(|| LeaveBalance::empty(user_id));
        balance.deduct(leave_type, days);
        let updated = balance.clone();
        table.applied.insert(request_id);
        Ok(Some(updated))
    }

    fn deduction_applied(&self, request_id: Uuid) -> EngineResult<bool> {
        Ok(read(&self.leave_balances, "leave_balances")?
            .applied
            .contains(&request_id))
    }
}

impl SalaryStore for InMemoryStore {
    fn get_salary(&self, user_id: Uuid) -> EngineResult<Option<SalaryStructure>> {
        Ok(read(&self.salaries, "salaries")?.get(&user_id).cloned())
    }

    fn put_salary(&self, structure: &SalaryStructure) -> EngineResult<()> {
        write(&self.salaries, "salaries")?.insert(structure.user_id, structure.clone());
        Ok(())
    }
}

impl NotificationStore for InMemoryStore {
    fn insert_notification(&self, notification: &Notification) -> EngineResult<()> {
        write(&self.notifications, "notifications")?
            .insert(notification.id, notification.clone());
        Ok(())
    }

    fn get_notification(&self, id: Uuid) -> EngineResult<Option<Notification>> {
        Ok(read(&self.notifications, "notifications")?
            .get(&id)
            .cloned())
    }

    fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: Option<usize>,
    ) -> EngineResult<Vec<Notification>> {
        let notifications = read(&self.notifications, "notifications")?;
        let mut matched: Vec<Notification> = notifications
            .values()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(take(matched.into_iter(), limit))
    }

    fn mark_notification_read(&self, id: Uuid) -> EngineResult<Option<Notification>> {
        let mut notifications = write(&self.notifications, "notifications")?;
        Ok(notifications.get_mut(&id).map(|n| {
            n.is_read = true;
            n.clone()
        }))
    }

    fn mark_all_notifications_read(&self, user_id: Uuid) -> EngineResult<usize> {
        let mut notifications = write(&self.notifications, "notifications")?;
        let mut changed = 0;
        for notification in notifications
            .values_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    fn count_unread_notifications(&self, user_id: Uuid) -> EngineResult<usize> {
        Ok(read(&self.notifications, "notifications")?
            .values()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count())
    }
}
