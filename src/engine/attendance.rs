//! Attendance ledger.
//!
//! Per-user, per-day records. Check-in opens a record, check-out closes it
//! and applies the half-day rule unless the day is already leave. Leave approval and absence marking upsert
//! synthetic records without touching check-in data.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculation::{AttendanceSummary, elapsed_hours, status_for_hours};
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, YearMonth};
use crate::store::{AttendanceQuery, AttendanceStore};

use super::clock::Clock;

/// Records check-ins, check-outs, leave days and absences.
#[derive(Clone)]
pub struct AttendanceLedger {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
}

impl AttendanceLedger {
    /// Creates a ledger over `store`.
    pub fn new(store: Arc<dyn AttendanceStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Opens the day for `user_id` with `check_in = now`.
    ///
    /// Fails with `InvalidInput` for a future date or for a day already
    /// recorded as leave or absent, and with `DuplicateCheckIn` if the user
    /// already checked in on `date`.
    pub fn check_in(&self, user_id: Uuid, date: NaiveDate) -> EngineResult<AttendanceRecord> {
        let today = self.clock.today();
        if date > today {
            return Err(EngineError::InvalidInput {
                field: "date".to_string(),
                message: format!("cannot check in for {}, today is {}", date, today),
            });
        }

        if let Some(existing) = self.store.get_attendance(user_id, date)? {
            if existing.check_in.is_some() {
                return Err(EngineError::DuplicateCheckIn { user_id, date });
            }
            return Err(EngineError::InvalidInput {
                field: "date".to_string(),
                message: format!("{} is already recorded as {}", date, existing.status),
            });
        }

        let now = self.clock.now();
        let record = AttendanceRecord::checked_in(user_id, date, now);
        if !self.store.insert_attendance(&record)? {
            return Err(EngineError::DuplicateCheckIn { user_id, date });
        }
        info!(user_id = %user_id, date = %date, "Checked in");
        Ok(record)
    }

    /// Closes the open record for `(user_id, date)`.
    ///
    /// Stores the elapsed hours rounded to 2 dp and sets the status to
    /// `half_day` below 4 hours, `present` otherwise. A day approved as leave
    /// while checked in stays `leave`.
    pub fn check_out(&self, user_id: Uuid, date: NaiveDate) -> EngineResult<AttendanceRecord> {
        let mut record = self
            .store
            .get_attendance(user_id, date)?
            .filter(AttendanceRecord::is_open)
            .ok_or(EngineError::NoActiveCheckIn { user_id, date })?;
        let check_in = record
            .check_in
            .ok_or(EngineError::NoActiveCheckIn { user_id, date })?;

        let now = self.clock.now();
        let hours = elapsed_hours(check_in, now)?;
        record.check_out = Some(now);
        record.total_hours = Some(hours);
        if record.status != AttendanceStatus::Leave {
            record.status = status_for_hours(hours);
        }
        self.store.update_attendance(&record)?;

        info!(
            user_id = %user_id,
            date = %date,
            hours = %hours,
            status = %record.status,
            "Checked out"
        );
        Ok(record)
    }

    /// Marks `(user_id, date)` as leave.
    ///
    /// Overwrites only the status of an existing record; creates a bare
    /// leave record otherwise. Calling it twice leaves the same state.
    pub fn mark_as_leave(&self, user_id: Uuid, date: NaiveDate) -> EngineResult<AttendanceRecord> {
        // A concurrent insert can win between the lookup and our insert;
        // the second pass then finds it and updates it.
        for _ in 0..2 {
            match self.store.get_attendance(user_id, date)? {
                Some(record) if record.status == AttendanceStatus::Leave => return Ok(record),
                Some(mut record) => {
                    record.status = AttendanceStatus::Leave;
                    self.store.update_attendance(&record)?;
                    debug!(user_id = %user_id, date = %date, "Existing record marked as leave");
                    return Ok(record);
                }
                None => {
                    let record =
                        AttendanceRecord::synthetic(user_id, date, AttendanceStatus::Leave);
                    if self.store.insert_attendance(&record)? {
                        debug!(user_id = %user_id, date = %date, "Leave record created");
                        return Ok(record);
                    }
                }
            }
        }
        Err(EngineError::Storage {
            message: format!("attendance row for {}/{} changed concurrently", user_id, date),
            transient: true,
        })
    }

    /// Records an explicit absence for `(user_id, date)`.
    ///
    /// Only creates a record when none exists; an existing record is
    /// returned unchanged.
    pub fn mark_absent(&self, user_id: Uuid, date: NaiveDate) -> EngineResult<AttendanceRecord> {
        if let Some(existing) = self.store.get_attendance(user_id, date)? {
            return Ok(existing);
        }

        let record = AttendanceRecord::synthetic(user_id, date, AttendanceStatus::Absent);
        if self.store.insert_attendance(&record)? {
            info!(user_id = %user_id, date = %date, "Marked absent");
            return Ok(record);
        }
        self.store
            .get_attendance(user_id, date)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "attendance record",
                key: format!("{}/{}", user_id, date),
            })
    }

    /// Records for `user_id` in `[start, end]`, newest first.
    pub fn get_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        if end < start {
            return Err(EngineError::InvalidRange { start, end });
        }
        self.store
            .list_attendance(&AttendanceQuery::for_user(user_id, start, end))
    }

    /// The record for `(user_id, date)`, if any.
    pub fn get(&self, user_id: Uuid, date: NaiveDate) -> EngineResult<Option<AttendanceRecord>> {
        self.store.get_attendance(user_id, date)
    }

    /// Today's record for `user_id`, if any.
    pub fn today(&self, user_id: Uuid) -> EngineResult<Option<AttendanceRecord>> {
        self.store.get_attendance(user_id, self.clock.today())
    }

    /// The ledger's current date.
    pub fn current_date(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Status counts and total hours for `user_id` over `month`.
    pub fn monthly_summary(&self, user_id: Uuid, month: YearMonth) -> EngineResult<AttendanceSummary> {
        let records = self.get_range(user_id, month.first_day(), month.last_day())?;
        Ok(AttendanceSummary::from_records(&records))
    }
}
