//! Leave request lifecycle and balances.
//!
//! A request is created `pending` and moves once to `approved` or
//! `rejected`. Approval runs as an ordered sequence rather than a
//! transaction:
//!
//! 1. the status transition, guarded by a conditional update on `pending`;
//! 2. idempotent attendance upserts for every day of the span, retried on
//!    transient storage failures;
//! 3. the balance deduction, guarded by a per-request marker so it lands at
//!    most once;
//! 4. a best-effort notification.
//!
//! If step 2 or 3 fails the request stays approved and
//! [`LeaveEngine::reapply_approval`] finishes the job.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{days_between_inclusive, enumerate_dates};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType, NotificationKind,
    Profile,
};
use crate::store::{LeaveBalanceStore, LeaveQuery, LeaveRequestStore, ProfileStore};

use super::attendance::AttendanceLedger;
use super::clock::Clock;
use super::notifications::Notifier;
use super::retry::retry_idempotent;

/// A leave application as submitted by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeaveRequest {
    /// Kind of leave.
    pub leave_type: LeaveType,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Free-text reason.
    #[serde(default)]
    pub reason: String,
}

/// Read-side filter for leave listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveFilter {
    /// Only requests in this state; `None` for all.
    pub status: Option<LeaveStatus>,
    /// Case-insensitive substring over the requester's name and employee id.
    pub search: Option<String>,
}

/// The requester fields shown next to a leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequesterSummary {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Organization-assigned employee id.
    pub employee_id: String,
    /// Department, if assigned.
    pub department: Option<String>,
}

impl From<&Profile> for RequesterSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            employee_id: profile.employee_id.clone(),
            department: profile.department.clone(),
        }
    }
}

impl RequesterSummary {
    fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || [&self.first_name, &self.last_name, &self.employee_id]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// A leave request with its requester and day count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveRequestView {
    /// The request.
    #[serde(flatten)]
    pub request: LeaveRequest,
    /// The requester, if their profile exists.
    pub requester: Option<RequesterSummary>,
    /// Calendar days covered, inclusive.
    pub days: u32,
}

/// What applying an approval's side effects did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalEffects {
    /// Calendar days covered by the request.
    pub days: u32,
    /// The attendance records now marked as leave.
    pub attendance: Vec<AttendanceRecord>,
    /// The balance after deduction, or `None` if it had already been
    /// deducted for this request.
    pub balance: Option<LeaveBalance>,
}

/// Runs the leave request state machine.
#[derive(Clone)]
pub struct LeaveEngine {
    requests: Arc<dyn LeaveRequestStore>,
    balances: Arc<dyn LeaveBalanceStore>,
    profiles: Arc<dyn ProfileStore>,
    ledger: AttendanceLedger,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl LeaveEngine {
    /// Creates a leave engine.
    pub fn new(
        requests: Arc<dyn LeaveRequestStore>,
        balances: Arc<dyn LeaveBalanceStore>,
        profiles: Arc<dyn ProfileStore>,
        ledger: AttendanceLedger,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            requests,
            balances,
            profiles,
            ledger,
            notifier,
            clock,
        }
    }

    /// Files a pending request for `user_id`.
    ///
    /// The balance is not consulted. Fails with `InvalidRange` if the end
    /// date precedes the start date.
    pub fn submit(&self, user_id: Uuid, new: NewLeaveRequest) -> EngineResult<LeaveRequest> {
        let days = days_between_inclusive(new.start_date, new.end_date)?;

        let request = LeaveRequest {
            id: Uuid::new_v4(),
            user_id,
            leave_type: new.leave_type,
            start_date: new.start_date,
            end_date: new.end_date,
            reason: new.reason.trim().to_string(),
            status: LeaveStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_comments: None,
            created_at: self.clock.now(),
        };
        self.requests.insert_leave_request(&request)?;

        info!(
            request_id = %request.id,
            user_id = %user_id,
            leave_type = %request.leave_type,
            days,
            "Leave request submitted"
        );
        Ok(request)
    }

    /// Approves a pending request and applies its effects.
    ///
    /// If the effects fail part way, the error is returned but the request
    /// stays approved; call [`LeaveEngine::reapply_approval`] to finish.
    pub fn approve(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
        comment: Option<String>,
    ) -> EngineResult<LeaveRequest> {
        let request = self.review(request_id, reviewer_id, comment, LeaveStatus::Approved)?;

        let effects = self.apply_approval(&request).inspect_err(|error| {
            warn!(
                request_id = %request_id,
                error = %error,
                "Leave approved but effects incomplete"
            );
        })?;

        self.notifier.emit_best_effort(
            request.user_id,
            "Leave Approved",
            &format!(
                "Your {} leave from {} to {} has been approved.",
                request.leave_type, request.start_date, request.end_date
            ),
            NotificationKind::Success,
        );

        info!(
            request_id = %request_id,
            reviewer_id = %reviewer_id,
            days = effects.days,
            "Leave request approved"
        );
        Ok(request)
    }

    /// Rejects a pending request. Balances and attendance are untouched.
    pub fn reject(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
        comment: Option<String>,
    ) -> EngineResult<LeaveRequest> {
        let request = self.review(request_id, reviewer_id, comment, LeaveStatus::Rejected)?;

        self.notifier.emit_best_effort(
            request.user_id,
            "Leave Rejected",
            &format!(
                "Your {} leave from {} to {} has been rejected.",
                request.leave_type, request.start_date, request.end_date
            ),
            NotificationKind::Error,
        );

        info!(request_id = %request_id, reviewer_id = %reviewer_id, "Leave request rejected");
        Ok(request)
    }

    /// Re-runs the attendance upserts and the marker-guarded deduction of an
    /// approved request. Safe to call any number of times.
    pub fn reapply_approval(&self, request_id: Uuid) -> EngineResult<ApprovalEffects> {
        let request = self.get(request_id)?;
        if request.status != LeaveStatus::Approved {
            return Err(EngineError::InvalidInput {
                field: "status".to_string(),
                message: format!("leave request is {}, not approved", request.status),
            });
        }
        let effects = self.apply_approval(&request)?;
        info!(
            request_id = %request_id,
            deducted = effects.balance.is_some(),
            "Approval effects re-applied"
        );
        Ok(effects)
    }

    fn review(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
        comment: Option<String>,
        outcome: LeaveStatus,
    ) -> EngineResult<LeaveRequest> {
        let mut request = self.get(request_id)?;
        if request.status.is_terminal() {
            return Err(EngineError::AlreadyReviewed {
                request_id,
                status: request.status,
            });
        }

        request.status = outcome;
        request.reviewed_by = Some(reviewer_id);
        request.reviewed_at = Some(self.clock.now());
        request.review_comments = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        if !self
            .requests
            .update_leave_request_if(&request, LeaveStatus::Pending)?
        {
            let current = self.get(request_id)?;
            return Err(EngineError::AlreadyReviewed {
                request_id,
                status: current.status,
            });
        }
        Ok(request)
    }

    fn apply_approval(&self, request: &LeaveRequest) -> EngineResult<ApprovalEffects> {
        let span = enumerate_dates(request.start_date, request.end_date)?;

        let mut attendance = Vec::with_capacity(span.len() as usize);
        for date in span {
            let record = retry_idempotent("mark_as_leave", || {
                self.ledger.mark_as_leave(request.user_id, date)
            })?;
            attendance.push(record);
        }

        let days = span.len();
        let balance = retry_idempotent("apply_leave_deduction", || {
            self.balances.apply_leave_deduction(
                request.id,
                request.user_id,
                request.leave_type,
                days,
            )
        })?;

        Ok(ApprovalEffects {
            days,
            attendance,
            balance,
        })
    }

    /// Looks up a request; `NotFound` if it does not exist.
    pub fn get(&self, request_id: Uuid) -> EngineResult<LeaveRequest> {
        self.requests
            .get_leave_request(request_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "leave request",
                key: request_id.to_string(),
            })
    }

    /// Every request matching `filter`, newest first, with requester details.
    pub fn list(&self, filter: &LeaveFilter) -> EngineResult<Vec<LeaveRequestView>> {
        let requests = self.requests.list_leave_requests(&LeaveQuery {
            status: filter.status,
            ..Default::default()
        })?;
        let profiles: HashMap<Uuid, Profile> = self
            .profiles
            .list_profiles()?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut views = Vec::with_capacity(requests.len());
        for request in requests {
            let requester = profiles.get(&request.user_id).map(RequesterSummary::from);
            if let Some(needle) = filter.search.as_deref() {
                if !requester.as_ref().is_some_and(|r| r.matches(needle)) {
                    continue;
                }
            }
            let days = request.day_count()?;
            views.push(LeaveRequestView {
                request,
                requester,
                days,
            });
        }
        Ok(views)
    }

    /// `user_id`'s own requests, newest first.
    pub fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<usize>,
    ) -> EngineResult<Vec<LeaveRequest>> {
        self.requests.list_leave_requests(&LeaveQuery {
            user_id: Some(user_id),
            status: None,
            limit,
        })
    }

    /// `user_id`'s remaining balance; all zeros if none was provisioned.
    pub fn balance(&self, user_id: Uuid) -> EngineResult<LeaveBalance> {
        Ok(self
            .balances
            .get_leave_balance(user_id)?
            .unwrap_or_else(|| LeaveBalance::empty(user_id)))
    }
}
