//! Request bodies and query strings for the HR engine API.
//!
//! Bodies that map one-to-one onto engine inputs (`NewLeaveRequest`,
//! `NewEmployee`, `SalaryUpdate`, `ProfileUpdate`) are deserialized directly;
//! the types here cover the rest.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::LeaveFilter;
use crate::error::EngineResult;
use crate::models::{LeaveStatus, YearMonth};

/// Body of check-in and check-out. The date defaults to today; only hr and
/// admin callers may name another day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceDayRequest {
    /// The attendance day.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Body of `POST /attendance/:user_id/absent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAbsentRequest {
    /// The day to mark.
    pub date: NaiveDate,
}

/// `?start&end` for attendance listings. Defaults to the current month.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeQuery {
    /// First day (inclusive).
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// Last day (inclusive).
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// `?month=YYYY-MM`. Defaults to the current month.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthQuery {
    /// The month.
    #[serde(default)]
    pub month: Option<YearMonth>,
}

/// Body of approve and reject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Reviewer's comment.
    #[serde(default)]
    pub comment: Option<String>,
}

/// `?status&search` for the leave listing. `status=all` lists every state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveListQuery {
    /// `pending`, `approved`, `rejected` or `all`.
    #[serde(default)]
    pub status: Option<String>,
    /// Requester name or employee id substring.
    #[serde(default)]
    pub search: Option<String>,
}

impl LeaveListQuery {
    /// Converts to the engine filter, rejecting unknown statuses.
    pub fn into_filter(self) -> EngineResult<LeaveFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(s) => Some(s.parse::<LeaveStatus>()?),
        };
        Ok(LeaveFilter {
            status,
            search: self.search.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// `?unread&limit` for the notification inbox.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationQuery {
    /// Only unread notifications.
    #[serde(default)]
    pub unread: bool,
    /// Maximum rows.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// `?months` for the attendance trend report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendQuery {
    /// Trailing months to include.
    #[serde(default)]
    pub months: Option<u32>,
}

/// Body of `POST /employees/:id/active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationRequest {
    /// The new active flag.
    pub is_active: bool,
}
