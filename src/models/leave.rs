//! Leave request and leave balance models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::days_between_inclusive;
use crate::error::{EngineError, EngineResult};

/// The kind of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Paid (earned) leave.
    Paid,
    /// Sick leave.
    Sick,
    /// Casual leave.
    Casual,
    /// Unpaid leave; tracked but not capped.
    Unpaid,
}

impl LeaveType {
    /// Every leave type, in display order.
    pub const ALL: [LeaveType; 4] = [
        LeaveType::Paid,
        LeaveType::Sick,
        LeaveType::Casual,
        LeaveType::Unpaid,
    ];

    /// The balance column this type deducts from (`<type>_leave`).
    pub fn balance_column(&self) -> &'static str {
        match self {
            LeaveType::Paid => "paid_leave",
            LeaveType::Sick => "sick_leave",
            LeaveType::Casual => "casual_leave",
            LeaveType::Unpaid => "unpaid_leave",
        }
    }

    /// Capitalized label for reports (e.g. "Sick").
    pub fn label(&self) -> &'static str {
        match self {
            LeaveType::Paid => "Paid",
            LeaveType::Sick => "Sick",
            LeaveType::Casual => "Casual",
            LeaveType::Unpaid => "Unpaid",
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveType::Paid => write!(f, "paid"),
            LeaveType::Sick => write!(f, "sick"),
            LeaveType::Casual => write!(f, "casual"),
            LeaveType::Unpaid => write!(f, "unpaid"),
        }
    }
}

/// Review state of a leave request.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting review.
    Pending,
    /// Approved by a reviewer (terminal).
    Approved,
    /// Rejected by a reviewer (terminal).
    Rejected,
}

impl LeaveStatus {
    /// Returns true for approved and rejected.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "pending"),
            LeaveStatus::Approved => write!(f, "approved"),
            LeaveStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for LeaveStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "rejected" => Ok(LeaveStatus::Rejected),
            other => Err(EngineError::InvalidInput {
                field: "status".to_string(),
                message: format!("unknown leave status '{}'", other),
            }),
        }
    }
}

/// A single leave application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Request id.
    pub id: Uuid,
    /// The requesting employee.
    pub user_id: Uuid,
    /// Kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Free-text reason.
    pub reason: String,
    /// Review state.
    pub status: LeaveStatus,
    /// Reviewer, once reviewed.
    #[serde(default)]
    pub reviewed_by: Option<Uuid>,
    /// Review instant, once reviewed.
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Reviewer's comment.
    #[serde(default)]
    pub review_comments: Option<String>,
    /// Submission instant.
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Number of calendar days covered, both endpoints included.
    pub fn day_count(&self) -> EngineResult<u32> {
        days_between_inclusive(self.start_date, self.end_date)
    }
}

/// Remaining leave entitlement for one user, in days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The employee.
    pub user_id: Uuid,
    /// Remaining paid leave.
    #[serde(default)]
    pub paid_leave: u32,
    /// Remaining sick leave.
    #[serde(default)]
    pub sick_leave: u32,
    /// Remaining casual leave.
    #[serde(default)]
    pub casual_leave: u32,
    /// Remaining unpaid leave.
    #[serde(default)]
    pub unpaid_leave: u32,
}

impl LeaveBalance {
    /// A balance with every counter at zero.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            paid_leave: 0,
            sick_leave: 0,
            casual_leave: 0,
            unpaid_leave: 0,
        }
    }

    /// Remaining days for a leave type.
    pub fn remaining(&self, leave_type: LeaveType) -> u32 {
        match leave_type {
            LeaveType::Paid => self.paid_leave,
            LeaveType::Sick => self.sick_leave,
            LeaveType::Casual => self.casual_leave,
            LeaveType::Unpaid => self.unpaid_leave,
        }
    }

    /// Decrements the counter for `leave_type` by `days`, floored at zero.
    ///
    /// Returns the new remaining value. Excess days are absorbed silently.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_engine::models::{LeaveBalance, LeaveType};
    /// use uuid::Uuid;
    ///
    /// let mut balance = LeaveBalance::empty(Uuid::nil());
    /// balance.sick_leave = 2;
    /// assert_eq!(balance.deduct(LeaveType::Sick, 5), 0);
    /// ```
    pub fn deduct(&mut self, leave_type: LeaveType, days: u32) -> u32 {
        let counter = match leave_type {
            LeaveType::Paid => &mut self.paid_leave,
            LeaveType::Sick => &mut self.sick_leave,
            LeaveType::Casual => &mut self.casual_leave,
            LeaveType::Unpaid => &mut self.unpaid_leave,
        };
        *counter = counter.saturating_sub(days);
        *counter
    }
}
