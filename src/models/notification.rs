//! Notification model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Informational (e.g. salary updated).
    Info,
    /// Positive outcome (e.g. leave approved).
    Success,
    /// Needs attention.
    Warning,
    /// Negative outcome (e.g. leave rejected).
    Error,
}

/// A message addressed to a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification id.
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    /// Short title.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Severity, stored in the `type` column.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Whether the recipient has read it.
    #[serde(default)]
    pub is_read: bool,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Builds an unread notification.
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            message: message.into(),
            kind,
            is_read: false,
            created_at,
        }
    }
}
