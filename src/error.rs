//! Error types for the HR engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the attendance, leave and payroll rules can raise.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::LeaveStatus;

/// The main error type for the HR engine.
///
/// All engine operations return this error type. Missing salary structures,
/// leave balances and profiles on read paths are not errors: the services
/// fall back to zero defaults and only surface [`EngineError::NotFound`] when
/// a write targets a record that does not exist.
///
/// # Example
///
/// ```
/// use hr_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::InvalidRange {
///     start: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
///     end: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
/// };
/// assert_eq!(error.to_string(), "Invalid date range: 2024-03-10 is before 2024-03-12");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// An end date preceded its start date.
    #[error("Invalid date range: {end} is before {start}")]
    InvalidRange {
        /// The start of the range.
        start: NaiveDate,
        /// The (earlier) end of the range.
        end: NaiveDate,
    },

    /// The user already checked in on this date.
    #[error("User {user_id} has already checked in on {date}")]
    DuplicateCheckIn {
        /// The user attempting to check in.
        user_id: Uuid,
        /// The attendance date.
        date: NaiveDate,
    },

    /// There is no open check-in to close on this date.
    #[error("User {user_id} has no active check-in on {date}")]
    NoActiveCheckIn {
        /// The user attempting to check out.
        user_id: Uuid,
        /// The attendance date.
        date: NaiveDate,
    },

    /// The check-out instant precedes the recorded check-in.
    #[error("Check-out at {check_out} is before check-in at {check_in}")]
    CheckOutBeforeCheckIn {
        /// The recorded check-in instant.
        check_in: DateTime<Utc>,
        /// The rejected check-out instant.
        check_out: DateTime<Utc>,
    },

    /// The leave request already reached a terminal state.
    #[error("Leave request {request_id} has already been {status}")]
    AlreadyReviewed {
        /// The leave request id.
        request_id: Uuid,
        /// The terminal status it is in.
        status: LeaveStatus,
    },

    /// A record required by a write operation does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The kind of record (e.g. "leave request").
        entity: &'static str,
        /// The key that was looked up.
        key: String,
    },

    /// A request field failed validation.
    #[error("Invalid field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made it invalid.
        message: String,
    },

    /// The underlying record store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the failure.
        message: String,
        /// Whether retrying the same idempotent call may succeed.
        transient: bool,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Returns true for storage failures that are safe to retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Storage { transient: true, .. })
    }

    /// Returns true if this is a [`EngineError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_invalid_range_displays_both_dates() {
        let error = EngineError::InvalidRange {
            start: date("2024-03-12"),
            end: date("2024-03-10"),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date range: 2024-03-10 is before 2024-03-12"
        );
    }

    #[test]
    fn test_duplicate_check_in_displays_user_and_date() {
        let user_id = Uuid::nil();
        let error = EngineError::DuplicateCheckIn {
            user_id,
            date: date("2024-03-11"),
        };
        assert_eq!(
            error.to_string(),
            format!("User {} has already checked in on 2024-03-11", user_id)
        );
    }

    #[test]
    fn test_already_reviewed_displays_status() {
        let error = EngineError::AlreadyReviewed {
            request_id: Uuid::nil(),
            status: LeaveStatus::Approved,
        };
        assert!(error.to_string().ends_with("has already been approved"));
    }

    #[test]
    fn test_not_found_displays_entity_and_key() {
        let error = EngineError::NotFound {
            entity: "leave request",
            key: "abc".to_string(),
        };
        assert_eq!(error.to_string(), "leave request not found: abc");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_only_transient_storage_errors_are_retryable() {
        let transient = EngineError::Storage {
            message: "lock contention".to_string(),
            transient: true,
        };
        let permanent = EngineError::Storage {
            message: "poisoned".to_string(),
            transient: false,
        };
        assert!(transient.is_transient());
        assert!(!permanent.is_transient());
        assert!(!EngineError::ConfigNotFound {
            path: "/x".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/engine.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/engine.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }
}
