//! HTTP API for the HR engine.
//!
//! Exposes attendance, leave, payroll, notification, reporting and employee
//! directory operations as JSON endpoints. Callers are identified by the
//! `x-user-id` and `x-user-role` headers set by the upstream gateway.

mod auth;
mod handlers;
mod request;
mod response;
mod state;

pub use auth::{Caller, USER_ID_HEADER, USER_ROLE_HEADER};
pub use handlers::create_router;
pub use request::{
    ActivationRequest, AttendanceDayRequest, DateRangeQuery, LeaveListQuery, MarkAbsentRequest,
    MonthQuery, NotificationQuery, ReviewRequest, TrendQuery,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
