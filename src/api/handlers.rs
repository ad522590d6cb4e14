//! HTTP request handlers for the HR engine API.
//!
//! Every handler tags its work with a correlation id, authorizes the caller,
//! delegates to one engine operation and maps engine errors to JSON error
//! bodies.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{AttendanceSummary, EmployeeFilter, working_days_in_month};
use crate::engine::{NewEmployee, NewLeaveRequest};
use crate::error::EngineResult;
use crate::models::{Notification, ProfileUpdate, SalaryUpdate, YearMonth};

use super::auth::Caller;
use super::request::{
    ActivationRequest, AttendanceDayRequest, DateRangeQuery, LeaveListQuery, MarkAbsentRequest,
    MonthQuery, NotificationQuery, ReviewRequest, TrendQuery,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/attendance/check-in", post(check_in_handler))
        .route("/attendance/check-out", post(check_out_handler))
        .route("/attendance/:user_id", get(attendance_range_handler))
        .route("/attendance/:user_id/summary", get(attendance_summary_handler))
        .route("/attendance/:user_id/absent", post(mark_absent_handler))
        .route("/leave", post(submit_leave_handler).get(list_leave_handler))
        .route("/leave/mine", get(my_leave_handler))
        .route("/leave/balance/:user_id", get(leave_balance_handler))
        .route("/leave/:id/approve", post(approve_leave_handler))
        .route("/leave/:id/reject", post(reject_leave_handler))
        .route("/leave/:id/reapply", post(reapply_leave_handler))
        .route("/payroll/:user_id", get(payslip_handler))
        .route("/payroll/:user_id/salary", put(update_salary_handler))
        .route("/notifications", get(list_notifications_handler))
        .route("/notifications/read-all", post(mark_all_read_handler))
        .route("/notifications/:id/read", post(mark_read_handler))
        .route("/reports/attendance", get(attendance_report_handler))
        .route("/reports/leave", get(leave_report_handler))
        .route("/reports/departments", get(department_report_handler))
        .route("/reports/summary", get(summary_report_handler))
        .route("/dashboard", get(dashboard_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(register_employee_handler),
        )
        .route("/employees/departments", get(departments_handler))
        .route("/employees/:id", put(update_employee_handler))
        .route("/employees/:id/active", post(set_active_handler))
        .with_state(state)
}

/// Converts a JSON extraction failure into a 400 body.
fn parse_json<T>(payload: Result<Json<T>, JsonRejection>, correlation_id: Uuid) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Converts a query string extraction failure into a 400 body.
fn parse_query<T>(query: Result<Query<T>, QueryRejection>, correlation_id: Uuid) -> ApiResult<T> {
    query.map(|Query(q)| q).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Query string rejected"
        );
        ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
    })
}

/// Logs and converts an engine failure.
fn finish<T>(correlation_id: Uuid, operation: &'static str, result: EngineResult<T>) -> ApiResult<T> {
    match result {
        Ok(value) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            Ok(value)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            Err(err.into())
        }
    }
}

fn begin(operation: &'static str, caller: &Caller) -> Uuid {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        operation,
        user_id = %caller.user_id,
        role = %caller.role,
        "Processing request"
    );
    correlation_id
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

/// The day a check-in or check-out applies to. Only reviewers may name a
/// day other than today.
fn attendance_day(
    caller: &Caller,
    request: AttendanceDayRequest,
    today: NaiveDate,
) -> ApiResult<NaiveDate> {
    match request.date {
        Some(date) if date != today => {
            caller.require_reviewer()?;
            Ok(date)
        }
        _ => Ok(today),
    }
}

async fn check_in_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<AttendanceDayRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("check_in", &caller);
    let request = parse_json(payload, correlation_id)?;
    let ledger = state.engine().attendance();
    let date = attendance_day(&caller, request, ledger.current_date())?;

    let record = finish(correlation_id, "check_in", ledger.check_in(caller.user_id, date))?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn check_out_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<AttendanceDayRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("check_out", &caller);
    let request = parse_json(payload, correlation_id)?;
    let ledger = state.engine().attendance();
    let date = attendance_day(&caller, request, ledger.current_date())?;

    let record = finish(correlation_id, "check_out", ledger.check_out(caller.user_id, date))?;
    Ok(Json(record))
}

async fn attendance_range_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("attendance_range", &caller);
    caller.require_self_or_reviewer(user_id)?;
    let query = parse_query(query, correlation_id)?;

    let ledger = state.engine().attendance();
    let month = YearMonth::of(ledger.current_date());
    let start = query.start.unwrap_or_else(|| month.first_day());
    let end = query.end.unwrap_or_else(|| month.last_day());

    let records = finish(
        correlation_id,
        "attendance_range",
        ledger.get_range(user_id, start, end),
    )?;
    Ok(Json(records))
}

#[derive(Serialize)]
struct MonthlyAttendanceResponse {
    month: YearMonth,
    working_days: u32,
    inferred_absent_days: u32,
    #[serde(flatten)]
    summary: AttendanceSummary,
}

async fn attendance_summary_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("attendance_summary", &caller);
    caller.require_self_or_reviewer(user_id)?;
    let query = parse_query(query, correlation_id)?;

    let ledger = state.engine().attendance();
    let month = query
        .month
        .unwrap_or_else(|| YearMonth::of(ledger.current_date()));
    let summary = finish(
        correlation_id,
        "attendance_summary",
        ledger.monthly_summary(user_id, month),
    )?;
    let working_days = working_days_in_month(month);

    Ok(Json(MonthlyAttendanceResponse {
        month,
        working_days,
        inferred_absent_days: summary.inferred_absent_days(working_days),
        summary,
    }))
}

async fn mark_absent_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<MarkAbsentRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("mark_absent", &caller);
    caller.require_reviewer()?;
    let request = parse_json(payload, correlation_id)?;

    let record = finish(
        correlation_id,
        "mark_absent",
        state.engine().attendance().mark_absent(user_id, request.date),
    )?;
    Ok(Json(record))
}

// ---------------------------------------------------------------------------
// Leave
// ---------------------------------------------------------------------------

async fn submit_leave_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<NewLeaveRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("submit_leave", &caller);
    let request = parse_json(payload, correlation_id)?;

    let created = finish(
        correlation_id,
        "submit_leave",
        state.engine().leave().submit(caller.user_id, request),
    )?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_leave_handler(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<LeaveListQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("list_leave", &caller);
    caller.require_reviewer()?;
    let query = parse_query(query, correlation_id)?;

    let views = finish(
        correlation_id,
        "list_leave",
        query
            .into_filter()
            .and_then(|filter| state.engine().leave().list(&filter)),
    )?;
    Ok(Json(views))
}

async fn my_leave_handler(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("my_leave", &caller);
    let requests = finish(
        correlation_id,
        "my_leave",
        state.engine().leave().list_for_user(caller.user_id, None),
    )?;
    Ok(Json(requests))
}

async fn leave_balance_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("leave_balance", &caller);
    caller.require_self_or_reviewer(user_id)?;
    let balance = finish(
        correlation_id,
        "leave_balance",
        state.engine().leave().balance(user_id),
    )?;
    Ok(Json(balance))
}

async fn approve_leave_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(request_id): Path<Uuid>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("approve_leave", &caller);
    caller.require_reviewer()?;
    let review = parse_json(payload, correlation_id)?;

    let request = finish(
        correlation_id,
        "approve_leave",
        state
            .engine()
            .leave()
            .approve(request_id, caller.user_id, review.comment),
    )?;
    Ok(Json(request))
}

async fn reject_leave_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(request_id): Path<Uuid>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("reject_leave", &caller);
    caller.require_reviewer()?;
    let review = parse_json(payload, correlation_id)?;

    let request = finish(
        correlation_id,
        "reject_leave",
        state
            .engine()
            .leave()
            .reject(request_id, caller.user_id, review.comment),
    )?;
    Ok(Json(request))
}

async fn reapply_leave_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(request_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("reapply_leave", &caller);
    caller.require_reviewer()?;
    let effects = finish(
        correlation_id,
        "reapply_leave",
        state.engine().leave().reapply_approval(request_id),
    )?;
    Ok(Json(effects))
}

// ---------------------------------------------------------------------------
// Payroll
// ---------------------------------------------------------------------------

async fn payslip_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("payslip", &caller);
    caller.require_self_or_reviewer(user_id)?;
    let query = parse_query(query, correlation_id)?;

    let payroll = state.engine().payroll();
    let payslip = finish(
        correlation_id,
        "payslip",
        match query.month {
            Some(month) => payroll.payslip(user_id, month),
            None => payroll.current_payslip(user_id),
        },
    )?;
    info!(
        correlation_id = %correlation_id,
        user_id = %user_id,
        month = %payslip.month,
        net_payable = %payslip.breakdown.net_payable,
        "Payslip computed"
    );
    Ok(Json(payslip))
}

async fn update_salary_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<SalaryUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("update_salary", &caller);
    caller.require_reviewer()?;
    let update = parse_json(payload, correlation_id)?;

    let structure = finish(
        correlation_id,
        "update_salary",
        state.engine().payroll().update_salary(user_id, update),
    )?;
    Ok(Json(structure))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct InboxResponse {
    unread_count: usize,
    notifications: Vec<Notification>,
}

#[derive(Serialize)]
struct MarkAllReadResponse {
    updated: usize,
}

async fn list_notifications_handler(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<NotificationQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("list_notifications", &caller);
    let query = parse_query(query, correlation_id)?;

    let notifier = state.engine().notifications();
    let inbox = finish(
        correlation_id,
        "list_notifications",
        notifier
            .list(caller.user_id, query.unread, query.limit)
            .and_then(|notifications| {
                Ok(InboxResponse {
                    unread_count: notifier.unread_count(caller.user_id)?,
                    notifications,
                })
            }),
    )?;
    Ok(Json(inbox))
}

async fn mark_read_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("mark_read", &caller);
    let notification = finish(
        correlation_id,
        "mark_read",
        state
            .engine()
            .notifications()
            .mark_read(caller.user_id, notification_id),
    )?;
    Ok(Json(notification))
}

async fn mark_all_read_handler(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("mark_all_read", &caller);
    let updated = finish(
        correlation_id,
        "mark_all_read",
        state.engine().notifications().mark_all_read(caller.user_id),
    )?;
    Ok(Json(MarkAllReadResponse { updated }))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

async fn attendance_report_handler(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<TrendQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("attendance_report", &caller);
    caller.require_reviewer()?;
    let query = parse_query(query, correlation_id)?;

    let report = finish(
        correlation_id,
        "attendance_report",
        state.engine().reports().attendance_by_month(query.months),
    )?;
    Ok(Json(report))
}

async fn leave_report_handler(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("leave_report", &caller);
    caller.require_reviewer()?;
    let report = finish(
        correlation_id,
        "leave_report",
        state.engine().reports().leave_distribution(),
    )?;
    Ok(Json(report))
}

async fn department_report_handler(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("department_report", &caller);
    caller.require_reviewer()?;
    let report = finish(
        correlation_id,
        "department_report",
        state.engine().reports().department_distribution(),
    )?;
    Ok(Json(report))
}

async fn summary_report_handler(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("summary_report", &caller);
    caller.require_reviewer()?;
    let summary = finish(
        correlation_id,
        "summary_report",
        state.engine().reports().summary(),
    )?;
    Ok(Json(summary))
}

async fn dashboard_handler(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("dashboard", &caller);
    let dashboard = finish(
        correlation_id,
        "dashboard",
        state.engine().reports().employee_dashboard(caller.user_id),
    )?;
    Ok(Json(dashboard))
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

async fn list_employees_handler(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<EmployeeFilter>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("list_employees", &caller);
    caller.require_reviewer()?;
    let filter = parse_query(query, correlation_id)?;

    let profiles = finish(
        correlation_id,
        "list_employees",
        state.engine().directory().list(&filter),
    )?;
    Ok(Json(profiles))
}

async fn departments_handler(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("departments", &caller);
    caller.require_reviewer()?;
    let departments = finish(
        correlation_id,
        "departments",
        state.engine().directory().departments(),
    )?;
    Ok(Json(departments))
}

async fn register_employee_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("register_employee", &caller);
    caller.require_reviewer()?;
    let new = parse_json(payload, correlation_id)?;

    let profile = finish(
        correlation_id,
        "register_employee",
        state.engine().directory().register(new),
    )?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn update_employee_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("update_employee", &caller);
    caller.require_self_or_reviewer(user_id)?;
    let update = parse_json(payload, correlation_id)?;

    let directory = state.engine().directory();
    let result = if caller.role.is_reviewer() {
        directory.update(user_id, update)
    } else {
        directory.update_own(user_id, update)
    };
    let profile = finish(correlation_id, "update_employee", result)?;
    Ok(Json(profile))
}

async fn set_active_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<ActivationRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = begin("set_active", &caller);
    caller.require_reviewer()?;
    let request = parse_json(payload, correlation_id)?;

    let profile = finish(
        correlation_id,
        "set_active",
        state
            .engine()
            .directory()
            .set_active(user_id, request.is_active),
    )?;
    Ok(Json(profile))
}
