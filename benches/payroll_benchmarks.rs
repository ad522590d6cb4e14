//! Performance benchmarks for the HR engine.
//!
//! Covers the pure rules (payroll, attendance summaries, report rollups)
//! and the full HTTP path for a payslip request.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;
use std::sync::Arc;

use axum::{body::Body, http::Request};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use tower::ServiceExt;
use uuid::Uuid;

use hr_engine::api::{AppState, USER_ID_HEADER, USER_ROLE_HEADER, create_router};
use hr_engine::calculation::{
    AttendanceSummary, calculate_payroll, department_distribution, enumerate_dates,
    leave_distribution, working_days_in_month,
};
use hr_engine::config::ConfigLoader;
use hr_engine::engine::{FixedClock, HrEngine};
use hr_engine::models::{
    AttendanceRecord, AttendanceStatus, LeaveRequest, LeaveStatus, LeaveType, Profile,
    SalaryUpdate, YearMonth,
};
use hr_engine::store::InMemoryStore;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn salary_update() -> SalaryUpdate {
    SalaryUpdate {
        basic_salary: Decimal::from(30_000),
        hra: Decimal::from(10_000),
        transport_allowance: Decimal::from(2_000),
        medical_allowance: Decimal::from(1_500),
        other_allowances: Decimal::ZERO,
        pf_deduction: Decimal::from(1_800),
        tax_deduction: Decimal::from(2_000),
        other_deductions: Decimal::ZERO,
        effective_from: date("2024-01-01"),
    }
}

/// A month of records cycling through every status.
fn month_of_records(user_id: Uuid, month: YearMonth) -> Vec<AttendanceRecord> {
    let statuses = [
        AttendanceStatus::Present,
        AttendanceStatus::Present,
        AttendanceStatus::HalfDay,
        AttendanceStatus::Absent,
        AttendanceStatus::Leave,
    ];
    enumerate_dates(month.first_day(), month.last_day())
        .unwrap()
        .into_iter()
        .zip(statuses.iter().cycle())
        .map(|(day, status)| AttendanceRecord::synthetic(user_id, day, *status))
        .collect()
}

fn profiles(count: usize) -> Vec<Profile> {
    let departments = ["Engineering", "Sales", "Finance", "Operations"];
    (0..count)
        .map(|i| Profile {
            id: Uuid::new_v4(),
            employee_id: format!("EMP{:04}", i),
            first_name: format!("Employee{}", i),
            last_name: "Bench".to_string(),
            email: format!("emp{}@example.com", i),
            department: (i % 5 != 0).then(|| departments[i % departments.len()].to_string()),
            designation: None,
            date_of_joining: None,
            is_active: i % 7 != 0,
            phone: None,
            address: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        })
        .collect()
}

fn leave_requests(count: usize) -> Vec<LeaveRequest> {
    let statuses = [LeaveStatus::Approved, LeaveStatus::Pending, LeaveStatus::Rejected];
    (0..count)
        .map(|i| LeaveRequest {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            leave_type: LeaveType::ALL[i % LeaveType::ALL.len()],
            start_date: date("2024-03-11"),
            end_date: date("2024-03-13"),
            reason: String::new(),
            status: statuses[i % statuses.len()],
            reviewed_by: None,
            reviewed_at: None,
            review_comments: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        })
        .collect()
}

/// Benchmark: Payroll for one employee-month.
fn bench_calculate_payroll(c: &mut Criterion) {
    let user = Uuid::new_v4();
    let structure = salary_update().into_structure(user).unwrap();
    let month = YearMonth::from_str("2024-04").unwrap();
    let summary = AttendanceSummary::from_records(&month_of_records(user, month));
    let working_days = working_days_in_month(month);

    c.bench_function("calculate_payroll", |b| {
        b.iter(|| {
            black_box(calculate_payroll(
                black_box(&structure),
                black_box(&summary),
                working_days,
            ))
        })
    });
}

/// Benchmark: Summarizing a month of attendance.
fn bench_attendance_summary(c: &mut Criterion) {
    let month = YearMonth::from_str("2024-03").unwrap();
    let records = month_of_records(Uuid::new_v4(), month);

    c.bench_function("attendance_summary_month", |b| {
        b.iter(|| black_box(AttendanceSummary::from_records(black_box(&records))))
    });
}

/// Benchmark: Report rollups at increasing organization sizes.
fn bench_distributions(c: &mut Criterion) {
    let mut group = c.benchmark_group("distributions");

    for size in [100usize, 1_000, 10_000] {
        let people = profiles(size);
        let requests = leave_requests(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(
            BenchmarkId::new("department_distribution", size),
            &people,
            |b, people| b.iter(|| black_box(department_distribution(people))),
        );
        group.bench_with_input(
            BenchmarkId::new("leave_distribution", size),
            &requests,
            |b, requests| b.iter(|| black_box(leave_distribution(requests))),
        );
    }

    group.finish();
}

/// Benchmark: A payslip request through the HTTP stack.
fn bench_payslip_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config/default")
        .expect("Failed to load config")
        .into_config();
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap(),
    ));
    let engine = HrEngine::new(Arc::new(InMemoryStore::new()), &config, clock);

    let user = Uuid::new_v4();
    engine.payroll().update_salary(user, salary_update()).unwrap();
    for day in ["2024-04-03", "2024-04-04", "2024-04-10"] {
        engine.attendance().mark_absent(user, date(day)).unwrap();
    }
    let router = create_router(AppState::new(engine));
    let uri = format!("/payroll/{}?month=2024-04", user);

    c.bench_function("payslip_endpoint", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri(&uri)
                        .header(USER_ID_HEADER, user.to_string())
                        .header(USER_ROLE_HEADER, "employee")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_calculate_payroll,
    bench_attendance_summary,
    bench_distributions,
    bench_payslip_endpoint,
);

criterion_main!(benches);
