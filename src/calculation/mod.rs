//! Calculation logic for the HR engine.
//!
//! This module contains the pure rules: calendar utilities, worked-hours
//! derivation with the half-day rule, monthly attendance statistics, payroll
//! with loss-of-pay proration, report reductions, the employee directory
//! filter and currency formatting. Nothing here touches storage.

mod attendance_summary;
mod calendar;
mod currency;
mod employee_filter;
mod payroll;
mod reporting;
mod worked_hours;

pub use attendance_summary::AttendanceSummary;
pub use calendar::{
    DateSpan, DateSpanIter, date_in_range, days_between_inclusive, enumerate_dates,
    is_working_day, working_days_in_month,
};
pub use currency::CurrencyFormat;
pub use employee_filter::{ActivityFilter, AttendanceFilter, EmployeeFilter};
pub use payroll::{PayrollBreakdown, calculate_payroll};
pub use reporting::{
    DepartmentCount, LeaveTypeCount, MonthlyAttendanceCount, count_month_attendance,
    department_distribution, leave_distribution, trailing_months,
};
pub use worked_hours::{HALF_DAY_THRESHOLD_HOURS, elapsed_hours, status_for_hours};
