//! Payroll calculation.
//!
//! Combines a salary structure with a month's attendance summary:
//!
//! - gross = basic + hra + transport + medical + other allowances
//! - deductions = pf + tax + other deductions
//! - base = gross - deductions
//! - per day = base / working days (zero when there are no working days)
//! - loss of pay = explicit absent days * per day
//! - net payable = base - loss of pay

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::AttendanceSummary;
use crate::models::SalaryStructure;

/// The full breakdown of a month's pay.
///
/// Amounts are kept at full precision; use [`PayrollBreakdown::rounded`]
/// for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    /// Sum of all earnings.
    pub gross_salary: Decimal,
    /// Sum of all fixed deductions.
    pub total_deductions: Decimal,
    /// Gross minus deductions.
    pub base_salary: Decimal,
    /// Weekdays in the month.
    pub working_days: u32,
    /// Days present.
    pub present_days: u32,
    /// Half days.
    pub half_days: u32,
    /// Days on leave.
    pub leave_days: u32,
    /// Explicitly absent days.
    pub absent_days: u32,
    /// Base salary divided by working days.
    pub per_day_salary: Decimal,
    /// Deduction for absent days.
    pub loss_of_pay: Decimal,
    /// Amount payable.
    pub net_payable: Decimal,
}

impl PayrollBreakdown {
    /// Returns a copy with every amount rounded half-up to `dp` places.
    pub fn rounded(&self, dp: u32) -> Self {
        let round = |d: Decimal| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        Self {
            gross_salary: round(self.gross_salary),
            total_deductions: round(self.total_deductions),
            base_salary: round(self.base_salary),
            per_day_salary: round(self.per_day_salary),
            loss_of_pay: round(self.loss_of_pay),
            net_payable: round(self.net_payable),
            ..self.clone()
        }
    }
}

/// Computes the payroll breakdown for one employee and month.
///
/// Absence here means records explicitly marked `absent`; days with no
/// record at all do not reduce pay.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::{calculate_payroll, AttendanceSummary};
/// use hr_engine::models::SalaryStructure;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let mut salary = SalaryStructure::zeroed(Uuid::nil(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// salary.basic_salary = Decimal::from(22_000);
/// let summary = AttendanceSummary { absent_days: 1, ..Default::default() };
///
/// let payroll = calculate_payroll(&salary, &summary, 22);
/// assert_eq!(payroll.loss_of_pay, Decimal::from(1_000));
/// assert_eq!(payroll.net_payable, Decimal::from(21_000));
/// ```
pub fn calculate_payroll(
    structure: &SalaryStructure,
    summary: &AttendanceSummary,
    working_days: u32,
) -> PayrollBreakdown {
    let gross_salary = structure.gross();
    let total_deductions = structure.total_deductions();
    let base_salary = gross_salary - total_deductions;

    let per_day_salary = if working_days == 0 {
        Decimal::ZERO
    } else {
        base_salary / Decimal::from(working_days)
    };

    let loss_of_pay = Decimal::from(summary.absent_days) * per_day_salary;
    let net_payable = base_salary - loss_of_pay;

    PayrollBreakdown {
        gross_salary,
        total_deductions,
        base_salary,
        working_days,
        present_days: summary.present_days,
        half_days: summary.half_days,
        leave_days: summary.leave_days,
        absent_days: summary.absent_days,
        per_day_salary,
        loss_of_pay,
        net_payable,
    }
}
