//! Payslips and salary administration.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::calculation::{CurrencyFormat, PayrollBreakdown, calculate_payroll, working_days_in_month};
use crate::error::EngineResult;
use crate::models::{NotificationKind, SalaryStructure, SalaryUpdate, YearMonth};
use crate::store::SalaryStore;

use super::attendance::AttendanceLedger;
use super::clock::Clock;
use super::notifications::Notifier;

/// Headline amounts rendered with the configured currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayslipDisplay {
    /// Formatted gross salary.
    pub gross_salary: String,
    /// Formatted fixed deductions.
    pub total_deductions: String,
    /// Formatted loss of pay.
    pub loss_of_pay: String,
    /// Formatted net payable.
    pub net_payable: String,
}

/// One employee's pay for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payslip {
    /// The employee.
    pub user_id: Uuid,
    /// The pay month.
    pub month: YearMonth,
    /// The salary structure used; zeroed if none is on file.
    pub salary: SalaryStructure,
    /// Amounts rounded to 2 dp.
    pub breakdown: PayrollBreakdown,
    /// Headline amounts for display.
    pub display: PayslipDisplay,
}

/// Computes payslips and maintains salary structures.
#[derive(Clone)]
pub struct PayrollService {
    salaries: Arc<dyn SalaryStore>,
    ledger: AttendanceLedger,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    currency: CurrencyFormat,
}

impl PayrollService {
    /// Creates a payroll service.
    pub fn new(
        salaries: Arc<dyn SalaryStore>,
        ledger: AttendanceLedger,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
        currency: CurrencyFormat,
    ) -> Self {
        Self {
            salaries,
            ledger,
            notifier,
            clock,
            currency,
        }
    }

    /// `user_id`'s salary structure, with every amount zero if none is on
    /// file.
    pub fn salary(&self, user_id: Uuid) -> EngineResult<SalaryStructure> {
        Ok(self
            .salaries
            .get_salary(user_id)?
            .unwrap_or_else(|| SalaryStructure::zeroed(user_id, self.clock.today())))
    }

    /// The payslip for `user_id` in `month`.
    pub fn payslip(&self, user_id: Uuid, month: YearMonth) -> EngineResult<Payslip> {
        let salary = self.salary(user_id)?;
        let summary = self.ledger.monthly_summary(user_id, month)?;
        let working_days = working_days_in_month(month);
        let breakdown = calculate_payroll(&salary, &summary, working_days).rounded(2);

        let display = PayslipDisplay {
            gross_salary: self.currency.format(breakdown.gross_salary),
            total_deductions: self.currency.format(breakdown.total_deductions),
            loss_of_pay: self.currency.format(breakdown.loss_of_pay),
            net_payable: self.currency.format(breakdown.net_payable),
        };

        Ok(Payslip {
            user_id,
            month,
            salary,
            breakdown,
            display,
        })
    }

    /// The payslip for `user_id` in the current month.
    pub fn current_payslip(&self, user_id: Uuid) -> EngineResult<Payslip> {
        self.payslip(user_id, YearMonth::of(self.clock.today()))
    }

    /// Replaces `user_id`'s salary structure and notifies them.
    ///
    /// The previous structure is discarded.
    pub fn update_salary(
        &self,
        user_id: Uuid,
        update: SalaryUpdate,
    ) -> EngineResult<SalaryStructure> {
        let structure = update.into_structure(user_id)?;
        self.salaries.put_salary(&structure)?;

        self.notifier.emit_best_effort(
            user_id,
            "Salary Updated",
            &format!(
                "Your salary structure has been updated, effective {}.",
                structure.effective_from
            ),
            NotificationKind::Info,
        );

        info!(
            user_id = %user_id,
            effective_from = %structure.effective_from,
            "Salary structure updated"
        );
        Ok(structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::FixedClock;
    use crate::store::{InMemoryStore, NotificationStore};
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn setup() -> (PayrollService, AttendanceLedger, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap(),
        ));
        let ledger = AttendanceLedger::new(store.clone(), clock.clone());
        let notifier = Notifier::new(store.clone(), clock.clone());
        let service = PayrollService::new(
            store.clone(),
            ledger.clone(),
            notifier,
            clock,
            CurrencyFormat::default(),
        );
        (service, ledger, store)
    }

    fn reference_salary() -> SalaryUpdate {
        SalaryUpdate {
            basic_salary: dec("30000"),
            hra: dec("10000"),
            transport_allowance: dec("2000"),
            medical_allowance: dec("1500"),
            other_allowances: Decimal::ZERO,
            pf_deduction: dec("1800"),
            tax_deduction: dec("2000"),
            other_deductions: Decimal::ZERO,
            effective_from: date("2024-01-01"),
        }
    }

    #[test]
    fn test_payslip_with_explicit_absences() {
        let (service, ledger, _) = setup();
        let user = Uuid::new_v4();
        service.update_salary(user, reference_salary()).unwrap();
        ledger.mark_absent(user, date("2024-04-03")).unwrap();
        ledger.mark_absent(user, date("2024-04-04")).unwrap();

        // April 2024 has 22 weekdays.
        let payslip = service.payslip(user, "2024-04".parse().unwrap()).unwrap();
        let b = &payslip.breakdown;
        assert_eq!(b.working_days, 22);
        assert_eq!(b.gross_salary, dec("43500"));
        assert_eq!(b.total_deductions, dec("3800"));
        assert_eq!(b.base_salary, dec("39700"));
        assert_eq!(b.per_day_salary, dec("1804.55"));
        assert_eq!(b.loss_of_pay, dec("3609.09"));
        assert_eq!(b.net_payable, dec("36090.91"));
        assert_eq!(payslip.display.net_payable, "₹36,091");
    }

    #[test]
    fn test_missing_records_do_not_reduce_pay() {
        let (service, _, _) = setup();
        let user = Uuid::new_v4();
        service.update_salary(user, reference_salary()).unwrap();

        let payslip = service.current_payslip(user).unwrap();
        assert_eq!(payslip.month.to_string(), "2024-03");
        assert_eq!(payslip.breakdown.absent_days, 0);
        assert_eq!(payslip.breakdown.net_payable, dec("39700"));
    }

    #[test]
    fn test_missing_salary_is_all_zero() {
        let (service, _, _) = setup();
        let payslip = service.current_payslip(Uuid::new_v4()).unwrap();
        assert_eq!(payslip.breakdown.gross_salary, Decimal::ZERO);
        assert_eq!(payslip.breakdown.net_payable, Decimal::ZERO);
        assert_eq!(payslip.display.net_payable, "₹0");
    }

    #[test]
    fn test_update_salary_overwrites_and_notifies() {
        let (service, _, store) = setup();
        let user = Uuid::new_v4();
        service.update_salary(user, reference_salary()).unwrap();

        let mut raise = reference_salary();
        raise.basic_salary = dec("35000");
        raise.effective_from = date("2024-04-01");
        service.update_salary(user, raise).unwrap();

        let salary = service.salary(user).unwrap();
        assert_eq!(salary.basic_salary, dec("35000"));
        assert_eq!(salary.effective_from, date("2024-04-01"));

        let inbox = store.list_notifications(user, true, None).unwrap();
        assert_eq!(inbox.len(), 2);
        assert!(inbox.iter().all(|n| n.kind == NotificationKind::Info));
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let (service, _, store) = setup();
        let user = Uuid::new_v4();
        let mut bad = reference_salary();
        bad.hra = dec("-1");

        assert!(service.update_salary(user, bad).is_err());
        assert_eq!(store.count_unread_notifications(user).unwrap(), 0);
    }
}
