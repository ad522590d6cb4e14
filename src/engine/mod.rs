//! Stateful services over the record store.
//!
//! Each service owns the repository traits it needs and nothing else.
//! [`HrEngine`] wires them all over one store that implements every trait.
//!
//! # Example
//!
//! ```
//! use hr_engine::config::EngineConfig;
//! use hr_engine::engine::HrEngine;
//! use chrono::NaiveDate;
//! use uuid::Uuid;
//!
//! let engine = HrEngine::in_memory(&EngineConfig::with_organization("Acme"));
//! let user = Uuid::new_v4();
//! let today = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
//!
//! engine.attendance().check_in(user, today).unwrap();
//! assert!(engine.attendance().get(user, today).unwrap().is_some());
//! ```

mod attendance;
mod clock;
mod directory;
mod leave;
mod notifications;
mod payroll;
mod reporting;
mod retry;

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::calculation::CurrencyFormat;
use crate::config::EngineConfig;
use crate::store::{
    AttendanceStore, InMemoryStore, LeaveBalanceStore, LeaveRequestStore, NotificationStore,
    ProfileStore, SalaryStore,
};

pub use attendance::AttendanceLedger;
pub use clock::{Clock, FixedClock, SystemClock};
pub use directory::{EmployeeDirectory, NewEmployee};
pub use leave::{
    ApprovalEffects, LeaveEngine, LeaveFilter, LeaveRequestView, NewLeaveRequest,
    RequesterSummary,
};
pub use notifications::Notifier;
pub use payroll::{PayrollService, Payslip, PayslipDisplay};
pub use reporting::{DASHBOARD_LIST_LIMIT, DashboardSummary, EmployeeDashboard, ReportingAggregator};
pub use retry::{MAX_ATTEMPTS, retry_idempotent};

/// A store implementing every repository trait.
pub trait RecordStore:
    ProfileStore
    + AttendanceStore
    + LeaveRequestStore
    + LeaveBalanceStore
    + SalaryStore
    + NotificationStore
    + 'static
{
}

impl<T> RecordStore for T where
    T: ProfileStore
        + AttendanceStore
        + LeaveRequestStore
        + LeaveBalanceStore
        + SalaryStore
        + NotificationStore
        + 'static
{
}

/// Every service, sharing one store and one clock.
#[derive(Clone)]
pub struct HrEngine {
    attendance: AttendanceLedger,
    leave: LeaveEngine,
    payroll: PayrollService,
    notifications: Notifier,
    reports: ReportingAggregator,
    directory: EmployeeDirectory,
    currency: CurrencyFormat,
    organization: String,
}

impl HrEngine {
    /// Wires every service over `store`.
    pub fn new<S: RecordStore>(store: Arc<S>, config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let attendance = AttendanceLedger::new(store.clone(), clock.clone());
        let notifications = Notifier::new(store.clone(), clock.clone());
        let leave = LeaveEngine::new(
            store.clone(),
            store.clone(),
            store.clone(),
            attendance.clone(),
            notifications.clone(),
            clock.clone(),
        );
        let payroll = PayrollService::new(
            store.clone(),
            attendance.clone(),
            notifications.clone(),
            clock.clone(),
            config.currency.clone(),
        );
        let reports = ReportingAggregator::new(
            store.clone(),
            store.clone(),
            store.clone(),
            attendance.clone(),
            leave.clone(),
            notifications.clone(),
            clock.clone(),
            config.reports.trailing_months,
        );
        let directory = EmployeeDirectory::new(
            store.clone(),
            store.clone(),
            store,
            clock,
            config.leave.default_balance.clone(),
        );

        Self {
            attendance,
            leave,
            payroll,
            notifications,
            reports,
            directory,
            currency: config.currency.clone(),
            organization: config.organization.name.clone(),
        }
    }

    /// An engine over a fresh [`InMemoryStore`] and the system clock.
    pub fn in_memory(config: &EngineConfig) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), config, Arc::new(SystemClock))
    }

    /// The attendance ledger.
    pub fn attendance(&self) -> &AttendanceLedger {
        &self.attendance
    }

    /// The leave engine.
    pub fn leave(&self) -> &LeaveEngine {
        &self.leave
    }

    /// The payroll service.
    pub fn payroll(&self) -> &PayrollService {
        &self.payroll
    }

    /// The notification inbox.
    pub fn notifications(&self) -> &Notifier {
        &self.notifications
    }

    /// The reporting aggregator.
    pub fn reports(&self) -> &ReportingAggregator {
        &self.reports
    }

    /// The employee directory.
    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    /// The configured currency format.
    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    /// Formats `amount` with the configured currency.
    pub fn format_currency(&self, amount: Decimal) -> String {
        self.currency.format(amount)
    }

    /// The organization name.
    pub fn organization(&self) -> &str {
        &self.organization
    }
}
