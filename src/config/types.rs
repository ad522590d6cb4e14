//! Configuration types for the HR engine.
//!
//! These structures are deserialized from `engine.yaml`. Every section
//! except `organization` has defaults, so a minimal file only names the
//! organization.

use serde::Deserialize;
use uuid::Uuid;

use crate::calculation::CurrencyFormat;
use crate::models::LeaveBalance;

/// Identifies the organization running the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    /// Display name of the organization.
    pub name: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Leave entitlement provisioned for every newly registered employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LeaveAllowance {
    /// Initial paid leave days.
    #[serde(default)]
    pub paid_leave: u32,
    /// Initial sick leave days.
    #[serde(default)]
    pub sick_leave: u32,
    /// Initial casual leave days.
    #[serde(default)]
    pub casual_leave: u32,
    /// Initial unpaid leave days.
    #[serde(default)]
    pub unpaid_leave: u32,
}

impl LeaveAllowance {
    /// Builds the opening balance for `user_id`.
    pub fn opening_balance(&self, user_id: Uuid) -> LeaveBalance {
        LeaveBalance {
            user_id,
            paid_leave: self.paid_leave,
            sick_leave: self.sick_leave,
            casual_leave: self.casual_leave,
            unpaid_leave: self.unpaid_leave,
        }
    }
}

/// Leave settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveConfig {
    /// Opening balance for new employees.
    #[serde(default)]
    pub default_balance: LeaveAllowance,
}

/// Report settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// Months covered by the attendance trend report.
    #[serde(default = "default_trailing_months")]
    pub trailing_months: u32,
}

fn default_trailing_months() -> u32 {
    6
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            trailing_months: default_trailing_months(),
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Organization metadata.
    pub organization: OrganizationConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Leave settings.
    #[serde(default)]
    pub leave: LeaveConfig,
    /// Report settings.
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Currency display.
    #[serde(default)]
    pub currency: CurrencyFormat,
}

impl EngineConfig {
    /// A configuration with every default applied, for tests and embedding.
    pub fn with_organization(name: impl Into<String>) -> Self {
        Self {
            organization: OrganizationConfig { name: name.into() },
            server: ServerConfig::default(),
            leave: LeaveConfig::default(),
            reports: ReportsConfig::default(),
            currency: CurrencyFormat::default(),
        }
    }
}
