//! Salary structure model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Monthly salary structure for one user.
///
/// Missing numeric fields deserialize as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// The employee.
    pub user_id: Uuid,
    /// Basic salary.
    #[serde(default)]
    pub basic_salary: Decimal,
    /// House rent allowance.
    #[serde(default)]
    pub hra: Decimal,
    /// Transport allowance.
    #[serde(default)]
    pub transport_allowance: Decimal,
    /// Medical allowance.
    #[serde(default)]
    pub medical_allowance: Decimal,
    /// Any other allowances.
    #[serde(default)]
    pub other_allowances: Decimal,
    /// Provident fund deduction.
    #[serde(default)]
    pub pf_deduction: Decimal,
    /// Tax deduction.
    #[serde(default)]
    pub tax_deduction: Decimal,
    /// Any other deductions.
    #[serde(default)]
    pub other_deductions: Decimal,
    /// Date this structure takes effect.
    pub effective_from: NaiveDate,
}

impl SalaryStructure {
    /// A structure with every amount at zero, used when none is stored.
    pub fn zeroed(user_id: Uuid, effective_from: NaiveDate) -> Self {
        Self {
            user_id,
            basic_salary: Decimal::ZERO,
            hra: Decimal::ZERO,
            transport_allowance: Decimal::ZERO,
            medical_allowance: Decimal::ZERO,
            other_allowances: Decimal::ZERO,
            pf_deduction: Decimal::ZERO,
            tax_deduction: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
            effective_from,
        }
    }

    /// Sum of all earnings.
    pub fn gross(&self) -> Decimal {
        self.basic_salary
            + self.hra
            + self.transport_allowance
            + self.medical_allowance
            + self.other_allowances
    }

    /// Sum of all deductions.
    pub fn total_deductions(&self) -> Decimal {
        self.pf_deduction + self.tax_deduction + self.other_deductions
    }
}

/// Administrative overwrite of a salary structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryUpdate {
    /// Basic salary.
    #[serde(default)]
    pub basic_salary: Decimal,
    /// House rent allowance.
    #[serde(default)]
    pub hra: Decimal,
    /// Transport allowance.
    #[serde(default)]
    pub transport_allowance: Decimal,
    /// Medical allowance.
    #[serde(default)]
    pub medical_allowance: Decimal,
    /// Any other allowances.
    #[serde(default)]
    pub other_allowances: Decimal,
    /// Provident fund deduction.
    #[serde(default)]
    pub pf_deduction: Decimal,
    /// Tax deduction.
    #[serde(default)]
    pub tax_deduction: Decimal,
    /// Any other deductions.
    #[serde(default)]
    pub other_deductions: Decimal,
    /// Date the new structure takes effect.
    pub effective_from: NaiveDate,
}

impl SalaryUpdate {
    /// Validates that no amount is negative and builds the structure.
    pub fn into_structure(self, user_id: Uuid) -> EngineResult<SalaryStructure> {
        let fields = [
            ("basic_salary", self.basic_salary),
            ("hra", self.hra),
            ("transport_allowance", self.transport_allowance),
            ("medical_allowance", self.medical_allowance),
            ("other_allowances", self.other_allowances),
            ("pf_deduction", self.pf_deduction),
            ("tax_deduction", self.tax_deduction),
            ("other_deductions", self.other_deductions),
        ];
        if let Some((field, value)) = fields.iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(EngineError::InvalidInput {
                field: field.to_string(),
                message: format!("must not be negative, got {}", value),
            });
        }

        Ok(SalaryStructure {
            user_id,
            basic_salary: self.basic_salary,
            hra: self.hra,
            transport_allowance: self.transport_allowance,
            medical_allowance: self.medical_allowance,
            other_allowances: self.other_allowances,
            pf_deduction: self.pf_deduction,
            tax_deduction: self.tax_deduction,
            other_deductions: self.other_deductions,
            effective_from: self.effective_from,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_update() -> SalaryUpdate {
        SalaryUpdate {
            basic_salary: dec("30000"),
            hra: dec("10000"),
            transport_allowance: dec("2000"),
            medical_allowance: dec("1500"),
            other_allowances: Decimal::ZERO,
            pf_deduction: dec("1800"),
            tax_deduction: dec("2000"),
            other_deductions: Decimal::ZERO,
            effective_from: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        }
    }

    #[test]
    fn test_gross_and_deductions() {
        let structure = make_update().into_structure(Uuid::nil()).unwrap();
        assert_eq!(structure.gross(), dec("43500"));
        assert_eq!(structure.total_deductions(), dec("3800"));
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let mut update = make_update();
        update.tax_deduction = dec("-1");
        let err = update.into_structure(Uuid::nil()).unwrap_err();
        assert!(err.to_string().contains("tax_deduction"));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let json = r#"{
            "user_id": "00000000-0000-0000-0000-000000000000",
            "basic_salary": "25000",
            "effective_from": "2024-01-01"
        }"#;
        let structure: SalaryStructure = serde_json::from_str(json).unwrap();
        assert_eq!(structure.gross(), dec("25000"));
        assert_eq!(structure.total_deductions(), Decimal::ZERO);
    }
}
