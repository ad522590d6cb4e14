//! Employee profile model and user roles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

/// Department label used when a profile has none.
pub const UNASSIGNED_DEPARTMENT: &str = "Unassigned";

/// The role a user holds (one row per user in `user_roles`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A regular employee.
    Employee,
    /// Human resources staff.
    Hr,
    /// Administrator.
    Admin,
}

impl UserRole {
    /// Returns true for roles allowed to review leave, edit salaries and
    /// view other employees' records.
    pub fn is_reviewer(&self) -> bool {
        matches!(self, UserRole::Hr | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Employee => write!(f, "employee"),
            UserRole::Hr => write!(f, "hr"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for UserRole {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "employee" => Ok(UserRole::Employee),
            "hr" => Ok(UserRole::Hr),
            "admin" => Ok(UserRole::Admin),
            other => Err(EngineError::InvalidInput {
                field: "role".to_string(),
                message: format!("unknown role '{}'", other),
            }),
        }
    }
}

/// One profile per user. Profiles are deactivated, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The user id (shared with the auth layer).
    pub id: Uuid,
    /// Human-facing employee number (e.g. "EMP001").
    pub employee_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Department, if assigned.
    #[serde(default)]
    pub department: Option<String>,
    /// Job title, if assigned.
    #[serde(default)]
    pub designation: Option<String>,
    /// Date the employee joined.
    #[serde(default)]
    pub date_of_joining: Option<NaiveDate>,
    /// Whether the employee is currently active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// When the profile was registered.
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Profile {
    /// Returns "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Returns the department, bucketing null or blank values as
    /// [`UNASSIGNED_DEPARTMENT`].
    pub fn department_or_unassigned(&self) -> &str {
        match self.department.as_deref().map(str::trim) {
            Some(dept) if !dept.is_empty() => dept,
            _ => UNASSIGNED_DEPARTMENT,
        }
    }

    /// Case-insensitive substring match over name, email and employee id.
    ///
    /// An empty needle matches every profile.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.employee_id.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Editable profile fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New department.
    #[serde(default)]
    pub department: Option<String>,
    /// New designation.
    #[serde(default)]
    pub designation: Option<String>,
    /// New joining date.
    #[serde(default)]
    pub date_of_joining: Option<NaiveDate>,
    /// New phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// New address.
    #[serde(default)]
    pub address: Option<String>,
}

impl ProfileUpdate {
    /// Returns true if the update touches organizational fields, which only
    /// reviewers may edit.
    pub fn touches_organization(&self) -> bool {
        self.department.is_some() || self.designation.is_some() || self.date_of_joining.is_some()
    }

    /// Applies the update onto `profile`.
    pub fn apply_to(self, profile: &mut Profile) {
        if let Some(department) = self.department {
            profile.department = Some(department);
        }
        if let Some(designation) = self.designation {
            profile.designation = Some(designation);
        }
        if let Some(date_of_joining) = self.date_of_joining {
            profile.date_of_joining = Some(date_of_joining);
        }
        if let Some(phone) = self.phone {
            profile.phone = Some(phone);
        }
        if let Some(address) = self.address {
            profile.address = Some(address);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_profile() -> Profile {
        Profile {
            id: Uuid::nil(),
            employee_id: "EMP042".to_string(),
            first_name: "Priya".to_string(),
            last_name: "Nair".to_string(),
            email: "priya.nair@example.com".to_string(),
            department: None,
            designation: None,
            date_of_joining: None,
            is_active: true,
            phone: None,
            address: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(make_profile().full_name(), "Priya Nair");
    }

    #[test]
    fn test_department_blank_is_unassigned() {
        let mut profile = make_profile();
        assert_eq!(profile.department_or_unassigned(), "Unassigned");
        profile.department = Some("  ".to_string());
        assert_eq!(profile.department_or_unassigned(), "Unassigned");
        profile.department = Some("Finance".to_string());
        assert_eq!(profile.department_or_unassigned(), "Finance");
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let profile = make_profile();
        assert!(profile.matches_search("priya"));
        assert!(profile.matches_search("NAIR"));
        assert!(profile.matches_search("emp04"));
        assert!(profile.matches_search("example.com"));
        assert!(profile.matches_search(""));
        assert!(!profile.matches_search("rahul"));
    }

    #[test]
    fn test_role_parsing_and_reviewer_rights() {
        assert_eq!("HR".parse::<UserRole>().unwrap(), UserRole::Hr);
        assert!(UserRole::Admin.is_reviewer());
        assert!(UserRole::Hr.is_reviewer());
        assert!(!UserRole::Employee.is_reviewer());
        assert!("manager".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_profile_update_applies_only_set_fields() {
        let mut profile = make_profile();
        profile.phone = Some("123".to_string());
        let update = ProfileUpdate {
            department: Some("Engineering".to_string()),
            ..Default::default()
        };
        assert!(update.touches_organization());
        update.apply_to(&mut profile);
        assert_eq!(profile.department.as_deref(), Some("Engineering"));
        assert_eq!(profile.phone.as_deref(), Some("123"));
    }

    #[test]
    fn test_deserialize_defaults_missing_optional_fields() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000000",
            "employee_id": "EMP001",
            "first_name": "Asha",
            "last_name": "Rao",
            "email": "asha@example.com",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert!(profile.is_active);
        assert!(profile.department.is_none());
    }
}
