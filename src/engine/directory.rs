//! Employee directory.
//!
//! Registration, profile edits, activation and filtered listing. Profiles
//! are never deleted; deactivation hides them from headcounts.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::calculation::EmployeeFilter;
use crate::config::LeaveAllowance;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Profile, ProfileUpdate, UserRole};
use crate::store::{AttendanceQuery, AttendanceStore, LeaveBalanceStore, ProfileStore};

use super::clock::Clock;

/// Details for registering an employee.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewEmployee {
    /// Identity id to reuse; a fresh one is generated if absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Organization-assigned employee id.
    pub employee_id: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Work email.
    pub email: String,
    /// Department.
    #[serde(default)]
    pub department: Option<String>,
    /// Job title.
    #[serde(default)]
    pub designation: Option<String>,
    /// Joining date.
    #[serde(default)]
    pub date_of_joining: Option<NaiveDate>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Role; defaults to employee.
    #[serde(default)]
    pub role: Option<UserRole>,
}

fn required(field: &str, value: &str) -> EngineResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EngineError::InvalidInput {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

/// Maintains employee profiles.
#[derive(Clone)]
pub struct EmployeeDirectory {
    profiles: Arc<dyn ProfileStore>,
    balances: Arc<dyn LeaveBalanceStore>,
    attendance: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
    allowance: LeaveAllowance,
}

impl EmployeeDirectory {
    /// Creates a directory. `allowance` is the opening leave balance for
    /// newly registered employees.
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        balances: Arc<dyn LeaveBalanceStore>,
        attendance: Arc<dyn AttendanceStore>,
        clock: Arc<dyn Clock>,
        allowance: LeaveAllowance,
    ) -> Self {
        Self {
            profiles,
            balances,
            attendance,
            clock,
            allowance,
        }
    }

    /// Registers an employee, assigns their role and provisions their
    /// opening leave balance.
    ///
    /// Fails with `InvalidInput` on blank required fields or when the
    /// employee id or email is already taken.
    pub fn register(&self, new: NewEmployee) -> EngineResult<Profile> {
        let employee_id = required("employee_id", &new.employee_id)?;
        let first_name = required("first_name", &new.first_name)?;
        let email = required("email", &new.email)?.to_lowercase();
        if !email.contains('@') {
            return Err(EngineError::InvalidInput {
                field: "email".to_string(),
                message: format!("'{}' is not an email address", email),
            });
        }

        for existing in self.profiles.list_profiles()? {
            if existing.employee_id.eq_ignore_ascii_case(&employee_id) {
                return Err(EngineError::InvalidInput {
                    field: "employee_id".to_string(),
                    message: format!("'{}' is already registered", employee_id),
                });
            }
            if existing.email.eq_ignore_ascii_case(&email) {
                return Err(EngineError::InvalidInput {
                    field: "email".to_string(),
                    message: format!("'{}' is already registered", email),
                });
            }
        }

        let profile = Profile {
            id: new.id.unwrap_or_else(Uuid::new_v4),
            employee_id,
            first_name,
            last_name: new.last_name.trim().to_string(),
            email,
            department: new.department,
            designation: new.designation,
            date_of_joining: new.date_of_joining,
            is_active: true,
            phone: new.phone,
            address: new.address,
            created_at: self.clock.now(),
        };
        if !self.profiles.insert_profile(&profile)? {
            return Err(EngineError::InvalidInput {
                field: "id".to_string(),
                message: format!("profile {} already exists", profile.id),
            });
        }

        let role = new.role.unwrap_or(UserRole::Employee);
        self.profiles.set_role(profile.id, role)?;
        self.balances
            .put_leave_balance(&self.allowance.opening_balance(profile.id))?;

        info!(
            user_id = %profile.id,
            employee_id = %profile.employee_id,
            role = %role,
            "Employee registered"
        );
        Ok(profile)
    }

    /// Looks up a profile; `NotFound` if it does not exist.
    pub fn get(&self, user_id: Uuid) -> EngineResult<Profile> {
        self.profiles
            .get_profile(user_id)?
            .ok_or_else(|| EngineError::NotFound {
                entity: "profile",
                key: user_id.to_string(),
            })
    }

    /// `user_id`'s role; employee if none is recorded.
    pub fn role(&self, user_id: Uuid) -> EngineResult<UserRole> {
        Ok(self
            .profiles
            .get_role(user_id)?
            .unwrap_or(UserRole::Employee))
    }

    /// Applies an administrative edit to any field of `user_id`'s profile.
    pub fn update(&self, user_id: Uuid, update: ProfileUpdate) -> EngineResult<Profile> {
        let mut profile = self.get(user_id)?;
        update.apply_to(&mut profile);
        self.profiles.update_profile(&profile)?;
        info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }

    /// Applies an employee's edit of their own contact details.
    ///
    /// Department, designation and joining date are reserved for reviewers.
    pub fn update_own(&self, user_id: Uuid, update: ProfileUpdate) -> EngineResult<Profile> {
        if update.touches_organization() {
            return Err(EngineError::InvalidInput {
                field: "profile".to_string(),
                message: "only phone and address can be self-edited".to_string(),
            });
        }
        self.update(user_id, update)
    }

    /// Activates or deactivates `user_id`.
    pub fn set_active(&self, user_id: Uuid, is_active: bool) -> EngineResult<Profile> {
        let mut profile = self.get(user_id)?;
        if profile.is_active != is_active {
            profile.is_active = is_active;
            self.profiles.update_profile(&profile)?;
            info!(user_id = %user_id, is_active, "Employee activation changed");
        }
        Ok(profile)
    }

    /// Profiles passing `filter`, newest registration first.
    pub fn list(&self, filter: &EmployeeFilter) -> EngineResult<Vec<Profile>> {
        let today = self.clock.today();
        let attendance: HashMap<Uuid, AttendanceRecord> = self
            .attendance
            .list_attendance(&AttendanceQuery::for_everyone(today, today))?
            .into_iter()
            .map(|r| (r.user_id, r))
            .collect();

        Ok(self
            .profiles
            .list_profiles()?
            .into_iter()
            .filter(|p| filter.matches(p, attendance.get(&p.id)))
            .collect())
    }

    /// Distinct non-blank department names, sorted.
    pub fn departments(&self) -> EngineResult<Vec<String>> {
        let names: BTreeSet<String> = self
            .profiles
            .list_profiles()?
            .into_iter()
            .filter_map(|p| p.department)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        Ok(names.into_iter().collect())
    }
}
