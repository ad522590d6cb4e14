//! Core data models for the HR engine.
//!
//! This module contains the typed records for every stored entity. Field names
//! match the stored rows one-for-one so existing data deserializes unchanged.

mod attendance;
mod leave;
mod month;
mod notification;
mod profile;
mod salary;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use leave::{LeaveBalance, LeaveRequest, LeaveStatus, LeaveType};
pub use month::YearMonth;
pub use notification::{Notification, NotificationKind};
pub use profile::{Profile, ProfileUpdate, UNASSIGNED_DEPARTMENT, UserRole};
pub use salary::{SalaryStructure, SalaryUpdate};
