//! Configuration loading for the HR engine.
//!
//! The engine reads a single `engine.yaml` naming the organization, the
//! server bind address, the opening leave allowance for new employees, the
//! report window and the currency display.
//!
//! # Example
//!
//! ```no_run
//! use hr_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded organization: {}", config.config().organization.name);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{
    EngineConfig, LeaveAllowance, LeaveConfig, OrganizationConfig, ReportsConfig, ServerConfig,
};
