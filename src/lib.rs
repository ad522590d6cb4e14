//! HR rules engine
//!
//! This crate implements the business rules behind an HR management system:
//! a working-day calendar, an attendance ledger, the leave request state
//! machine with balance deduction, monthly payroll with loss-of-pay,
//! in-app notifications and reporting rollups. The [`engine::HrEngine`]
//! wires the services over a pluggable [`store`], and [`api`] serves them
//! over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;
