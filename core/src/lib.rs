//! HR salary-progression and retirement rule engine.
//!
//! The core decides, for every active employee, when the next salary step
//! or over-scale seniority allowance is due and when the statutory
//! retirement milestones fall, then drives the recurring report/alert
//! jobs over those decisions. UI layers consume the store, the scanner,
//! and the notification channel; they are not part of this crate.

pub mod classify;
pub mod cleanup_job;
pub mod config;
pub mod contract;
pub mod contract_alert_job;
pub mod dates;
pub mod employee;
pub mod error;
pub mod export;
pub mod insurance_report_job;
pub mod mail;
pub mod notify;
pub mod retirement;
pub mod retirement_alert_job;
pub mod salary;
pub mod salary_alert_job;
pub mod scanner;
pub mod scheduler;
pub mod store;
pub mod types;
