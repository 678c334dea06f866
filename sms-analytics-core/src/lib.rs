//! # sms-analytics-core
//!
//! Core library for sms-analytics - descriptive statistics over an
//! "SMS Backup & Restore" XML export.
//!
//! This library provides:
//! - Domain types for message records
//! - The export loader
//! - Volume, contact and temporal aggregations
//! - A plain-text presenter for the finished report
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use sms_analytics_core::{analytics::generate_report, loader, report, Config};
//!
//! let config = Config::load().expect("failed to load config");
//! let options = config.report.options().expect("invalid report options");
//!
//! let records = loader::load("sms-backup.xml").expect("failed to load export");
//! let stats = generate_report(&records, &options);
//! print!("{}", report::render_text(&stats));
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{generate_report, ReportOptions, SmsReport};
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod report;
pub mod types;
