//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/sms-analytics/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/sms-analytics/` (~/.config/sms-analytics/)
//! - State/Logs: `$XDG_STATE_HOME/sms-analytics/` (~/.local/state/sms-analytics/)

use crate::analytics::ReportOptions;
use crate::error::{Error, Result};
use crate::types::TimeZoneMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Report filters and limits
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Report filters and limits, as written in the config file.
///
/// Use [`ReportConfig::options`] to validate these into the
/// [`ReportOptions`] the aggregators consume.
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Restrict counts to a single calendar year
    #[serde(default)]
    pub year_filter_enabled: bool,

    /// Four-digit year, used when `year_filter_enabled` is set
    #[serde(default)]
    pub year_filter: String,

    /// Restrict temporal activity to a single contact
    #[serde(default)]
    pub person_filter_enabled: bool,

    /// Exact contact name, used when `person_filter_enabled` is set
    #[serde(default)]
    pub person_filter: String,

    /// Contacts with fewer messages are left out of ratio rankings
    #[serde(default = "default_ratio_min_texts")]
    pub ratio_min_texts: u64,

    /// Number of contacts listed before the "Others" row
    #[serde(default = "default_top_contacts_limit")]
    pub top_contacts_limit: usize,

    /// Number of contacts listed in each ratio ranking
    #[serde(default = "default_ratio_contacts_limit")]
    pub ratio_contacts_limit: usize,

    /// Zone used for calendar fields
    #[serde(default)]
    pub timezone: TimeZoneMode,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            year_filter_enabled: false,
            year_filter: String::new(),
            person_filter_enabled: false,
            person_filter: String::new(),
            ratio_min_texts: default_ratio_min_texts(),
            top_contacts_limit: default_top_contacts_limit(),
            ratio_contacts_limit: default_ratio_contacts_limit(),
            timezone: TimeZoneMode::default(),
        }
    }
}

fn default_ratio_min_texts() -> u64 {
    20
}

fn default_top_contacts_limit() -> usize {
    20
}

fn default_ratio_contacts_limit() -> usize {
    5
}

impl ReportConfig {
    /// Validate into the options passed to the aggregators.
    pub fn options(&self) -> Result<ReportOptions> {
        let year = if self.year_filter_enabled {
            Some(parse_year(&self.year_filter)?)
        } else {
            None
        };

        let person = if self.person_filter_enabled {
            if self.person_filter.is_empty() {
                return Err(Error::Config(
                    "report.person_filter is required when the person filter is enabled"
                        .to_string(),
                ));
            }
            Some(self.person_filter.clone())
        } else {
            None
        };

        if self.top_contacts_limit == 0 {
            return Err(Error::Config(
                "report.top_contacts_limit must be at least 1".to_string(),
            ));
        }
        if self.ratio_contacts_limit == 0 {
            return Err(Error::Config(
                "report.ratio_contacts_limit must be at least 1".to_string(),
            ));
        }

        Ok(ReportOptions {
            year,
            person,
            ratio_min_texts: self.ratio_min_texts,
            top_contacts_limit: self.top_contacts_limit,
            ratio_contacts_limit: self.ratio_contacts_limit,
            timezone: self.timezone,
        })
    }
}

/// Parse a year filter: exactly four ASCII digits.
pub fn parse_year(value: &str) -> Result<i32> {
    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Config(format!(
            "invalid year filter {:?}: expected four digits (e.g. 2014)",
            value
        )));
    }
    value
        .parse()
        .map_err(|e| Error::Config(format!("invalid year filter {:?}: {}", value, e)))
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/sms-analytics/config.toml` (~/.config/sms-analytics/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("sms-analytics").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/sms-analytics/` (~/.local/state/sms-analytics/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("sms-analytics")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/sms-analytics/sms-analytics.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("sms-analytics.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.report.year_filter_enabled);
        assert!(!config.report.person_filter_enabled);
        assert_eq!(config.report.ratio_min_texts, 20);
        assert_eq!(config.report.top_contacts_limit, 20);
        assert_eq!(config.report.ratio_contacts_limit, 5);
        assert_eq!(config.report.timezone, TimeZoneMode::Local);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[report]
year_filter_enabled = true
year_filter = "2014"
person_filter_enabled = true
person_filter = "Peter Phan"
ratio_min_texts = 10
timezone = "utc"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.report.year_filter, "2014");
        assert_eq!(config.report.ratio_min_texts, 10);
        assert_eq!(config.report.top_contacts_limit, 20);
        assert_eq!(config.logging.level, "debug");

        let options = config.report.options().unwrap();
        assert_eq!(options.year, Some(2014));
        assert_eq!(options.person.as_deref(), Some("Peter Phan"));
        assert_eq!(options.timezone, TimeZoneMode::Utc);
    }

    #[test]
    fn test_disabled_filters_are_ignored() {
        let config = ReportConfig {
            year_filter: "not a year".to_string(),
            person_filter: "Peter Phan".to_string(),
            ..Default::default()
        };
        let options = config.options().unwrap();
        assert_eq!(options.year, None);
        assert_eq!(options.person, None);
    }

    #[test]
    fn test_report_config_validation() {
        for bad in ["14", "20144", "2O14", "", " 2014"] {
            let config = ReportConfig {
                year_filter_enabled: true,
                year_filter: bad.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.options(), Err(Error::Config(_))),
                "{bad:?} should be rejected"
            );
        }

        let config = ReportConfig {
            person_filter_enabled: true,
            ..Default::default()
        };
        assert!(config.options().is_err());

        let config = ReportConfig {
            top_contacts_limit: 0,
            ..Default::default()
        };
        assert!(config.options().is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Config::load_from(Path::new("/nonexistent/sms-analytics.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
