//! Logging for sms-analytics
//!
//! The report owns stdout, so diagnostics go to a daily-rotated file at
//! [`Config::log_path`]. `RUST_LOG` takes precedence over `[logging] level`.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the background log writer alive; pending lines are flushed on drop.
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

/// Install the file logger at the default location.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    init_at(&Config::log_path(), config)
}

/// Install the file logger writing to `log_path` (rotated by date suffix).
pub fn init_at(log_path: &Path, config: &LoggingConfig) -> Result<LoggingGuard> {
    let (dir, file_name) = split_log_path(log_path)?;
    std::fs::create_dir_all(dir)?;

    let filter = level_filter(&config.level)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, file_name);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| {
            Error::Logging(format!("a global logger is already installed: {}", e))
        })?;

    tracing::debug!(path = %log_path.display(), level = %config.level, "File logging started");
    Ok(LoggingGuard { _worker: worker })
}

/// Send log output to the test harness instead of a file.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn split_log_path(log_path: &Path) -> Result<(&Path, &std::ffi::OsStr)> {
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .ok_or_else(|| Error::Logging(format!("{} is not a file path", log_path.display())))?;
    Ok((dir, file_name))
}

fn level_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| Error::Logging(format!("invalid log level {:?}: {}", level, e)))
}
