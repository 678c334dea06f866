//! Error types for sms-analytics-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the sms-analytics-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Export file is missing or unreadable
    #[error("cannot read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Export file is not well-formed or a record lacks a required field
    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Logger could not be installed
    #[error("logging error: {0}")]
    Logging(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sms-analytics-core
pub type Result<T> = std::result::Result<T, Error>;
