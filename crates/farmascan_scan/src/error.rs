//! Error types for scan configuration
//!
//! Classification itself never fails: rejected payloads are ordinary
//! [`ScanOutcome::Rejected`](crate::ScanOutcome) values. Only loading and
//! validating configuration can produce an error.

use std::io;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid app scheme '{scheme}': {reason}")]
    InvalidScheme { scheme: String, reason: String },

    #[error("Invalid deep link route '{route}': {reason}")]
    InvalidRoute { route: String, reason: String },

    #[error("Invalid identifier pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid limit {name} = {value}: {reason}")]
    InvalidLimit {
        name: &'static str,
        value: u64,
        reason: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ConfigError>;
