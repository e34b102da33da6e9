//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// An engine setting could not be parsed or is out of range.
    #[error("invalid {section} setting: {reason}")]
    InvalidSetting {
        section: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(section: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidSetting {
            section,
            reason: reason.into(),
        }
    }
}
