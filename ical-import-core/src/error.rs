//! Error types for ical-import.

use std::error::Error as _;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while importing bookings from a feed.
///
/// Every variant renders a non-empty message; the HTTP layer reports that
/// message verbatim and does not distinguish between variants.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch calendar feed: {0}")]
    Fetch(String),

    #[error("Calendar feed returned HTTP {status} for url: {url}")]
    Status { status: StatusCode, url: String },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Event '{summary}' has no {property}")]
    MissingDate {
        property: &'static str,
        summary: String,
    },

    #[error("Event '{summary}' has an invalid {property} value '{value}'")]
    InvalidDate {
        property: &'static str,
        summary: String,
        value: String,
    },
}

impl ImportError {
    /// Wrap a transport error, keeping its whole source chain in the message.
    ///
    /// reqwest's own `Display` stops at "error sending request", which hides
    /// whether the cause was DNS, a refused connection or a timeout.
    pub fn fetch(err: reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ImportError::Fetch(message)
    }
}

impl From<::config::ConfigError> for ImportError {
    fn from(err: ::config::ConfigError) -> Self {
        ImportError::Config(err.to_string())
    }
}

/// Result type alias for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
