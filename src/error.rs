use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(calendar_summary::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calendar_summary::config))]
    Config(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(calendar_summary::google_calendar))]
    GoogleCalendar(String),

    #[error("Storage error: {0}")]
    #[diagnostic(code(calendar_summary::storage))]
    Storage(String),

    #[error("Spreadsheet error: {0}")]
    #[diagnostic(code(calendar_summary::spreadsheet))]
    Spreadsheet(String),

    #[error("Trigger error: {0}")]
    #[diagnostic(code(calendar_summary::trigger))]
    Trigger(String),

    #[error("Redis error: {0}")]
    #[diagnostic(code(calendar_summary::redis))]
    Redis(#[from] redis::RedisError),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(calendar_summary::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(calendar_summary::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calendar_summary::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(calendar_summary::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for JSON errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type SummaryResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create storage errors
pub fn storage_error(message: &str) -> Error {
    Error::Storage(message.to_string())
}

/// Helper to create spreadsheet errors
pub fn spreadsheet_error(message: &str) -> Error {
    Error::Spreadsheet(message.to_string())
}

/// Helper to create trigger errors
pub fn trigger_error(message: &str) -> Error {
    Error::Trigger(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
