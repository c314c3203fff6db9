//! Unified tracker error types.

use thiserror::Error;

/// The one message shown to users when a refresh cycle fails, whatever the cause.
pub const USER_FACING_FAILURE: &str = "Failed to load data. Please try again later.";

/// Top-level tracker error.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Malformed provider data: {0}")]
    Malformed(#[from] MalformedDataError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    /// Short label used as the `kind` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::Http(HttpError::RateLimited { .. }) => "rate_limited",
            TrackerError::Http(HttpError::Status { .. }) => "http_status",
            TrackerError::Http(_) => "network",
            TrackerError::Malformed(_) => "malformed_data",
            TrackerError::Storage(_) => "storage",
            TrackerError::UnknownInstrument(_) => "unknown_instrument",
            TrackerError::Config(_) => "config",
        }
    }

    /// Error kinds are not distinguished for the user.
    pub fn user_message(&self) -> &'static str {
        USER_FACING_FAILURE
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Non-2xx, non-429 response. Never retried.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Still 429 after every retry. Try again in a minute.
    #[error("Rate limited after {attempts} attempts, try again in a minute")]
    RateLimited { attempts: u32 },

    /// Transport failures on every attempt.
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Provider payload is missing a required field or holds a non-numeric value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedDataError {
    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("field `{field}` is not numeric: {value}")]
    NotNumeric { field: String, value: String },

    #[error("timestamps out of order at index {index}")]
    OutOfOrder { index: usize },

    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),
}

/// A stored cache entry could not be parsed. Recovered as a miss, never returned.
#[derive(Error, Debug)]
#[error("corrupt cache entry `{key}`: {reason}")]
pub struct CacheReadError {
    pub key: String,
    pub reason: String,
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
