// src/error.rs

//! Unified error handling for the watcher application.

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport could not complete the request (DNS, TCP, TLS)
    #[error("connection failure: {0}")]
    Connection(#[source] reqwest::Error),

    /// Request completed but the API answered with a non-200 status
    #[error("API answered with HTTP status {0}")]
    BadStatus(u16),

    /// Response body could not be decoded as JSON
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Top-level payload is not a JSON object
    #[error("API response is not a JSON object")]
    UnexpectedPayloadType,

    /// The `homeworks` key is absent from the response
    #[error("API response has no `homeworks` field")]
    HomeworksFieldMissing,

    /// The `homeworks` key is present but not a list
    #[error("`homeworks` field is not a list")]
    HomeworksFieldWrongType,

    /// The `current_date` key is absent from the response
    #[error("API response has no `current_date` field")]
    CurrentDateFieldMissing,

    /// A homework record lacks a mandatory string key
    #[error("homework record has no `{0}` key")]
    RecordMissingKey(&'static str),

    /// Status code outside the closed set of known codes
    #[error("unknown homework status `{0}`")]
    UnknownStatus(String),

    /// Message could not be delivered to the chat
    #[error("message delivery failed: {0}")]
    Delivery(String),

    /// Configuration error (fatal at startup)
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Notification deduplication tag for a failure.
///
/// Compared by value when deciding whether a cycle failure has already been
/// reported to the chat. `UnknownStatus` carries the offending code so that
/// each distinct unrecognized code is reported exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Connection,
    BadStatus,
    MalformedPayload,
    UnexpectedPayloadType,
    HomeworksFieldMissing,
    HomeworksFieldWrongType,
    CurrentDateFieldMissing,
    RecordMissingKey,
    UnknownStatus(String),
    Delivery,
    Config,
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a delivery error from an underlying cause.
    pub fn delivery(cause: impl std::fmt::Display) -> Self {
        Self::Delivery(cause.to_string())
    }

    /// The deduplication tag for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Connection(_) => FailureKind::Connection,
            Self::BadStatus(_) => FailureKind::BadStatus,
            Self::MalformedPayload(_) => FailureKind::MalformedPayload,
            Self::UnexpectedPayloadType => FailureKind::UnexpectedPayloadType,
            Self::HomeworksFieldMissing => FailureKind::HomeworksFieldMissing,
            Self::HomeworksFieldWrongType => FailureKind::HomeworksFieldWrongType,
            Self::CurrentDateFieldMissing => FailureKind::CurrentDateFieldMissing,
            Self::RecordMissingKey(_) => FailureKind::RecordMissingKey,
            Self::UnknownStatus(code) => FailureKind::UnknownStatus(code.clone()),
            Self::Delivery(_) => FailureKind::Delivery,
            Self::Config(_) | Self::Io(_) | Self::Toml(_) | Self::Url(_) => FailureKind::Config,
        }
    }
}
