//! Homework record and review status types.

use serde_json::Value;

use crate::error::{AppError, Result};

/// A single homework record from the API.
///
/// The API may attach arbitrary extra keys to a record; only the two
/// mandatory string keys are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    /// Submission name
    pub homework_name: String,

    /// Raw review status code
    pub status: String,
}

impl HomeworkRecord {
    /// Extract a record from an untrusted JSON value.
    ///
    /// Fails naming the first mandatory key that is absent or not a string.
    pub fn from_value(value: &Value) -> Result<Self> {
        let homework_name = Self::string_key(value, "homework_name")?;
        let status = Self::string_key(value, "status")?;
        Ok(Self {
            homework_name,
            status,
        })
    }

    fn string_key(value: &Value, key: &'static str) -> Result<String> {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(AppError::RecordMissingKey(key))
    }
}

/// The closed set of known review statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl ReviewStatus {
    /// Parse a status code, rejecting anything outside the closed set.
    pub fn parse(code: &str) -> Result<Self> {
        match code {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::UnknownStatus(code.to_string())),
        }
    }

    /// The fixed human-readable verdict for this status.
    pub fn verdict(&self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}
