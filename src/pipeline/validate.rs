// src/pipeline/validate.rs

//! API response contract validation.
//!
//! The payload is untrusted: the API has been observed returning a mapping
//! where the homework list belongs, so shape violations are hard errors
//! rather than best-effort reinterpretations.

use serde_json::Value;

use crate::error::{AppError, Result};

/// Validate a decoded API response and extract the homework list.
///
/// The contract requires a JSON object with a `homeworks` array and a
/// `current_date` key, both mandatory. The list is returned unmodified and
/// may be empty.
pub fn validate(payload: &Value) -> Result<Vec<Value>> {
    let object = payload
        .as_object()
        .ok_or(AppError::UnexpectedPayloadType)?;

    let homeworks = object
        .get("homeworks")
        .ok_or(AppError::HomeworksFieldMissing)?;

    let homeworks = homeworks
        .as_array()
        .ok_or(AppError::HomeworksFieldWrongType)?;

    if !object.contains_key("current_date") {
        return Err(AppError::CurrentDateFieldMissing);
    }

    Ok(homeworks.clone())
}
