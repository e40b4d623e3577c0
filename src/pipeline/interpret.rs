// src/pipeline/interpret.rs

//! Status interpretation and message composition.

use crate::error::Result;
use crate::models::{HomeworkRecord, ReviewStatus};

/// Compose the notification text for a homework record.
///
/// Fails if the status code is outside the closed set of known codes; the
/// encounter is logged at debug level first so new codes the API starts
/// emitting can be spotted in the logs.
pub fn interpret(record: &HomeworkRecord) -> Result<String> {
    let status = ReviewStatus::parse(&record.status).inspect_err(|_| {
        log::debug!(
            "API returned an unrecognized homework status: {}",
            record.status
        );
    })?;

    Ok(format!(
        "Status changed for submission \"{}\". {}",
        record.homework_name,
        status.verdict()
    ))
}
