// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::config::Settings;
use crate::error::{AppError, Result};

/// Create a configured HTTP client.
pub fn create_client(settings: &Settings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&settings.user_agent)
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))
}
