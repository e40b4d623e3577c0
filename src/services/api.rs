// src/services/api.rs

//! Homework status API client.
//!
//! Issues authenticated GET requests against the review endpoint and decodes
//! the body as JSON. The client never retries; retry cadence belongs to the
//! poll loop.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::{Credentials, Settings};
use crate::error::{AppError, Result};
use crate::utils::http::create_client;

/// Interface to the homework status API.
#[async_trait]
pub trait HomeworkApi: Send + Sync {
    /// Fetch homework statuses changed since `from_date` (unix seconds).
    async fn fetch(&self, from_date: i64) -> Result<Value>;
}

/// HTTP client for the homework status endpoint.
pub struct StatusApi {
    client: Client,
    endpoint: Url,
    token: String,
}

impl StatusApi {
    /// Create a new API client for the configured endpoint.
    pub fn new(settings: &Settings, credentials: &Credentials) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            endpoint: Url::parse(&settings.endpoint)?,
            token: credentials.practicum_token.clone(),
        })
    }

    fn auth_header(&self) -> String {
        format!("OAuth {}", self.token)
    }
}

#[async_trait]
impl HomeworkApi for StatusApi {
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(AUTHORIZATION, self.auth_header())
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(AppError::Connection)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::BadStatus(status.as_u16()));
        }

        // Decode separately from the transfer so an undecodable body is
        // reported as a malformed payload, not a connection failure.
        let body = response.text().await.map_err(AppError::Connection)?;
        Ok(serde_json::from_str(&body)?)
    }
}
