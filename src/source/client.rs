//! Meter Backend Client
//!
//! HTTP client for the live meter backend's REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{SourceError, SourceResult};
use super::{MeterSource, SourceConfig};
use crate::meter::{ClearResponse, DataResponse};

/// Path of the statistics endpoint
pub const DATA_PATH: &str = "/api/data";

/// Path of the clear endpoint
pub const CLEAR_PATH: &str = "/api/clear";

/// Live meter backend client
///
/// Issues exactly one request per call. There is no retry and no caching.
pub struct MeterClient {
    client: Client,
    base_url: String,
}

impl MeterClient {
    /// Create a client for the configured backend
    pub fn new(config: &SourceConfig) -> SourceResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the current statistics
    pub async fn get_data(&self) -> SourceResult<DataResponse> {
        self.get_json(DATA_PATH).await
    }

    /// Ask the backend to clear its statistics
    pub async fn clear(&self) -> SourceResult<ClearResponse> {
        self.get_json(CLEAR_PATH).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SourceResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else if e.is_connect() {
                SourceError::Unavailable(self.base_url.clone())
            } else {
                SourceError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MeterSource for MeterClient {
    fn name(&self) -> &str {
        "live"
    }

    async fn fetch_snapshot(&self) -> SourceResult<DataResponse> {
        self.get_data().await
    }

    async fn clear_snapshot(&self) -> SourceResult<ClearResponse> {
        self.clear().await
    }
}
