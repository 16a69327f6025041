use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::api::models::{CacheStatusResponse, ChartData, DataResponse};
use crate::config::Config;
use crate::error::{AppError, AppResult, FetchError};
use crate::query::{self, RequestDescriptor};

/// Thin HTTP client for the mission API.
pub struct MissionApiClient {
    http_client: Client,
    base_url: String,
    mission_id: String,
    bearer_token: Option<String>,
}

impl MissionApiClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.clone(),
            mission_id: config.mission_id.clone(),
            bearer_token: config.api_token.clone(),
        })
    }

    #[must_use]
    pub fn mission_id(&self) -> &str {
        &self.mission_id
    }

    /// Issue one GET for the descriptor and map failure statuses.
    async fn send(&self, descriptor: &RequestDescriptor) -> Result<reqwest::Response, FetchError> {
        let url = format!("{}{}", self.base_url, descriptor.path);

        let mut request = self.http_client.get(&url).query(&descriptor.params);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transient(format!("Request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Transient(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<T, FetchError> {
        let response = self.send(descriptor).await?;

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transient(format!("Failed to get response text: {e}")))?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %descriptor.path,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to parse mission API response"
            );
            FetchError::Transient(format!("Failed to parse response: {e}"))
        })
    }

    /// Fetch chart rows for a data request, accepting both the bare-array and
    /// the enveloped response shape.
    ///
    /// # Errors
    ///
    /// `FetchError::Unauthorized` on 401/403, `FetchError::Transient` otherwise.
    pub async fn get_chart_data(&self, descriptor: &RequestDescriptor) -> Result<ChartData, FetchError> {
        let response: DataResponse = self.get_json(descriptor).await?;
        Ok(response.into())
    }

    /// Fetch the per-report-type cache timestamps for the mission.
    ///
    /// # Errors
    ///
    /// `FetchError::Unauthorized` on 401/403, `FetchError::Transient` otherwise.
    pub async fn get_cache_status(&self) -> Result<CacheStatusResponse, FetchError> {
        self.get_json(&query::cache_status_request(&self.mission_id))
            .await
    }

    /// Fetch a forecast-style payload as raw JSON.
    ///
    /// # Errors
    ///
    /// `FetchError::Unauthorized` on 401/403, `FetchError::Transient` otherwise.
    pub async fn get_forecast(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<serde_json::Value, FetchError> {
        self.get_json(descriptor).await
    }
}
