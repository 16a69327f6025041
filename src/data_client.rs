//! Chart data fetching with auth handling and loading indicators.

use std::sync::Arc;

use crate::api::MissionApiClient;
use crate::api::models::ChartData;
use crate::category::Category;
use crate::collaborators::{AuthGate, LoadingIndicator, SpinnerGuard};
use crate::error::FetchError;
use crate::query::RequestDescriptor;

/// Issues exactly one request per call. Deduplication belongs to the loaders.
#[derive(Clone)]
pub struct ChartDataClient {
    api: Arc<MissionApiClient>,
    auth: Arc<dyn AuthGate>,
    spinner: Arc<dyn LoadingIndicator>,
}

impl ChartDataClient {
    pub fn new(
        api: Arc<MissionApiClient>,
        auth: Arc<dyn AuthGate>,
        spinner: Arc<dyn LoadingIndicator>,
    ) -> Self {
        Self { api, auth, spinner }
    }

    #[must_use]
    pub fn api(&self) -> &MissionApiClient {
        &self.api
    }

    /// Fetch rows for one category while its canvases show a spinner.
    ///
    /// # Errors
    ///
    /// - `FetchError::Unauthorized`: sign-out has already been forced; do not retry.
    /// - `FetchError::Transient`: network failure or non-success status.
    pub async fn fetch(
        &self,
        category: Category,
        descriptor: &RequestDescriptor,
        canvas_ids: &[&str],
    ) -> Result<ChartData, FetchError> {
        if !self.auth.is_authenticated() {
            tracing::warn!(category = %category, "No authenticated session, skipping fetch");
            self.auth.force_sign_out();
            return Err(FetchError::Unauthorized { status: 401 });
        }

        let _spinner = SpinnerGuard::start(Arc::clone(&self.spinner), canvas_ids);

        tracing::debug!(
            category = %category,
            path = %descriptor.path,
            params = ?descriptor.params,
            "Fetching chart data"
        );

        let result = self.api.get_chart_data(descriptor).await;
        self.after_fetch(category, result)
    }

    /// Fetch a forecast-style payload under the same auth rules.
    ///
    /// # Errors
    ///
    /// Same as [`ChartDataClient::fetch`].
    pub async fn fetch_forecast(
        &self,
        descriptor: &RequestDescriptor,
        canvas_ids: &[&str],
    ) -> Result<serde_json::Value, FetchError> {
        if !self.auth.is_authenticated() {
            self.auth.force_sign_out();
            return Err(FetchError::Unauthorized { status: 401 });
        }

        let _spinner = SpinnerGuard::start(Arc::clone(&self.spinner), canvas_ids);
        let result = self.api.get_forecast(descriptor).await;
        if let Err(FetchError::Unauthorized { status }) = &result {
            tracing::warn!(status, path = %descriptor.path, "Forecast request unauthorized");
            self.auth.force_sign_out();
        }
        result
    }

    fn after_fetch(
        &self,
        category: Category,
        result: Result<ChartData, FetchError>,
    ) -> Result<ChartData, FetchError> {
        match &result {
            Ok(data) => {
                tracing::debug!(
                    category = %category,
                    rows = data.rows.len(),
                    cache_timestamp = ?data.cache_meta.as_ref().and_then(|m| m.cache_timestamp),
                    "Chart data received"
                );
            }
            Err(FetchError::Unauthorized { status }) => {
                tracing::warn!(category = %category, status, "Chart data request unauthorized");
                self.auth.force_sign_out();
            }
            Err(FetchError::Transient(msg)) => {
                tracing::warn!(category = %category, error = %msg, "Chart data request failed");
            }
        }
        result
    }
}
