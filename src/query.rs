//! Request descriptors for the mission data and forecast endpoints.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

use crate::category::{CategoryState, DataSource};
use crate::error::ValidationError;

/// Normalized request shape: path relative to the API origin plus ordered query params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has_param(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    /// Ask the server to bypass its own cache.
    #[must_use]
    pub fn with_refresh(mut self) -> Self {
        if !self.has_param("refresh") {
            self.params.push(("refresh".to_string(), "true".to_string()));
        }
        self
    }
}

/// Forecast-style endpoints sharing the data endpoint's query conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastKind {
    Weather,
    Marine,
    WaveSpectrum,
}

impl ForecastKind {
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Weather => "forecast",
            Self::Marine => "marine_forecast",
            Self::WaveSpectrum => "wave_spectrum",
        }
    }
}

impl fmt::Display for ForecastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `start_date`/`end_date` for an active explicit range, nothing otherwise.
fn range_params(state: &CategoryState) -> Result<Option<[(String, String); 2]>, ValidationError> {
    let Some((start, end)) = state.range() else {
        return Ok(None);
    };
    if start >= end {
        return Err(ValidationError::InvalidRange { start, end });
    }
    Ok(Some([
        ("start_date".to_string(), iso(start)),
        ("end_date".to_string(), iso(end)),
    ]))
}

fn push_source_params(state: &CategoryState, params: &mut Vec<(String, String)>) {
    params.push(("source".to_string(), state.data_source.as_str().to_string()));
    if state.data_source == DataSource::Local
        && let Some(path) = state.local_path.as_deref()
        && !path.is_empty()
    {
        params.push(("local_path".to_string(), path.to_string()));
    }
}

/// Build the `/api/data/{report_type}/{mission_id}` request for a category.
///
/// With the explicit range active the request carries `start_date`/`end_date`
/// and omits `hours_back`; otherwise it carries `hours_back`. Both carry
/// `granularity_minutes` and `source`.
///
/// # Errors
///
/// Returns `ValidationError::InvalidRange` for an inverted or empty explicit range.
/// No request must be issued in that case.
pub fn build_request(
    mission_id: &str,
    state: &CategoryState,
) -> Result<RequestDescriptor, ValidationError> {
    let mut params = Vec::with_capacity(5);

    match range_params(state)? {
        Some(range) => params.extend(range),
        None => params.push(("hours_back".to_string(), state.hours_back().to_string())),
    }
    params.push((
        "granularity_minutes".to_string(),
        state.granularity_minutes.to_string(),
    ));
    push_source_params(state, &mut params);

    Ok(RequestDescriptor {
        path: format!("/api/data/{}/{}", state.category.as_str(), mission_id),
        params,
    })
}

/// Build a forecast request using the category's range and source selection.
///
/// # Errors
///
/// Same range validation as [`build_request`].
pub fn build_forecast_request(
    kind: ForecastKind,
    mission_id: &str,
    state: &CategoryState,
) -> Result<RequestDescriptor, ValidationError> {
    let mut params = Vec::with_capacity(4);
    if let Some(range) = range_params(state)? {
        params.extend(range);
    }
    push_source_params(state, &mut params);

    Ok(RequestDescriptor {
        path: format!("/api/{}/{}", kind.endpoint(), mission_id),
        params,
    })
}

/// `/api/cache-status/{mission_id}`
#[must_use]
pub fn cache_status_request(mission_id: &str) -> RequestDescriptor {
    RequestDescriptor {
        path: format!("/api/cache-status/{mission_id}"),
        params: Vec::new(),
    }
}
