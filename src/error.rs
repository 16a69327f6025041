use chrono::{DateTime, Utc};

/// Rejected user input, caught before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Start date ({start}) must be before end date ({end})")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Failure of a single chart data request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// 401/403 from the server, or no authenticated session. Never retried.
    #[error("Unauthorized (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Network failure, non-success status or unreadable body.
    #[error("{0}")]
    Transient(String),
}

impl FetchError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Failure reported by the rendering backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Canvas '{0}' not found")]
    CanvasNotFound(String),

    #[error("Chart creation failed: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Preferences error: {0}")]
    Preferences(#[from] crate::preferences::PreferencesError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;
