use std::env;
use std::path::PathBuf;

use crate::category::{Category, DataSource};

#[derive(Debug, Clone)]
pub struct Config {
    // Mission API
    pub api_base_url: String,
    pub mission_id: String,
    pub api_token: Option<String>,
    pub request_timeout_seconds: u64,

    // Refresh settings
    pub realtime: bool,
    pub cache_poll_interval_seconds: u64,
    pub fallback_reload_seconds: u64,

    // Charts
    pub theme_debounce_millis: u64,

    // Page defaults
    pub default_hours_back: u32,
    pub default_granularity_minutes: u32,
    pub default_source: DataSource,
    pub default_local_path: Option<String>,
    pub initial_panel: Category,

    // Client-side persistence
    pub preferences_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `MISSION_ID` is absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            // Mission API
            api_base_url: parsed("MISSION_API_BASE_URL", "http://localhost:8000")
                .trim_end_matches('/')
                .to_string(),
            mission_id: lookup("MISSION_ID")
                .filter(|s| !s.trim().is_empty())
                .ok_or(ConfigError::Missing("MISSION_ID"))?,
            api_token: lookup("MISSION_API_TOKEN").filter(|s| !s.is_empty()),
            request_timeout_seconds: parsed("MISSION_REQUEST_TIMEOUT_SECONDS", "60")
                .parse()
                .unwrap_or(60),

            // Refresh settings
            realtime: parsed("MISSION_REALTIME", "true").parse().unwrap_or(true),
            cache_poll_interval_seconds: parsed("CACHE_POLL_INTERVAL_SECONDS", "60")
                .parse()
                .unwrap_or(60),
            fallback_reload_seconds: parsed("FALLBACK_RELOAD_SECONDS", "300")
                .parse()
                .unwrap_or(300), // 5 minutes default

            // Charts
            theme_debounce_millis: parsed("THEME_DEBOUNCE_MILLIS", "50")
                .parse()
                .unwrap_or(50),

            // Page defaults
            default_hours_back: parsed("DEFAULT_HOURS_BACK", "24").parse().unwrap_or(24),
            default_granularity_minutes: parsed("DEFAULT_GRANULARITY_MINUTES", "15")
                .parse()
                .unwrap_or(15),
            default_source: parsed("DEFAULT_DATA_SOURCE", "remote")
                .parse()
                .unwrap_or(DataSource::Remote),
            default_local_path: lookup("DEFAULT_LOCAL_PATH").filter(|s| !s.is_empty()),
            initial_panel: Category::from_name(&parsed("INITIAL_PANEL", "power"))
                .unwrap_or(Category::Power),

            // Client-side persistence
            preferences_path: PathBuf::from(parsed(
                "PREFERENCES_PATH",
                ".mission-dashboard/preferences.json",
            )),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
