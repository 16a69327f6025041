//! Sensor categories and the per-category time-window state driven by UI input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::config::Config;

/// A sensor/report grouping shown as one dashboard panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Power,
    Solar,
    Ctd,
    Weather,
    Waves,
    Fluorometer,
    Vr2c,
    WgVm4,
    Telemetry,
    Navigation,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Self::Power,
        Self::Solar,
        Self::Ctd,
        Self::Weather,
        Self::Waves,
        Self::Fluorometer,
        Self::Vr2c,
        Self::WgVm4,
        Self::Telemetry,
        Self::Navigation,
    ];

    /// Panel / report-type key as used in URLs and cache-status maps.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Solar => "solar",
            Self::Ctd => "ctd",
            Self::Weather => "weather",
            Self::Waves => "waves",
            Self::Fluorometer => "fluorometer",
            Self::Vr2c => "vr2c",
            Self::WgVm4 => "wg_vm4",
            Self::Telemetry => "telemetry",
            Self::Navigation => "navigation",
        }
    }

    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Remote,
    Local,
}

impl DataSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

/// Lenient: anything other than a local source name reads as remote.
impl FromStr for DataSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "local" | "local_file" => Self::Local,
            _ => Self::Remote,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    RollingHours,
    ExplicitRange,
}

/// Time window and source selection for one category.
///
/// Only one of the rolling window and the explicit range is active at a time:
/// the range becomes active once both bounds are set, and setting `hours_back`
/// clears both bounds again.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryState {
    pub category: Category,
    hours_back: u32,
    pub granularity_minutes: u32,
    range_start: Option<DateTime<Utc>>,
    range_end: Option<DateTime<Utc>>,
    pub data_source: DataSource,
    pub local_path: Option<String>,
}

impl CategoryState {
    #[must_use]
    pub fn new(category: Category, hours_back: u32, granularity_minutes: u32) -> Self {
        Self {
            category,
            hours_back,
            granularity_minutes,
            range_start: None,
            range_end: None,
            data_source: DataSource::Remote,
            local_path: None,
        }
    }

    /// Initial state from the page defaults.
    #[must_use]
    pub fn from_defaults(category: Category, config: &Config) -> Self {
        Self {
            data_source: config.default_source,
            local_path: config.default_local_path.clone(),
            ..Self::new(
                category,
                config.default_hours_back,
                config.default_granularity_minutes,
            )
        }
    }

    #[must_use]
    pub fn window_mode(&self) -> WindowMode {
        if self.range_start.is_some() && self.range_end.is_some() {
            WindowMode::ExplicitRange
        } else {
            WindowMode::RollingHours
        }
    }

    #[must_use]
    pub fn hours_back(&self) -> u32 {
        self.hours_back
    }

    /// Both bounds, when the explicit range is active.
    #[must_use]
    pub fn range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.range_start.zip(self.range_end)
    }

    /// Switch to the rolling window, discarding any range bounds.
    pub fn set_hours_back(&mut self, hours: u32) {
        self.hours_back = hours;
        self.range_start = None;
        self.range_end = None;
    }

    pub fn set_range_start(&mut self, start: Option<DateTime<Utc>>) {
        self.range_start = start;
    }

    pub fn set_range_end(&mut self, end: Option<DateTime<Utc>>) {
        self.range_end = end;
    }

    pub fn set_range(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.range_start = Some(start);
        self.range_end = Some(end);
    }

    pub fn clear_range(&mut self) {
        self.range_start = None;
        self.range_end = None;
    }

    pub fn set_source(&mut self, source: DataSource, local_path: Option<String>) {
        self.data_source = source;
        self.local_path = local_path.filter(|p| !p.trim().is_empty());
    }
}
