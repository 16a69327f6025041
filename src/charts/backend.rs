//! Interface to the external rendering library.
//!
//! The library is consumed as an opaque widget: `create` returns a handle bound
//! to one canvas, `destroy` releases it, `update` redraws with a modified config.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::RenderError;

/// Opaque reference to a live widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(pub u64);

/// How the x values of a chart are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisKind {
    /// Epoch milliseconds.
    #[default]
    Time,
    Linear,
    /// Sample index, no visible axis.
    Index,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub points: Vec<(f64, Option<f64>)>,
    pub color: Option<String>,
}

impl Dataset {
    /// At least one non-null value.
    #[must_use]
    pub fn is_plottable(&self) -> bool {
        self.points.iter().any(|(_, y)| y.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisConfig {
    pub x_kind: AxisKind,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub show_axes: bool,
    pub show_legend: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            x_kind: AxisKind::Time,
            x_title: None,
            y_title: None,
            show_axes: true,
            show_legend: true,
        }
    }
}

impl AxisConfig {
    /// Bare sparkline: no axes, no legend.
    #[must_use]
    pub fn sparkline() -> Self {
        Self {
            x_kind: AxisKind::Index,
            show_axes: false,
            show_legend: false,
            ..Self::default()
        }
    }
}

/// Axis title, tick, grid and legend label colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub text: String,
    pub grid: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            text: "#212529".to_string(),
            grid: "rgba(0, 0, 0, 0.1)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub datasets: Vec<Dataset>,
    pub axis: AxisConfig,
    pub theme: ThemeColors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Animated,
    /// Redraw without animation.
    None,
}

pub trait ChartBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns `RenderError` if the canvas is missing or the widget cannot be created.
    fn create(&self, canvas_id: &str, config: &ChartConfig) -> Result<ChartHandle, RenderError>;

    fn destroy(&self, handle: ChartHandle);

    fn update(&self, handle: ChartHandle, config: &ChartConfig, mode: UpdateMode);

    /// Draw a text message directly on the canvas, without a widget.
    fn draw_placeholder(&self, canvas_id: &str, message: &str);
}

/// Backend for headless runs: allocates handles and logs every call.
#[derive(Default)]
pub struct LoggingBackend {
    next_handle: AtomicU64,
}

impl ChartBackend for LoggingBackend {
    fn create(&self, canvas_id: &str, config: &ChartConfig) -> Result<ChartHandle, RenderError> {
        let handle = ChartHandle(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        tracing::info!(
            canvas_id,
            handle = handle.0,
            series = config.datasets.len(),
            points = config.datasets.iter().map(|d| d.points.len()).sum::<usize>(),
            "Chart created"
        );
        Ok(handle)
    }

    fn destroy(&self, handle: ChartHandle) {
        tracing::debug!(handle = handle.0, "Chart destroyed");
    }

    fn update(&self, handle: ChartHandle, config: &ChartConfig, mode: UpdateMode) {
        tracing::debug!(
            handle = handle.0,
            text_color = %config.theme.text,
            grid_color = %config.theme.grid,
            ?mode,
            "Chart updated"
        );
    }

    fn draw_placeholder(&self, canvas_id: &str, message: &str) {
        tracing::info!(canvas_id, message, "Placeholder drawn");
    }
}
