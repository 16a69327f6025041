//! Mini trend widgets rendered from data embedded in the page markup.

use serde::Deserialize;
use std::sync::Arc;

use crate::charts::backend::{AxisConfig, Dataset};
use crate::charts::lifecycle::{ChartLifecycleManager, RenderOutcome};
use crate::error::{AppError, AppResult};

/// One embedded trend: the canvas to draw on and its values in time order.
#[derive(Debug, Clone, Deserialize)]
pub struct MiniTrend {
    pub canvas_id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub values: Vec<Option<f64>>,
    #[serde(default)]
    pub color: Option<String>,
}

pub struct MiniTrendRenderer {
    charts: Arc<ChartLifecycleManager>,
}

impl MiniTrendRenderer {
    pub fn new(charts: Arc<ChartLifecycleManager>) -> Self {
        Self { charts }
    }

    /// Parse the serialized trend list and draw every sparkline.
    ///
    /// Returns how many sparklines got a chart (the rest show the placeholder).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the embedded JSON is malformed.
    pub fn render_embedded(&self, embedded_json: &str) -> AppResult<usize> {
        let trends: Vec<MiniTrend> = serde_json::from_str(embedded_json)
            .map_err(|e| AppError::Internal(format!("Invalid embedded trend data: {e}")))?;
        Ok(self.render_all(&trends))
    }

    pub fn render_all(&self, trends: &[MiniTrend]) -> usize {
        trends.iter().filter(|t| self.render(t)).count()
    }

    fn render(&self, trend: &MiniTrend) -> bool {
        let dataset = Dataset {
            label: trend.label.clone().unwrap_or_default(),
            points: trend
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect(),
            color: trend.color.clone(),
        };

        match self
            .charts
            .render(&trend.canvas_id, vec![dataset], AxisConfig::sparkline())
        {
            Ok(RenderOutcome::Created(_)) => true,
            Ok(RenderOutcome::Placeholder) => false,
            Err(e) => {
                tracing::warn!(canvas_id = %trend.canvas_id, error = %e, "Sparkline render failed");
                false
            }
        }
    }
}
