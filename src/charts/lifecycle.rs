use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::charts::backend::{
    AxisConfig, ChartBackend, ChartConfig, ChartHandle, Dataset, ThemeColors, UpdateMode,
};
use crate::error::RenderError;

pub const NO_DATA_MESSAGE: &str = "No data available for the selected time range";

/// One record per canvas for the lifetime of the manager.
///
/// `handle` is `None` until the first successful render and again after a
/// render that ended in the placeholder.
#[derive(Debug, Clone)]
pub struct ChartRecord {
    pub canvas_id: String,
    pub handle: Option<ChartHandle>,
    config: Option<ChartConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Created(ChartHandle),
    Placeholder,
}

/// Owns every widget instance and guarantees at most one per canvas.
pub struct ChartLifecycleManager {
    backend: Arc<dyn ChartBackend>,
    records: Mutex<HashMap<String, ChartRecord>>,
    theme: Mutex<ThemeColors>,
}

impl ChartLifecycleManager {
    pub fn new(backend: Arc<dyn ChartBackend>) -> Self {
        Self {
            backend,
            records: Mutex::new(HashMap::new()),
            theme: Mutex::new(ThemeColors::default()),
        }
    }

    /// Replace whatever is on the canvas with a fresh chart.
    ///
    /// Any existing handle is destroyed first, unconditionally. Series without a
    /// single non-null value are dropped; if nothing remains, the "no data"
    /// placeholder is drawn and the record is left without a handle.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the backend cannot create the chart. The old
    /// handle is already gone at that point.
    pub fn render(
        &self,
        canvas_id: &str,
        mut datasets: Vec<Dataset>,
        axis: AxisConfig,
    ) -> Result<RenderOutcome, RenderError> {
        datasets.retain(Dataset::is_plottable);

        // Under the records lock, so a concurrent re_theme cannot miss this chart
        let mut records = self.records.lock();
        let theme = self.theme.lock().clone();
        let record = Self::clear_record(&self.backend, &mut records, canvas_id);

        if datasets.is_empty() {
            tracing::debug!(canvas_id, "No plottable series, drawing placeholder");
            self.backend.draw_placeholder(canvas_id, NO_DATA_MESSAGE);
            return Ok(RenderOutcome::Placeholder);
        }

        let config = ChartConfig {
            datasets,
            axis,
            theme,
        };
        let handle = self.backend.create(canvas_id, &config)?;
        record.handle = Some(handle);
        record.config = Some(config);

        tracing::debug!(canvas_id, handle = handle.0, "Chart rendered");
        Ok(RenderOutcome::Created(handle))
    }

    /// Destroy any chart on the canvas and draw a text message instead.
    pub fn render_placeholder(&self, canvas_id: &str, message: &str) {
        let mut records = self.records.lock();
        Self::clear_record(&self.backend, &mut records, canvas_id);
        self.backend.draw_placeholder(canvas_id, message);
    }

    fn clear_record<'a>(
        backend: &Arc<dyn ChartBackend>,
        records: &'a mut HashMap<String, ChartRecord>,
        canvas_id: &str,
    ) -> &'a mut ChartRecord {
        let record = records
            .entry(canvas_id.to_string())
            .or_insert_with(|| ChartRecord {
                canvas_id: canvas_id.to_string(),
                handle: None,
                config: None,
            });
        if let Some(old) = record.handle.take() {
            backend.destroy(old);
        }
        record.config = None;
        record
    }

    /// Recolor every live chart in place and redraw without animation.
    ///
    /// Returns the number of charts updated.
    pub fn re_theme(&self, text_color: &str, grid_color: &str) -> usize {
        let theme = ThemeColors {
            text: text_color.to_string(),
            grid: grid_color.to_string(),
        };
        // Lock order: records, then theme
        let mut records = self.records.lock();
        *self.theme.lock() = theme.clone();

        let mut updated = 0;
        for record in records.values_mut() {
            if let (Some(handle), Some(config)) = (record.handle, record.config.as_mut()) {
                config.theme = theme.clone();
                self.backend.update(handle, config, UpdateMode::None);
                updated += 1;
            }
        }

        tracing::debug!(updated, text_color, grid_color, "Charts re-themed");
        updated
    }

    #[must_use]
    pub fn handle(&self, canvas_id: &str) -> Option<ChartHandle> {
        self.records.lock().get(canvas_id).and_then(|r| r.handle)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.records
            .lock()
            .values()
            .filter(|r| r.handle.is_some())
            .count()
    }

    #[must_use]
    pub fn record(&self, canvas_id: &str) -> Option<ChartRecord> {
        self.records.lock().get(canvas_id).cloned()
    }

    #[must_use]
    pub fn theme(&self) -> ThemeColors {
        self.theme.lock().clone()
    }
}
