//! Per-category data loaders.
//!
//! A loader reads the category's window state, fetches its rows and redraws
//! its charts. Loaders can be invoked at any time from any control:
//!
//! - invocations of one loader never overlap; each waits for the previous one
//! - every invocation takes a sequence number, and only the latest issued one
//!   may render; older ones are skipped or their responses discarded
//! - failures never escape: the outcome is reported and the UI left idle

use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::models::ChartData;
use crate::category::{Category, CategoryState};
use crate::charts::datasets::{axis_for, extract_datasets, spectrum_axis, spectrum_datasets};
use crate::charts::lifecycle::{ChartLifecycleManager, RenderOutcome};
use crate::charts::specs::{WAVE_SPECTRUM_CANVAS, chart_specs};
use crate::collaborators::Notifier;
use crate::common::CategoryStates;
use crate::data_client::ChartDataClient;
use crate::error::{FetchError, ValidationError};
use crate::query::{self, ForecastKind};

const UNAVAILABLE_MESSAGE: &str = "Data unavailable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered { charts: usize, placeholders: usize },
    /// Request succeeded but nothing was plottable.
    NoData,
    /// Bad window input; no request was made.
    Invalid(ValidationError),
    Unauthorized,
    Failed(String),
    /// A newer invocation of the same loader took over.
    Superseded,
}

pub type LoaderFuture = BoxFuture<'static, LoadOutcome>;

/// Zero-argument loader; the future resolves when the load is finished.
pub type Loader = Arc<dyn Fn() -> LoaderFuture + Send + Sync>;

pub struct CategoryLoader {
    category: Category,
    mission_id: String,
    states: Arc<CategoryStates>,
    client: ChartDataClient,
    charts: Arc<ChartLifecycleManager>,
    notifier: Arc<dyn Notifier>,
    issued: AtomicU64,
    in_flight: tokio::sync::Mutex<()>,
}

impl CategoryLoader {
    pub fn new(
        category: Category,
        mission_id: String,
        states: Arc<CategoryStates>,
        client: ChartDataClient,
        charts: Arc<ChartLifecycleManager>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            category,
            mission_id,
            states,
            client,
            charts,
            notifier,
            issued: AtomicU64::new(0),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Wrap into the registry's loader type.
    pub fn into_loader(self: Arc<Self>) -> Loader {
        Arc::new(move || -> LoaderFuture {
            let this = Arc::clone(&self);
            Box::pin(async move { this.load().await })
        })
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == seq
    }

    pub async fn load(&self) -> LoadOutcome {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = self.in_flight.lock().await;

        if !self.is_latest(seq) {
            tracing::debug!(category = %self.category, seq, "Queued load superseded");
            return LoadOutcome::Superseded;
        }

        let state = self.states.get(self.category);
        let descriptor = match query::build_request(&self.mission_id, &state) {
            Ok(d) => d,
            Err(e) => {
                self.notifier.inline_validation(self.category, &e.to_string());
                return LoadOutcome::Invalid(e);
            }
        };

        let refresh = self.states.take_refresh(self.category);
        let descriptor = if refresh {
            descriptor.with_refresh()
        } else {
            descriptor
        };

        let specs = chart_specs(self.category);
        let canvas_ids: Vec<&str> = specs.iter().map(|s| s.canvas_id).collect();
        let result = self.client.fetch(self.category, &descriptor, &canvas_ids).await;

        if !self.is_latest(seq) {
            tracing::debug!(category = %self.category, seq, "Discarding superseded response");
            if refresh {
                self.states.request_refresh(self.category);
            }
            return LoadOutcome::Superseded;
        }

        let outcome = match result {
            Ok(data) => self.render(&data),
            Err(FetchError::Unauthorized { .. }) => return LoadOutcome::Unauthorized,
            Err(FetchError::Transient(msg)) => {
                self.notifier.toast(&format!(
                    "Failed to load {} data: {msg}",
                    self.category
                ));
                for id in &canvas_ids {
                    self.charts.render_placeholder(id, UNAVAILABLE_MESSAGE);
                }
                LoadOutcome::Failed(msg)
            }
        };

        if self.category == Category::Waves {
            self.load_wave_spectrum(&state, refresh).await;
        }

        outcome
    }

    fn render(&self, data: &ChartData) -> LoadOutcome {
        let mut charts = 0;
        let mut placeholders = 0;

        for spec in chart_specs(self.category) {
            let datasets = extract_datasets(&data.rows, spec);
            match self.charts.render(spec.canvas_id, datasets, axis_for(spec)) {
                Ok(RenderOutcome::Created(_)) => charts += 1,
                Ok(RenderOutcome::Placeholder) => placeholders += 1,
                Err(e) => {
                    tracing::error!(
                        category = %self.category,
                        canvas_id = spec.canvas_id,
                        error = %e,
                        "Chart render failed"
                    );
                    placeholders += 1;
                }
            }
        }

        if charts == 0 {
            tracing::debug!(category = %self.category, rows = data.rows.len(), "No plottable data");
            LoadOutcome::NoData
        } else {
            LoadOutcome::Rendered {
                charts,
                placeholders,
            }
        }
    }

    async fn load_wave_spectrum(&self, state: &CategoryState, refresh: bool) {
        let Ok(mut descriptor) =
            query::build_forecast_request(ForecastKind::WaveSpectrum, &self.mission_id, state)
        else {
            return;
        };
        if refresh {
            descriptor = descriptor.with_refresh();
        }

        match self
            .client
            .fetch_forecast(&descriptor, &[WAVE_SPECTRUM_CANVAS])
            .await
        {
            Ok(payload) => {
                if let Err(e) = self.charts.render(
                    WAVE_SPECTRUM_CANVAS,
                    spectrum_datasets(&payload),
                    spectrum_axis(),
                ) {
                    tracing::error!(error = %e, "Wave spectrum render failed");
                }
            }
            Err(FetchError::Unauthorized { .. }) => {}
            Err(FetchError::Transient(msg)) => {
                tracing::warn!(error = %msg, "Wave spectrum unavailable");
                self.charts
                    .render_placeholder(WAVE_SPECTRUM_CANVAS, UNAVAILABLE_MESSAGE);
            }
        }
    }
}
