//! The orchestrator: owns every state container and wires the components.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::MissionApiClient;
use crate::category::Category;
use crate::charts::theme::run_theme_watcher;
use crate::charts::{ChartBackend, ChartLifecycleManager, MiniTrendRenderer, ThemeBus};
use crate::collaborators::{AuthGate, LoadingIndicator, Notifier, PageReloader, PanelView};
use crate::common::DashboardState;
use crate::config::Config;
use crate::data_client::ChartDataClient;
use crate::error::AppResult;
use crate::panels::{CategoryLoader, LoadOutcome, PanelCommand, SensorPanelController};
use crate::preferences::PreferenceStore;
use crate::query::{self, ForecastKind};
use crate::sync::scheduler::{RefreshSettings, run_cache_refresh};
use crate::sync::staleness::CacheStatusSource;
use crate::sync::{CacheStalenessMonitor, MonitorState};

/// Everything the host supplies.
#[derive(Clone)]
pub struct Collaborators {
    pub auth: Arc<dyn AuthGate>,
    pub notifier: Arc<dyn Notifier>,
    pub spinner: Arc<dyn LoadingIndicator>,
    pub panels: Arc<dyn PanelView>,
    pub reloader: Arc<dyn PageReloader>,
    pub charts: Arc<dyn ChartBackend>,
    pub preferences: Arc<dyn PreferenceStore>,
}

/// Background tasks started by [`Dashboard::spawn_background`].
pub struct BackgroundTasks {
    pub cache_refresh: JoinHandle<()>,
    pub theme_watcher: JoinHandle<()>,
    pub countdown: watch::Receiver<Option<Duration>>,
}

impl BackgroundTasks {
    pub fn abort(&self) {
        self.cache_refresh.abort();
        self.theme_watcher.abort();
    }
}

pub struct Dashboard {
    state: DashboardState,
    client: ChartDataClient,
    charts: Arc<ChartLifecycleManager>,
    panels: Arc<SensorPanelController>,
    monitor: Arc<CacheStalenessMonitor>,
    theme: ThemeBus,
    trends: MiniTrendRenderer,
}

impl Dashboard {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: Config, collaborators: Collaborators) -> AppResult<Self> {
        let api = Arc::new(MissionApiClient::new(&config)?);
        let source: Arc<dyn CacheStatusSource> = api.clone();
        Ok(Self::with_parts(config, api, source, collaborators))
    }

    /// Build with an explicit API client and cache-status source.
    pub fn with_parts(
        config: Config,
        api: Arc<MissionApiClient>,
        cache_status: Arc<dyn CacheStatusSource>,
        collaborators: Collaborators,
    ) -> Self {
        let state = DashboardState::new(config, collaborators.preferences);

        let client = ChartDataClient::new(api, collaborators.auth, collaborators.spinner);
        let charts = Arc::new(ChartLifecycleManager::new(collaborators.charts));

        let mut panels =
            SensorPanelController::new(collaborators.panels, Arc::clone(&state.categories));
        for category in Category::ALL {
            if panels.resolve(category) != category {
                continue;
            }
            let loader = Arc::new(CategoryLoader::new(
                category,
                state.config.mission_id.clone(),
                Arc::clone(&state.categories),
                client.clone(),
                Arc::clone(&charts),
                Arc::clone(&collaborators.notifier),
            ));
            panels.register(category, loader.into_loader());
        }

        let monitor = Arc::new(CacheStalenessMonitor::new(
            cache_status,
            Arc::clone(&state.cache_snapshot),
            collaborators.reloader,
        ));

        Self {
            trends: MiniTrendRenderer::new(Arc::clone(&charts)),
            state,
            client,
            charts,
            panels: Arc::new(panels),
            monitor,
            theme: ThemeBus::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    #[must_use]
    pub fn charts(&self) -> &Arc<ChartLifecycleManager> {
        &self.charts
    }

    #[must_use]
    pub fn panels(&self) -> &Arc<SensorPanelController> {
        &self.panels
    }

    #[must_use]
    pub fn theme_bus(&self) -> &ThemeBus {
        &self.theme
    }

    #[must_use]
    pub fn monitor_state(&self) -> MonitorState {
        self.monitor.state()
    }

    pub async fn dispatch(&self, command: PanelCommand) -> Option<LoadOutcome> {
        self.panels.dispatch(command).await
    }

    /// Load every registered category concurrently. Completion order is arbitrary.
    pub async fn load_all(&self) -> Vec<(Category, LoadOutcome)> {
        let loads = self.panels.categories().into_iter().filter_map(|category| {
            let loader = self.panels.get_loader(category)?;
            Some(async move { (category, loader().await) })
        });
        join_all(loads).await
    }

    /// Weather or marine forecast payload for the host to display.
    ///
    /// Uses the weather panel's range and source. `refresh` asks the server to
    /// bypass its cache; the weather chart's own pending refresh is left alone.
    ///
    /// # Errors
    ///
    /// Validation of the weather panel's range, or the fetch failure.
    pub async fn forecast(
        &self,
        kind: ForecastKind,
        refresh: bool,
    ) -> AppResult<serde_json::Value> {
        let state = self.state.categories.get(Category::Weather);
        let mut descriptor =
            query::build_forecast_request(kind, &self.state.config.mission_id, &state)?;
        if refresh {
            descriptor = descriptor.with_refresh();
        }
        Ok(self.client.fetch_forecast(&descriptor, &[]).await?)
    }

    /// Draw the sparklines serialized into the page.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed.
    pub fn render_mini_trends(&self, embedded_json: &str) -> AppResult<usize> {
        self.trends.render_embedded(embedded_json)
    }

    /// Persist and apply the auto-refresh preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be persisted.
    pub fn set_auto_refresh(&self, enabled: bool) -> AppResult<()> {
        self.state.auto_refresh.set(enabled)
    }

    /// Start the cache refresh scheduler and the theme watcher.
    pub fn spawn_background(&self) -> BackgroundTasks {
        let config = &self.state.config;
        let (countdown_tx, countdown_rx) = watch::channel(None);

        let cache_refresh = tokio::spawn(run_cache_refresh(
            Arc::clone(&self.monitor),
            RefreshSettings::from_config(config),
            self.state.auto_refresh.subscribe(),
            countdown_tx,
        ));

        let theme_watcher = tokio::spawn(run_theme_watcher(
            Arc::clone(&self.charts),
            self.theme.subscribe(),
            Duration::from_millis(config.theme_debounce_millis),
        ));

        BackgroundTasks {
            cache_refresh,
            theme_watcher,
            countdown: countdown_rx,
        }
    }
}
