use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mission_dashboard::charts::LoggingBackend;
use mission_dashboard::collaborators::PageReloader;
use mission_dashboard::collaborators::logging::{
    AlwaysAuthenticated, LogNotifier, LogPanelView, NoSpinner,
};
use mission_dashboard::config::Config;
use mission_dashboard::dashboard::{Collaborators, Dashboard};
use mission_dashboard::panels::PanelCommand;
use mission_dashboard::preferences::JsonFilePreferenceStore;

/// Headless stand-in for a page reload: asks the main loop to rebuild the dashboard.
struct ChannelReloader {
    tx: mpsc::UnboundedSender<String>,
}

impl PageReloader for ChannelReloader {
    fn hard_reload(&self, reason: &str) {
        if self.tx.send(reason.to_string()).is_err() {
            tracing::debug!("Reload requested after shutdown");
        }
    }
}

enum Exit {
    Reload(String),
    Shutdown,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mission_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting mission-dashboard...");

    // Load configuration (fail-fast)
    let config = Config::from_env()?;
    tracing::info!(
        api = %config.api_base_url,
        mission = %config.mission_id,
        realtime = config.realtime,
        "Configuration loaded"
    );

    let preferences = Arc::new(JsonFilePreferenceStore::open(&config.preferences_path)?);
    let charts = Arc::new(LoggingBackend::default());
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let (reload_tx, mut reload_rx) = mpsc::unbounded_channel();
        let collaborators = Collaborators {
            auth: Arc::new(AlwaysAuthenticated),
            notifier: Arc::new(LogNotifier),
            spinner: Arc::new(NoSpinner),
            panels: Arc::new(LogPanelView),
            reloader: Arc::new(ChannelReloader { tx: reload_tx }),
            charts: charts.clone(),
            preferences: preferences.clone(),
        };

        let dashboard = Dashboard::new(config.clone(), collaborators)?;
        let background = dashboard.spawn_background();
        let mut countdown = background.countdown.clone();
        let mut countdown_open = true;

        let outcome = dashboard
            .dispatch(PanelCommand::Activate(config.initial_panel))
            .await;
        tracing::info!(panel = %config.initial_panel, ?outcome, "Initial panel loaded");

        let exit = loop {
            tokio::select! {
                reason = reload_rx.recv() => {
                    break Exit::Reload(reason.unwrap_or_default());
                }
                changed = countdown.changed(), if countdown_open => {
                    if changed.is_err() {
                        countdown_open = false;
                    } else if let Some(left) = *countdown.borrow_and_update()
                        && left.as_secs() % 60 == 0
                    {
                        tracing::debug!(seconds = left.as_secs(), "Next refresh");
                    }
                }
                () = &mut shutdown => break Exit::Shutdown,
            }
        };

        background.abort();
        match exit {
            Exit::Reload(reason) => {
                tracing::info!(reason = %reason, "Reloading dashboard");
            }
            Exit::Shutdown => break,
        }
    }

    tracing::info!("Dashboard shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
