//! Theme change propagation to live charts.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::charts::backend::ThemeColors;
use crate::charts::lifecycle::ChartLifecycleManager;

const THEME_CHANNEL_CAPACITY: usize = 16;

/// Published by whatever owns the color scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeChanged {
    pub colors: ThemeColors,
}

#[derive(Clone)]
pub struct ThemeBus {
    tx: broadcast::Sender<ThemeChanged>,
}

impl Default for ThemeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeBus {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(THEME_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Returns the number of subscribers that will see the event.
    pub fn publish(&self, text_color: &str, grid_color: &str) -> usize {
        self.tx
            .send(ThemeChanged {
                colors: ThemeColors {
                    text: text_color.to_string(),
                    grid: grid_color.to_string(),
                },
            })
            .unwrap_or(0)
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ThemeChanged> {
        self.tx.subscribe()
    }
}

/// Re-theme all charts on every theme change.
///
/// Each event waits `debounce` before applying, and a burst of events inside
/// that window collapses into the latest one.
pub async fn run_theme_watcher(
    charts: Arc<ChartLifecycleManager>,
    mut rx: broadcast::Receiver<ThemeChanged>,
    debounce: Duration,
) {
    loop {
        let mut latest = match rx.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Theme watcher lagged");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => return,
        };

        tokio::time::sleep(debounce).await;

        loop {
            match rx.try_recv() {
                Ok(event) => latest = event,
                Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                Err(_) => break,
            }
        }

        charts.re_theme(&latest.colors.text, &latest.colors.grid);
    }
}
