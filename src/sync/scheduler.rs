use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep_until};

use crate::config::Config;
use crate::sync::staleness::{CacheStalenessMonitor, TickOutcome};

#[derive(Debug, Clone, Copy)]
pub struct RefreshSettings {
    pub realtime: bool,
    pub poll_interval: Duration,
    pub fallback_reload: Duration,
}

impl RefreshSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            realtime: config.realtime,
            poll_interval: Duration::from_secs(config.cache_poll_interval_seconds.max(1)),
            fallback_reload: Duration::from_secs(config.fallback_reload_seconds.max(1)),
        }
    }
}

/// Run the cache staleness monitor while auto-refresh is enabled.
///
/// While enabled, polls every `poll_interval` (first poll immediately), forces
/// a reload once `fallback_reload` elapses, and publishes the time left until
/// that fallback once per second. Disabling auto-refresh stops the monitor and
/// drops all timers; re-enabling starts them fresh. Returns after a reload, or
/// when the enable channel closes.
pub async fn run_cache_refresh(
    monitor: Arc<CacheStalenessMonitor>,
    settings: RefreshSettings,
    mut enabled: watch::Receiver<bool>,
    countdown: watch::Sender<Option<Duration>>,
) {
    if !settings.realtime {
        tracing::info!("Mission is not real-time, cache refresh disabled");
        return;
    }

    tracing::info!(
        poll_secs = settings.poll_interval.as_secs(),
        fallback_secs = settings.fallback_reload.as_secs(),
        "Starting cache refresh scheduler"
    );

    loop {
        while !*enabled.borrow_and_update() {
            monitor.stop();
            countdown.send_replace(None);
            if enabled.changed().await.is_err() {
                return;
            }
        }

        if !monitor.start() {
            return;
        }

        let deadline = Instant::now() + settings.fallback_reload;
        let fallback = sleep_until(deadline);
        tokio::pin!(fallback);

        let mut poller = interval(settings.poll_interval);
        poller.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut clock = interval(Duration::from_secs(1));
        clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = poller.tick() => {
                    if let TickOutcome::Stale(_) = monitor.tick().await {
                        countdown.send_replace(None);
                        return;
                    }
                }
                () = &mut fallback => {
                    tracing::info!("Fallback refresh interval elapsed, reloading");
                    monitor.force_reload("periodic refresh");
                    countdown.send_replace(None);
                    return;
                }
                _ = clock.tick() => {
                    countdown.send_replace(Some(deadline.saturating_duration_since(Instant::now())));
                }
                changed = enabled.changed() => {
                    if changed.is_err() {
                        monitor.stop();
                        return;
                    }
                    if !*enabled.borrow() {
                        break;
                    }
                }
            }
        }
    }
}
