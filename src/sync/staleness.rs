//! Detecting that the server's cached sensor data moved on.
//!
//! The server publishes one cache timestamp per report type. The monitor keeps
//! the last snapshot it saw and compares each new poll against it:
//!
//! | Category in | Meaning |
//! |-------------|---------|
//! | old and new, new timestamp later | stale, hard reload |
//! | old and new, timestamp same or earlier | unchanged |
//! | new only | first observation, recorded |
//!
//! Detection is per category but the reaction is a full reload of the
//! dashboard, after which the monitor is terminal.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::api::MissionApiClient;
use crate::api::models::CacheStatusResponse;
use crate::collaborators::PageReloader;
use crate::error::FetchError;

/// Report type to cache timestamps, as last observed.
pub type CacheSnapshot = CacheStatusResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Polling,
    StaleDetected,
    /// Terminal.
    Reloading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Monitor not polling; nothing fetched.
    Inactive,
    Unchanged,
    /// Reload triggered by these categories.
    Stale(Vec<String>),
    /// Poll failed; the error was logged and swallowed.
    Failed,
}

/// Categories present in both snapshots whose cache timestamp strictly advanced.
#[must_use]
pub fn advanced_categories(old: &CacheSnapshot, new: &CacheSnapshot) -> Vec<String> {
    let mut advanced: Vec<String> = new
        .iter()
        .filter_map(|(category, entry)| {
            let previous = old.get(category)?.cache_timestamp?;
            let current = entry.cache_timestamp?;
            (current > previous).then(|| category.clone())
        })
        .collect();
    advanced.sort();
    advanced
}

/// The single retained snapshot.
#[derive(Default)]
pub struct SnapshotStore {
    current: Mutex<CacheSnapshot>,
}

impl SnapshotStore {
    /// Compare against the held snapshot and swap the new one in, under one lock.
    pub fn observe(&self, new: CacheSnapshot) -> Vec<String> {
        let mut current = self.current.lock();
        let advanced = advanced_categories(&current, &new);
        for category in new.keys().filter(|c| !current.contains_key(*c)) {
            tracing::debug!(category = %category, "First cache observation");
        }
        *current = new;
        advanced
    }

    #[must_use]
    pub fn current(&self) -> CacheSnapshot {
        self.current.lock().clone()
    }
}

/// Where snapshots come from.
pub trait CacheStatusSource: Send + Sync {
    fn fetch_snapshot(&self) -> BoxFuture<'_, Result<CacheSnapshot, FetchError>>;
}

impl CacheStatusSource for MissionApiClient {
    fn fetch_snapshot(&self) -> BoxFuture<'_, Result<CacheSnapshot, FetchError>> {
        Box::pin(self.get_cache_status())
    }
}

pub struct CacheStalenessMonitor {
    source: Arc<dyn CacheStatusSource>,
    snapshots: Arc<SnapshotStore>,
    reloader: Arc<dyn PageReloader>,
    state: Mutex<MonitorState>,
}

impl CacheStalenessMonitor {
    pub fn new(
        source: Arc<dyn CacheStatusSource>,
        snapshots: Arc<SnapshotStore>,
        reloader: Arc<dyn PageReloader>,
    ) -> Self {
        Self {
            source,
            snapshots,
            reloader,
            state: Mutex::new(MonitorState::Stopped),
        }
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        *self.state.lock()
    }

    /// `Stopped -> Polling`. Returns false once the monitor has reloaded.
    pub fn start(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            MonitorState::Stopped => {
                *state = MonitorState::Polling;
                tracing::info!("Cache staleness polling started");
                true
            }
            MonitorState::Polling => true,
            MonitorState::StaleDetected | MonitorState::Reloading => false,
        }
    }

    /// `Polling -> Stopped`. No effect once stale.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if *state == MonitorState::Polling {
            *state = MonitorState::Stopped;
            tracing::info!("Cache staleness polling stopped");
        }
    }

    /// Fetch one snapshot and react to it.
    pub async fn tick(&self) -> TickOutcome {
        if self.state() != MonitorState::Polling {
            return TickOutcome::Inactive;
        }

        let snapshot = match self.source.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Cache status poll failed");
                return TickOutcome::Failed;
            }
        };

        // Stopped while the request was in flight
        if self.state() != MonitorState::Polling {
            return TickOutcome::Inactive;
        }

        let advanced = self.snapshots.observe(snapshot);
        if advanced.is_empty() {
            tracing::debug!("Cache unchanged");
            return TickOutcome::Unchanged;
        }

        {
            let mut state = self.state.lock();
            if *state != MonitorState::Polling {
                return TickOutcome::Inactive;
            }
            *state = MonitorState::StaleDetected;
        }
        tracing::info!(categories = ?advanced, "Server cache advanced, reloading");
        self.reload(&format!("cache updated: {}", advanced.join(", ")));
        TickOutcome::Stale(advanced)
    }

    /// Hard reload regardless of staleness. Returns false if already reloading.
    pub fn force_reload(&self, reason: &str) -> bool {
        self.reload(reason)
    }

    fn reload(&self, reason: &str) -> bool {
        {
            let mut state = self.state.lock();
            if *state == MonitorState::Reloading {
                return false;
            }
            *state = MonitorState::Reloading;
        }
        self.reloader.hard_reload(reason);
        true
    }
}
