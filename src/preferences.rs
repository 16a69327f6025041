//! Client-side persisted preferences.
//!
//! Only one value lives here today: whether the dashboard refreshes itself
//! when the server cache advances. It survives reloads of the dashboard.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::AppResult;

/// Storage key of the auto-refresh flag.
pub const AUTO_REFRESH_KEY: &str = "missionAutoRefreshEnabled";

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed preferences file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store for boolean preferences.
pub trait PreferenceStore: Send + Sync {
    fn get_bool(&self, key: &str) -> Option<bool>;

    /// # Errors
    ///
    /// Returns `PreferencesError` if the value cannot be persisted.
    fn set_bool(&self, key: &str, value: bool) -> Result<(), PreferencesError>;
}

/// JSON object on disk, rewritten on every change.
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: Mutex<HashMap<String, bool>>,
}

impl JsonFilePreferenceStore {
    /// Open the store, starting empty if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` if an existing file cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.lock().get(key).copied()
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PreferencesError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(&*values)?)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, bool>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.lock().get(key).copied()
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PreferencesError> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// The auto-refresh flag, persisted and observable.
pub struct AutoRefresh {
    store: Arc<dyn PreferenceStore>,
    tx: watch::Sender<bool>,
}

impl AutoRefresh {
    /// Load the persisted flag, enabled when never set.
    pub fn load(store: Arc<dyn PreferenceStore>) -> Self {
        let enabled = store.get_bool(AUTO_REFRESH_KEY).unwrap_or(true);
        let (tx, _) = watch::channel(enabled);
        Self { store, tx }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Persist and broadcast a new value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Preferences` if persisting fails. Subscribers still
    /// see the new value.
    pub fn set(&self, enabled: bool) -> AppResult<()> {
        self.tx.send_replace(enabled);
        tracing::info!(enabled, "Auto-refresh toggled");
        self.store.set_bool(AUTO_REFRESH_KEY, enabled)?;
        Ok(())
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
