use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::category::{Category, CategoryState};
use crate::config::Config;
use crate::preferences::{AutoRefresh, PreferenceStore};
use crate::sync::SnapshotStore;

/// Window/source state of every category, mutated only by user commands.
pub struct CategoryStates {
    config: Arc<Config>,
    states: Mutex<HashMap<Category, CategoryState>>,
    pending_refresh: Mutex<HashSet<Category>>,
}

impl CategoryStates {
    pub fn new(config: Arc<Config>) -> Self {
        let states = Category::ALL
            .into_iter()
            .map(|c| (c, CategoryState::from_defaults(c, &config)))
            .collect();
        Self {
            config,
            states: Mutex::new(states),
            pending_refresh: Mutex::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn get(&self, category: Category) -> CategoryState {
        self.states
            .lock()
            .entry(category)
            .or_insert_with(|| CategoryState::from_defaults(category, &self.config))
            .clone()
    }

    /// Apply `f` to the category's state and return the result.
    pub fn update<F>(&self, category: Category, f: F) -> CategoryState
    where
        F: FnOnce(&mut CategoryState),
    {
        let mut states = self.states.lock();
        let state = states
            .entry(category)
            .or_insert_with(|| CategoryState::from_defaults(category, &self.config));
        f(state);
        state.clone()
    }

    /// Make the next load of this category bypass the server cache.
    pub fn request_refresh(&self, category: Category) {
        self.pending_refresh.lock().insert(category);
    }

    /// Consume a pending refresh request.
    pub fn take_refresh(&self, category: Category) -> bool {
        self.pending_refresh.lock().remove(&category)
    }
}

/// Process-wide state containers, owned by the dashboard and handed out by reference.
#[derive(Clone)]
pub struct DashboardState {
    pub config: Arc<Config>,
    pub categories: Arc<CategoryStates>,
    pub cache_snapshot: Arc<SnapshotStore>,
    pub auto_refresh: Arc<AutoRefresh>,
}

impl DashboardState {
    pub fn new(config: Config, preferences: Arc<dyn PreferenceStore>) -> Self {
        let config = Arc::new(config);
        Self {
            categories: Arc::new(CategoryStates::new(Arc::clone(&config))),
            cache_snapshot: Arc::new(SnapshotStore::default()),
            auto_refresh: Arc::new(AutoRefresh::load(preferences)),
            config,
        }
    }
}
