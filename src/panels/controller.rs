use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::category::{Category, CategoryState};
use crate::collaborators::PanelView;
use crate::common::CategoryStates;
use crate::panels::commands::PanelCommand;
use crate::panels::loader::{LoadOutcome, Loader};

/// Panel selection and loader dispatch.
///
/// The registry is filled during initialization and never changes afterwards;
/// the controller is shared behind an `Arc` once built.
pub struct SensorPanelController {
    loaders: HashMap<Category, Loader>,
    aliases: HashMap<Category, Category>,
    active: Mutex<Option<Category>>,
    view: Arc<dyn PanelView>,
    states: Arc<CategoryStates>,
}

impl SensorPanelController {
    pub fn new(view: Arc<dyn PanelView>, states: Arc<CategoryStates>) -> Self {
        Self {
            loaders: HashMap::new(),
            aliases: HashMap::from([(Category::Navigation, Category::Telemetry)]),
            active: Mutex::new(None),
            view,
            states,
        }
    }

    pub fn register(&mut self, category: Category, loader: Loader) {
        self.loaders.insert(category, loader);
    }

    /// Make a panel load another category's data.
    pub fn alias(&mut self, panel: Category, data: Category) {
        self.aliases.insert(panel, data);
    }

    /// Category whose data backs the panel.
    #[must_use]
    pub fn resolve(&self, category: Category) -> Category {
        self.aliases.get(&category).copied().unwrap_or(category)
    }

    #[must_use]
    pub fn get_loader(&self, category: Category) -> Option<Loader> {
        self.loaders.get(&self.resolve(category)).cloned()
    }

    #[must_use]
    pub fn active(&self) -> Option<Category> {
        *self.active.lock()
    }

    /// Show only this panel, then run its loader.
    ///
    /// Returns `None` when nothing is registered for the panel.
    pub async fn activate(&self, category: Category) -> Option<LoadOutcome> {
        for other in Category::ALL.into_iter().filter(|c| *c != category) {
            self.view.hide(other);
        }
        self.view.show(category);
        *self.active.lock() = Some(category);

        tracing::debug!(
            panel = %category,
            data = %self.resolve(category),
            "Panel activated"
        );

        let loader = self.get_loader(category)?;
        Some(loader().await)
    }

    /// Apply a control change and reload the owning category when needed.
    ///
    /// A single range bound does not reload until the range is complete, but
    /// clearing a bound of an active range falls back to the rolling window and does.
    pub async fn dispatch(&self, command: PanelCommand) -> Option<LoadOutcome> {
        let category = self.resolve(command.category());

        let reload = match command {
            PanelCommand::Activate(panel) => return self.activate(panel).await,
            PanelCommand::SetHoursBack { hours, .. } => {
                self.states.update(category, |s| s.set_hours_back(hours));
                true
            }
            PanelCommand::SetGranularity { minutes, .. } => {
                self.states
                    .update(category, |s| s.granularity_minutes = minutes);
                true
            }
            PanelCommand::SetRangeStart { start, .. } => {
                self.update_range(category, |s| s.set_range_start(start))
            }
            PanelCommand::SetRangeEnd { end, .. } => {
                self.update_range(category, |s| s.set_range_end(end))
            }
            PanelCommand::ClearRange(_) => {
                self.states.update(category, |s| s.clear_range());
                true
            }
            PanelCommand::SetDataSource {
                source, local_path, ..
            } => {
                self.states
                    .update(category, |s| s.set_source(source, local_path));
                true
            }
            PanelCommand::Refresh(_) => {
                self.states.request_refresh(category);
                true
            }
        };

        if !reload {
            return None;
        }
        let loader = self.get_loader(category)?;
        Some(loader().await)
    }

    /// Apply a range bound change and report whether the active window moved.
    ///
    /// Completing a range, editing an active one and clearing a bound of an
    /// active one all count; a lone bound on a rolling window does not.
    fn update_range<F>(&self, category: Category, f: F) -> bool
    where
        F: FnOnce(&mut CategoryState),
    {
        let mut before = None;
        let after = self.states.update(category, |s| {
            before = s.range();
            f(s);
        });
        before != after.range()
    }

    /// Categories with a registered loader.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.loaders.keys().copied().collect();
        categories.sort();
        categories
    }
}
