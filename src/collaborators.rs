//! Interfaces the host page provides to the dashboard core.

use std::sync::Arc;

use crate::category::Category;

/// Session gate.
pub trait AuthGate: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// End the session and send the user to sign-in.
    fn force_sign_out(&self);
}

/// Non-blocking user notifications.
pub trait Notifier: Send + Sync {
    /// Dismissible toast for transient failures.
    fn toast(&self, message: &str);

    /// Inline message next to the category's window inputs.
    fn inline_validation(&self, category: Category, message: &str);
}

/// Per-chart loading spinner.
pub trait LoadingIndicator: Send + Sync {
    fn set_loading(&self, canvas_id: &str, loading: bool);
}

/// Detail panel visibility.
pub trait PanelView: Send + Sync {
    fn show(&self, category: Category);
    fn hide(&self, category: Category);
}

/// Full page resynchronization, bypassing any local response cache.
pub trait PageReloader: Send + Sync {
    fn hard_reload(&self, reason: &str);
}

/// Keeps a canvas spinner on for as long as the guard lives.
pub struct SpinnerGuard {
    indicator: Arc<dyn LoadingIndicator>,
    canvas_ids: Vec<String>,
}

impl SpinnerGuard {
    pub fn start(indicator: Arc<dyn LoadingIndicator>, canvas_ids: &[&str]) -> Self {
        for id in canvas_ids {
            indicator.set_loading(id, true);
        }
        Self {
            indicator,
            canvas_ids: canvas_ids.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        for id in &self.canvas_ids {
            self.indicator.set_loading(id, false);
        }
    }
}

/// Host-less implementations that only log. Used by the headless runner.
pub mod logging {
    use super::{AuthGate, Category, LoadingIndicator, Notifier, PanelView};

    pub struct AlwaysAuthenticated;

    impl AuthGate for AlwaysAuthenticated {
        fn is_authenticated(&self) -> bool {
            true
        }

        fn force_sign_out(&self) {
            tracing::warn!("Session rejected by server, signing out");
        }
    }

    pub struct LogNotifier;

    impl Notifier for LogNotifier {
        fn toast(&self, message: &str) {
            tracing::warn!(message, "Notification");
        }

        fn inline_validation(&self, category: Category, message: &str) {
            tracing::warn!(category = %category, message, "Invalid window input");
        }
    }

    pub struct NoSpinner;

    impl LoadingIndicator for NoSpinner {
        fn set_loading(&self, canvas_id: &str, loading: bool) {
            tracing::trace!(canvas_id, loading, "Spinner");
        }
    }

    pub struct LogPanelView;

    impl PanelView for LogPanelView {
        fn show(&self, category: Category) {
            tracing::debug!(category = %category, "Panel shown");
        }

        fn hide(&self, _category: Category) {}
    }
}
