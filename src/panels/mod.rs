pub mod commands;
pub mod controller;
pub mod loader;

pub use commands::PanelCommand;
pub use controller::SensorPanelController;
pub use loader::{CategoryLoader, LoadOutcome, Loader};
