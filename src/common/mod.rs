pub mod state;

pub use state::{CategoryStates, DashboardState};
