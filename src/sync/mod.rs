pub mod scheduler;
pub mod staleness;

pub use staleness::{CacheStalenessMonitor, MonitorState, SnapshotStore, TickOutcome};
