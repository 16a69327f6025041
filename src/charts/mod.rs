pub mod backend;
pub mod datasets;
pub mod lifecycle;
pub mod sparkline;
pub mod specs;
pub mod theme;

pub use backend::{ChartBackend, ChartHandle, LoggingBackend};
pub use lifecycle::{ChartLifecycleManager, RenderOutcome};
pub use sparkline::MiniTrendRenderer;
pub use theme::ThemeBus;
