use chrono::{DateTime, Utc};

use crate::category::{Category, DataSource};

/// A UI control change, tagged with the category the control belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    Activate(Category),
    SetHoursBack {
        category: Category,
        hours: u32,
    },
    SetGranularity {
        category: Category,
        minutes: u32,
    },
    SetRangeStart {
        category: Category,
        start: Option<DateTime<Utc>>,
    },
    SetRangeEnd {
        category: Category,
        end: Option<DateTime<Utc>>,
    },
    ClearRange(Category),
    SetDataSource {
        category: Category,
        source: DataSource,
        local_path: Option<String>,
    },
    /// Manual refresh button: reload bypassing the server cache.
    Refresh(Category),
}

impl PanelCommand {
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::Activate(c) | Self::ClearRange(c) | Self::Refresh(c) => *c,
            Self::SetHoursBack { category, .. }
            | Self::SetGranularity { category, .. }
            | Self::SetRangeStart { category, .. }
            | Self::SetRangeEnd { category, .. }
            | Self::SetDataSource { category, .. } => *category,
        }
    }
}
