//! What the render target consumes after each refresh cycle.

use crate::domain::calendar::CalendarView;
use crate::domain::instrument::Instrument;
use crate::domain::price_history::CurrentPrice;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// Everything one successful cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub instrument: Instrument,
    pub current: CurrentPrice,
    pub week: CalendarView,
    pub year: CalendarView,
    pub last_updated: DateTime<Utc>,
}

impl DashboardSnapshot {
    /// `Last updated: 2025-01-15 09:30:00` in local time.
    pub fn last_updated_label(&self) -> String {
        format!(
            "Last updated: {}",
            self.last_updated
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Latest published state of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardState {
    /// Before the first cycle completes, or right after an instrument switch.
    #[default]
    Loading,
    Ready(Box<DashboardSnapshot>),
    /// The last cycle failed. Replaces whatever was shown before.
    Failed { message: String },
}

impl DashboardState {
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            DashboardState::Ready(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardState::Loading)
    }
}
