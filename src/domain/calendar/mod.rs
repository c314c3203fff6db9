//! Calendar domain — dated cells with day-over-day classification.
//!
//! Cells are derived data: recomputed from a `PriceSeries` on every pass and
//! never persisted.

pub mod projector;

use crate::shared::fmt;
use crate::shared::Window;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use projector::CalendarProjector;

/// Day-over-day movement of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    /// No previous point inside the window, or a padding cell. Not a flat day.
    Neutral,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One day in a calendar grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// `None` for leading padding cells.
    pub price: Option<Decimal>,
    pub direction: Direction,
    /// Percent change from the previous in-window day.
    pub change_percent: Option<Decimal>,
    pub is_today: bool,
}

impl CalendarCell {
    pub(crate) fn padding(date: NaiveDate) -> Self {
        Self {
            date,
            price: None,
            direction: Direction::Neutral,
            change_percent: None,
            is_today: false,
        }
    }

    pub fn is_padding(&self) -> bool {
        self.price.is_none()
    }

    /// Short weekday name, e.g. `Wed`.
    pub fn day_name(&self) -> String {
        self.date.format("%a").to_string()
    }

    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    /// Corner label for year-grid cells, e.g. `42.5K`.
    pub fn compact_label(&self) -> Option<String> {
        self.price.as_ref().map(fmt::format_compact_price)
    }

    /// Formatted change, `--` when there is none.
    pub fn change_label(&self) -> String {
        self.change_percent
            .as_ref()
            .map(fmt::format_change_percent)
            .unwrap_or_else(|| "--".to_string())
    }

    /// Hover text: `Wed, Jan 15, 2025: $42,000.00 (+1.23%)`.
    pub fn tooltip(&self) -> Option<String> {
        let price = self.price.as_ref()?;
        let change = self
            .change_percent
            .as_ref()
            .map(fmt::format_change_percent)
            .unwrap_or_else(|| "N/A".to_string());
        Some(format!(
            "{}: {} ({})",
            self.date.format("%a, %b %-d, %Y"),
            fmt::format_price(price),
            change
        ))
    }
}

/// Projected grid for one window plus its up/down tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarView {
    pub window: Window,
    pub cells: Vec<CalendarCell>,
    /// Number of padding cells at the front of `cells`.
    pub leading_padding: usize,
    pub up_days: usize,
    pub down_days: usize,
}

impl CalendarView {
    /// Cells that carry a price.
    pub fn real_cells(&self) -> &[CalendarCell] {
        self.cells.get(self.leading_padding..).unwrap_or_default()
    }

    pub fn today(&self) -> Option<&CalendarCell> {
        self.real_cells().iter().find(|c| c.is_today)
    }
}
