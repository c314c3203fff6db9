//! Display formatting for prices and percentages.

pub mod decimal;
pub mod num;

pub use decimal::{format_change_percent, format_compact_price, format_price};
