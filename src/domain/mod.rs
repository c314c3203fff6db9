//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching provider responses
//! - `convert.rs` — Conversions from provider shapes with validation
//! - `client.rs` — Sub-client with HTTP methods and caching

pub mod calendar;
pub mod instrument;
pub mod price_history;
