//! # price-calendar
//!
//! Core of a crypto price-calendar tracker: fetches daily price history for
//! a selected asset, caches the long window locally, and projects prices onto
//! week and year calendars where each day is classified as up, down or
//! neutral against the previous day.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Instruments, price series, calendar projection (always available, WASM-safe)
//! 2. **Storage** — `KeyValueStore` backends and the TTL'd `WindowedCache`
//! 3. **HTTP API** — `MarketDataHttp` with a rate-limit-aware retry policy
//! 4. **High-Level Client** — `TrackerClient` with nested sub-clients
//! 5. **Refresh** — `RefreshScheduler` publishing `DashboardState`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use price_calendar::prelude::*;
//!
//! let client = TrackerClient::builder()
//!     .provider(Provider::CoinGecko)
//!     .store(Arc::new(FileStore::new(".price-calendar")))
//!     .build()?;
//!
//! let scheduler = RefreshScheduler::new(client, RefreshConfig::default());
//! scheduler.refresh().await;
//! if let DashboardState::Ready(snapshot) = scheduler.state().await {
//!     println!("{} up days this year", snapshot.year.up_days);
//! }
//! ```

#[cfg(all(target_arch = "wasm32", feature = "http", not(feature = "wasm")))]
compile_error!("wasm32 builds need the `wasm` feature for browser timers and storage");

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, clock and formatting helpers.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, sub-clients.
pub mod domain;

/// Unified error types.
pub mod error;

/// Provider URL constants.
pub mod network;

// ── Layer 2: Storage ─────────────────────────────────────────────────────────

/// Key-value persistence and the windowed history cache.
pub mod storage;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `TrackerClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 5: Refresh ─────────────────────────────────────────────────────────

/// Periodic and on-demand refresh cycles.
#[cfg(feature = "http")]
pub mod refresh;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Clock, InstrumentId, ManualClock, SystemClock, Window};

    // Domain types
    pub use crate::domain::calendar::{CalendarCell, CalendarProjector, CalendarView, Direction};
    pub use crate::domain::instrument::{Instrument, InstrumentRegistry};
    pub use crate::domain::price_history::{CurrentPrice, PricePoint, PriceSeries, Provider};

    // Errors
    pub use crate::error::{HttpError, MalformedDataError, StorageError, TrackerError};

    // Storage
    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::storage::FileStore;
    #[cfg(feature = "wasm")]
    pub use crate::storage::LocalStorage;
    pub use crate::storage::{KeyValueStore, MemoryStore, WindowedCache};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{InstrumentsClient, PricesClient, TrackerClient, TrackerClientBuilder};
    #[cfg(feature = "http")]
    pub use crate::http::{RetryConfig, RetryPolicy};

    // Refresh
    #[cfg(feature = "http")]
    pub use crate::refresh::{
        DashboardSnapshot, DashboardState, RefreshConfig, RefreshOutcome, RefreshScheduler,
    };
}
