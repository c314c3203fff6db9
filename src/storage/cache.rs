//! Time-boxed cache for the long-window (365-day) series.
//!
//! Entries are whole-value JSON blobs in a `KeyValueStore`, replaced on every
//! successful fetch and never edited in place. There is no eviction beyond the
//! TTL check: a stale entry just waits to be overwritten.

use super::KeyValueStore;
use crate::domain::price_history::PriceSeries;
use crate::error::{CacheReadError, StorageError};
use crate::shared::{Clock, InstrumentId, SystemClock, Window};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default freshness window: one hour.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

const KEY_PREFIX: &str = "price_calendar";

/// Storage key for an instrument's year-long history.
///
/// Only the year window is cached; the week is always fetched fresh because
/// it must include the current partial day.
pub fn history_key(instrument_id: &InstrumentId) -> String {
    format!(
        "{}:{}:history_{}",
        KEY_PREFIX,
        instrument_id,
        Window::Year.as_str()
    )
}

/// A cached series and when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub series: PriceSeries,
    /// Unix timestamp in milliseconds.
    pub fetched_at: i64,
}

/// TTL cache over a key-value store.
#[derive(Clone)]
pub struct WindowedCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl WindowedCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ttl: CACHE_TTL,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read an entry. Missing and unreadable entries both come back as `None`;
    /// a corrupt entry is logged, never returned as an error.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let raw = self.store.get(key)?;
        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                let err = CacheReadError {
                    key: key.to_string(),
                    reason: e.to_string(),
                };
                tracing::warn!(error = %err, "Ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Replace the entry for `key`, stamped with the current time.
    pub fn put(&self, key: &str, series: &PriceSeries) -> Result<(), StorageError> {
        let entry = CacheEntry {
            series: series.clone(),
            fetched_at: self.clock.now_ms(),
        };
        let raw = serde_json::to_string(&entry)?;
        self.store.set(key, &raw)
    }

    /// `now - fetched_at < ttl`.
    pub fn is_fresh(&self, entry: &CacheEntry) -> bool {
        let age_ms = self.clock.now_ms() - entry.fetched_at;
        age_ms < self.ttl.as_millis() as i64
    }

    /// The entry for `key` only if it is still fresh.
    pub fn get_fresh(&self, key: &str) -> Option<CacheEntry> {
        self.get(key).filter(|e| self.is_fresh(e))
    }

    /// Drop the entry for `key`.
    pub fn invalidate(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove(key)
    }
}

impl std::fmt::Debug for WindowedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowedCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
