//! High-level client — `TrackerClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared state, and accessor methods.

use crate::domain::instrument::client::Instruments;
use crate::domain::instrument::{Instrument, InstrumentRegistry, SelectionRepository};
use crate::domain::price_history::client::Prices;
use crate::domain::price_history::Provider;
use crate::error::TrackerError;
use crate::http::{MarketDataHttp, RetryPolicy};
use crate::shared::{Clock, SystemClock};
use crate::storage::cache::CACHE_TTL;
use crate::storage::{KeyValueStore, MemoryStore, WindowedCache};

use async_lock::RwLock;
use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::instrument::client::Instruments as InstrumentsClient;
pub use crate::domain::price_history::client::Prices as PricesClient;

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "PRICE_CALENDAR_API_URL";
/// Environment variable selecting the provider (`coingecko` | `binance`).
pub const ENV_PROVIDER: &str = "PRICE_CALENDAR_PROVIDER";
/// Environment variable overriding the quote currency.
pub const ENV_VS_CURRENCY: &str = "PRICE_CALENDAR_VS_CURRENCY";

/// The primary entry point: explicit application state for one tracker.
///
/// Cheap to clone; clones share the cache, the store and the selection.
pub struct TrackerClient {
    pub(crate) http: MarketDataHttp,
    pub(crate) provider: Provider,
    pub(crate) vs_currency: String,
    pub(crate) cache: WindowedCache,
    pub(crate) selection: SelectionRepository,
    pub(crate) registry: Arc<InstrumentRegistry>,
    /// Currently tracked instrument.
    pub(crate) selected: Arc<RwLock<Instrument>>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl TrackerClient {
    pub fn builder() -> TrackerClientBuilder {
        TrackerClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn prices(&self) -> Prices<'_> {
        Prices { client: self }
    }

    pub fn instruments(&self) -> Instruments<'_> {
        Instruments { client: self }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn vs_currency(&self) -> &str {
        &self.vs_currency
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl Clone for TrackerClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            provider: self.provider,
            vs_currency: self.vs_currency.clone(),
            cache: self.cache.clone(),
            selection: self.selection.clone(),
            registry: self.registry.clone(),
            selected: self.selected.clone(),
            clock: self.clock.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct TrackerClientBuilder {
    base_url: Option<String>,
    provider: Provider,
    vs_currency: String,
    cache_ttl: Duration,
    retry: RetryPolicy,
    store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    instruments: Option<Vec<Instrument>>,
    default_instrument: Option<String>,
}

impl Default for TrackerClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            provider: Provider::default(),
            vs_currency: crate::network::DEFAULT_VS_CURRENCY.to_string(),
            cache_ttl: CACHE_TTL,
            retry: RetryPolicy::default(),
            store: None,
            clock: None,
            instruments: None,
            default_instrument: None,
        }
    }
}

impl TrackerClientBuilder {
    /// Builder seeded from `PRICE_CALENDAR_*` environment variables.
    pub fn from_env() -> Result<Self, TrackerError> {
        let mut builder = Self::default();
        if let Ok(provider) = std::env::var(ENV_PROVIDER) {
            builder.provider = provider.parse().map_err(TrackerError::Config)?;
        }
        if let Ok(url) = std::env::var(ENV_API_URL) {
            builder.base_url = Some(url);
        }
        if let Ok(vs) = std::env::var(ENV_VS_CURRENCY) {
            builder.vs_currency = vs;
        }
        Ok(builder)
    }

    /// Defaults to the provider's public API.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn vs_currency(mut self, vs_currency: &str) -> Self {
        self.vs_currency = vs_currency.to_string();
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Backing store for the history cache and the instrument selection.
    /// Defaults to an in-memory store.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn instruments(mut self, instruments: Vec<Instrument>) -> Self {
        self.instruments = Some(instruments);
        self
    }

    /// Instrument tracked when no selection has been persisted yet.
    pub fn default_instrument(mut self, id: &str) -> Self {
        self.default_instrument = Some(id.to_string());
        self
    }

    pub fn build(self) -> Result<TrackerClient, TrackerError> {
        let registry = match self.instruments {
            Some(list) => InstrumentRegistry::new(list)
                .ok_or_else(|| TrackerError::Config("instrument list is empty".to_string()))?,
            None => InstrumentRegistry::default(),
        };

        let vs_currency = self.vs_currency.trim().to_ascii_lowercase();
        if vs_currency.is_empty() {
            return Err(TrackerError::Config("vs_currency is empty".to_string()));
        }

        let fallback = match &self.default_instrument {
            Some(id) => registry
                .get(id)
                .ok_or_else(|| TrackerError::UnknownInstrument(id.clone()))?,
            None => registry.first(),
        };

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>);
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        let selection = SelectionRepository::new(store.clone());
        let selected = selection
            .load(&registry)
            .unwrap_or_else(|| fallback.clone());

        let base_url = self
            .base_url
            .unwrap_or_else(|| self.provider.default_base_url().to_string());

        Ok(TrackerClient {
            http: MarketDataHttp::new(&base_url).with_retry(self.retry),
            provider: self.provider,
            vs_currency,
            cache: WindowedCache::new(store)
                .with_clock(clock.clone())
                .with_ttl(self.cache_ttl),
            selection,
            registry: Arc::new(registry),
            selected: Arc::new(RwLock::new(selected)),
            clock,
        })
    }
}
