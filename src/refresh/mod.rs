//! Refresh scheduling — periodic and on-demand refresh cycles.
//!
//! A cycle fetches the current price, the week series and the year series
//! (through the cache) concurrently, projects both calendars and publishes a
//! `DashboardState`. Two rules keep overlapping cycles from clobbering each
//! other:
//!
//! - a timer-driven cycle is skipped while any other cycle is in flight;
//! - every instrument switch bumps a generation counter, and a cycle whose
//!   generation is stale when it finishes is discarded instead of published.

pub mod state;

pub use state::{DashboardSnapshot, DashboardState};

use crate::client::TrackerClient;
use crate::domain::calendar::CalendarProjector;
use crate::domain::instrument::Instrument;
use crate::error::TrackerError;

use async_lock::RwLock;
use futures_util::stream::Stream;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Refresh period of the retry-enabled tracker.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Refresh period of the simple tracker without caching.
pub const SIMPLE_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the refresh scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl RefreshConfig {
    pub fn simple() -> Self {
        Self {
            interval: SIMPLE_REFRESH_INTERVAL,
        }
    }
}

/// How a refresh cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was published.
    Rendered { generation: u64 },
    /// The cycle failed; the state now holds the user-facing message.
    Failed { generation: u64, message: String },
    /// The selection changed while the cycle was running; its result was dropped.
    Superseded { generation: u64 },
    /// Another cycle was already running.
    Skipped,
}

/// Drives refresh cycles for one `TrackerClient`.
#[derive(Clone)]
pub struct RefreshScheduler {
    client: TrackerClient,
    config: RefreshConfig,
    state: Arc<RwLock<DashboardState>>,
    in_flight: Arc<AtomicUsize>,
    generation: Arc<AtomicU64>,
}

impl RefreshScheduler {
    pub fn new(client: TrackerClient, config: RefreshConfig) -> Self {
        Self {
            client,
            config,
            state: Arc::new(RwLock::new(DashboardState::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn client(&self) -> &TrackerClient {
        &self.client
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Latest published state.
    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Current selection generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// One timer-style cycle: skipped if any cycle is already in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        match InFlightGuard::try_enter(&self.in_flight) {
            Some(guard) => self.run_cycle(guard).await,
            None => {
                tracing::debug!("Refresh already in flight, skipping tick");
                RefreshOutcome::Skipped
            }
        }
    }

    /// Switch the tracked instrument and refresh immediately, superseding any
    /// cycle still running for the previous selection.
    pub async fn select_instrument(&self, id: &str) -> Result<RefreshOutcome, TrackerError> {
        let instrument = self.client.instruments().select(id).await?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.write().await = DashboardState::Loading;
        tracing::info!(instrument = %instrument.id, generation, "Switched instrument");

        let guard = InFlightGuard::enter(&self.in_flight);
        Ok(self.run_cycle(guard).await)
    }

    /// Refresh once now, then once per interval, forever.
    ///
    /// Ticks that find a cycle in flight yield `Skipped`.
    pub fn run(&self) -> impl Stream<Item = RefreshOutcome> + '_ {
        async_stream::stream! {
            loop {
                yield self.refresh().await;
                crate::http::sleep(self.config.interval).await;
            }
        }
    }

    async fn run_cycle(&self, _guard: InFlightGuard) -> RefreshOutcome {
        let generation = self.generation();
        let instrument = self.client.instruments().selected().await;

        let result = self.load(&instrument).await;

        // Generation is compared and state published under one write lock.
        let mut state = self.state.write().await;
        if self.generation() != generation {
            tracing::debug!(
                instrument = %instrument.id,
                generation,
                current = self.generation(),
                "Discarding result for superseded selection"
            );
            return RefreshOutcome::Superseded { generation };
        }

        match result {
            Ok(snapshot) => {
                *state = DashboardState::Ready(Box::new(snapshot));
                RefreshOutcome::Rendered { generation }
            }
            Err(e) => {
                tracing::warn!(
                    instrument = %instrument.id,
                    kind = e.kind(),
                    error = %e,
                    "Refresh cycle failed"
                );
                let message = e.user_message().to_string();
                *state = DashboardState::Failed {
                    message: message.clone(),
                };
                RefreshOutcome::Failed {
                    generation,
                    message,
                }
            }
        }
    }

    async fn load(&self, instrument: &Instrument) -> Result<DashboardSnapshot, TrackerError> {
        let prices = self.client.prices();
        let (current, week, year) = futures_util::future::try_join3(
            prices.current(instrument),
            prices.week(instrument),
            prices.year(instrument),
        )
        .await?;

        let projector = CalendarProjector::local(self.client.clock());
        Ok(DashboardSnapshot {
            instrument: instrument.clone(),
            current,
            week: projector.project_week(&week),
            year: projector.project_year(&year),
            last_updated: self.client.clock().now(),
        })
    }
}

/// Counts a running cycle for as long as it lives.
struct InFlightGuard {
    counter: Arc<AtomicUsize>,
}

impl InFlightGuard {
    /// Enter only if nothing else is running.
    fn try_enter(counter: &Arc<AtomicUsize>) -> Option<Self> {
        counter
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self {
                counter: counter.clone(),
            })
    }

    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: counter.clone(),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
