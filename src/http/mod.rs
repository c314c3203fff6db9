//! HTTP client layer — `MarketDataHttp` with rate-limit-aware retry.

pub mod client;
pub mod retry;

pub use client::MarketDataHttp;
pub use retry::{RetryConfig, RetryPolicy};

use std::time::Duration;

/// Runtime-agnostic sleep used for retry backoff and the refresh interval.
///
/// Browsers get a `setTimeout`-backed timer; `futures-timer` needs a helper
/// thread that wasm32 cannot spawn.
pub(crate) async fn sleep(duration: Duration) {
    #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
    futures_timer::Delay::new(duration).await;
}
