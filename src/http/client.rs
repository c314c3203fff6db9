//! Low-level HTTP client — `MarketDataHttp`.
//!
//! One method per upstream endpoint. Returns raw JSON values; normalization to
//! domain types happens in `domain::price_history::convert`.

use crate::error::HttpError;
use crate::http::retry::RetryPolicy;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Low-level HTTP client for a market-data REST API.
pub struct MarketDataHttp {
    base_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl MarketDataHttp {
    pub fn new(base_url: &str) -> Self {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(4);
        }

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build().expect("Failed to build HTTP client"),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy used by every endpoint method.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── CoinGecko ────────────────────────────────────────────────────────

    pub async fn get_market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<serde_json::Value, HttpError> {
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}&interval=daily",
            self.base_url,
            urlencoding::encode(coin_id),
            urlencoding::encode(vs_currency),
            days
        );
        self.fetch_json(&url).await
    }

    pub async fn get_simple_price(
        &self,
        coin_id: &str,
        vs_currency: &str,
    ) -> Result<serde_json::Value, HttpError> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}&include_24hr_change=true",
            self.base_url,
            urlencoding::encode(coin_id),
            urlencoding::encode(vs_currency)
        );
        self.fetch_json(&url).await
    }

    // ── Binance ──────────────────────────────────────────────────────────

    pub async fn get_daily_klines(
        &self,
        symbol: &str,
        limit: u32,
    ) -> Result<serde_json::Value, HttpError> {
        let url = format!(
            "{}/klines?symbol={}&interval=1d&limit={}",
            self.base_url,
            urlencoding::encode(symbol),
            limit
        );
        self.fetch_json(&url).await
    }

    pub async fn get_ticker_24h(&self, symbol: &str) -> Result<serde_json::Value, HttpError> {
        let url = format!(
            "{}/ticker/24hr?symbol={}",
            self.base_url,
            urlencoding::encode(symbol)
        );
        self.fetch_json(&url).await
    }

    // ── Generic ──────────────────────────────────────────────────────────

    /// GET `url` and decode the body as JSON, retrying per the client's policy.
    pub async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, HttpError> {
        self.get(url, &self.retry).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: &RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match retry.config() {
            Some(c) => c,
            None => return self.do_request(url).await,
        };

        let mut last_error = None;

        for attempt in 0..config.max_attempts() {
            match self.do_request::<T>(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if !is_retryable(&e) {
                        return Err(e);
                    }

                    if attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Retrying request to {}",
                            url
                        );
                        crate::http::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        let attempts = config.max_attempts();
        Err(match last_error {
            Some(HttpError::RateLimited { .. }) => HttpError::RateLimited { attempts },
            Some(e) => HttpError::MaxRetriesExceeded {
                attempts,
                last_error: e.to_string(),
            },
            None => HttpError::MaxRetriesExceeded {
                attempts,
                last_error: "unknown".to_string(),
            },
        })
    }

    async fn do_request<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        if status_code == 429 {
            return Err(HttpError::RateLimited { attempts: 1 });
        }

        let body = resp.text().await.unwrap_or_default();
        Err(HttpError::Status {
            status: status_code,
            body,
        })
    }
}

/// 429 and transport-level failures are transient; any other status is final.
fn is_retryable(error: &HttpError) -> bool {
    match error {
        HttpError::RateLimited { .. } => true,
        HttpError::Reqwest(re) => {
            #[cfg(not(target_arch = "wasm32"))]
            let retryable = re.is_connect() || re.is_timeout() || re.is_request();
            #[cfg(target_arch = "wasm32")]
            let retryable = re.is_timeout() || re.is_request();
            retryable
        }
        _ => false,
    }
}

impl Clone for MarketDataHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            retry: self.retry.clone(),
        }
    }
}
