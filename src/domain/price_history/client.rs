//! Prices sub-client — current snapshot, week and year history.

use super::{CurrentPrice, PriceSeries, Provider};
use crate::client::TrackerClient;
use crate::domain::instrument::Instrument;
use crate::error::{HttpError, TrackerError};
use crate::http::MarketDataHttp;
use crate::shared::Window;
use crate::storage::cache::history_key;

impl Provider {
    async fn fetch_history(
        &self,
        http: &MarketDataHttp,
        instrument: &Instrument,
        vs_currency: &str,
        window: Window,
    ) -> Result<serde_json::Value, HttpError> {
        let days = window.days() as u32;
        match self {
            // `days=N&interval=daily` returns N+1 points, the last one being today.
            Self::CoinGecko => {
                http.get_market_chart(instrument.id.as_str(), vs_currency, days)
                    .await
            }
            Self::Binance => {
                http.get_daily_klines(&instrument.trading_symbol, days + 1)
                    .await
            }
        }
    }

    async fn fetch_current(
        &self,
        http: &MarketDataHttp,
        instrument: &Instrument,
        vs_currency: &str,
    ) -> Result<serde_json::Value, HttpError> {
        match self {
            Self::CoinGecko => {
                http.get_simple_price(instrument.id.as_str(), vs_currency)
                    .await
            }
            Self::Binance => http.get_ticker_24h(&instrument.trading_symbol).await,
        }
    }
}

/// Sub-client for price data.
pub struct Prices<'a> {
    pub(crate) client: &'a TrackerClient,
}

impl<'a> Prices<'a> {
    /// Current price and 24h change. Never cached.
    pub async fn current(&self, instrument: &Instrument) -> Result<CurrentPrice, TrackerError> {
        let provider = self.client.provider;
        let raw = provider
            .fetch_current(&self.client.http, instrument, &self.client.vs_currency)
            .await?;
        Ok(provider.to_current_price(&raw, instrument, &self.client.vs_currency)?)
    }

    /// Recent daily history for the week view. Always fetched fresh so the
    /// current partial day is included.
    pub async fn week(&self, instrument: &Instrument) -> Result<PriceSeries, TrackerError> {
        self.fetch_series(instrument, Window::Week).await
    }

    /// Year-long daily history. Served from the cache while fresh.
    pub async fn year(&self, instrument: &Instrument) -> Result<PriceSeries, TrackerError> {
        let key = history_key(&instrument.id);
        if let Some(entry) = self.client.cache.get_fresh(&key) {
            tracing::debug!(instrument = %instrument.id, fetched_at = entry.fetched_at, "Year history cache hit");
            return Ok(entry.series);
        }

        tracing::debug!(instrument = %instrument.id, "Year history cache miss");
        let series = self.fetch_series(instrument, Window::Year).await?;
        if let Err(e) = self.client.cache.put(&key, &series) {
            tracing::warn!(instrument = %instrument.id, error = %e, "Failed to cache year history");
        }
        Ok(series)
    }

    /// Drop the cached year history for `instrument`.
    pub fn invalidate_year(&self, instrument: &Instrument) -> Result<(), TrackerError> {
        Ok(self.client.cache.invalidate(&history_key(&instrument.id))?)
    }

    async fn fetch_series(
        &self,
        instrument: &Instrument,
        window: Window,
    ) -> Result<PriceSeries, TrackerError> {
        let provider = self.client.provider;
        let raw = provider
            .fetch_history(&self.client.http, instrument, &self.client.vs_currency, window)
            .await?;
        Ok(provider.to_price_series(&raw)?)
    }
}
