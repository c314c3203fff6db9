//! Wire types for provider price payloads (REST).
//!
//! Numeric fields stay as raw JSON values here; `convert` coerces them so a
//! bad field is reported by name instead of as a generic serde failure.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// CoinGecko `coins/{id}/market_chart` response. Only `prices` is used.
#[derive(Deserialize, Debug, Clone)]
pub struct MarketChartResponse {
    #[serde(default)]
    pub prices: Option<Vec<Vec<Value>>>,
}

/// CoinGecko `simple/price` response: `{ coin_id: { "usd": .., "usd_24h_change": .. } }`.
pub type SimplePriceResponse = HashMap<String, HashMap<String, Value>>;

/// One Binance kline:
/// `[openTime, open, high, low, close, volume, closeTime, ...]`.
pub type Kline = Vec<Value>;

/// Binance `klines` response.
pub type KlinesResponse = Vec<Kline>;

/// Index of the open-time column in a kline.
pub const KLINE_OPEN_TIME: usize = 0;
/// Index of the close-price column in a kline.
pub const KLINE_CLOSE: usize = 4;

/// Binance `ticker/24hr` response. Only the fields the tracker reads.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24hResponse {
    #[serde(default)]
    pub last_price: Option<Value>,
    #[serde(default)]
    pub price_change_percent: Option<Value>,
}
