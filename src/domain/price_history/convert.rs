//! Normalization: provider payloads → `PriceSeries` / `CurrentPrice`.
//!
//! One pair of functions per provider shape. Points are taken as delivered:
//! no deduplication, no resampling.

use super::wire::{
    KlinesResponse, MarketChartResponse, SimplePriceResponse, Ticker24hResponse,
    KLINE_CLOSE, KLINE_OPEN_TIME,
};
use super::{CurrentPrice, PricePoint, PriceSeries};
use crate::error::MalformedDataError;
use crate::shared::serde_util;
use serde::de::DeserializeOwned;
use serde_json::Value;

fn parse<T: DeserializeOwned>(raw: &Value, what: &str) -> Result<T, MalformedDataError> {
    T::deserialize(raw)
        .map_err(|e| MalformedDataError::UnexpectedShape(format!("{}: {}", what, e)))
}

// ── CoinGecko ────────────────────────────────────────────────────────────

pub fn coingecko_series(raw: &Value) -> Result<PriceSeries, MalformedDataError> {
    let chart: MarketChartResponse = parse(raw, "market_chart")?;
    let rows = chart
        .prices
        .ok_or_else(|| MalformedDataError::MissingField("prices".to_string()))?;

    let points = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Ok(PricePoint {
                timestamp: serde_util::timestamp_ms(&format!("prices[{}][0]", i), row.first())?,
                price: serde_util::decimal(&format!("prices[{}][1]", i), row.get(1))?,
            })
        })
        .collect::<Result<Vec<_>, MalformedDataError>>()?;

    PriceSeries::new(points)
}

pub fn coingecko_current(
    raw: &Value,
    coin_id: &str,
    vs_currency: &str,
) -> Result<CurrentPrice, MalformedDataError> {
    let resp: SimplePriceResponse = parse(raw, "simple/price")?;
    let quote = resp
        .get(coin_id)
        .ok_or_else(|| MalformedDataError::MissingField(coin_id.to_string()))?;

    let change_key = format!("{}_24h_change", vs_currency);
    Ok(CurrentPrice {
        price: serde_util::decimal(
            &format!("{}.{}", coin_id, vs_currency),
            quote.get(vs_currency),
        )?,
        change_24h: serde_util::optional_decimal(
            &format!("{}.{}", coin_id, change_key),
            quote.get(&change_key),
        )?,
    })
}

// ── Binance ──────────────────────────────────────────────────────────────

pub fn binance_series(raw: &Value) -> Result<PriceSeries, MalformedDataError> {
    let klines: KlinesResponse = parse(raw, "klines")?;

    let points = klines
        .iter()
        .enumerate()
        .map(|(i, k)| {
            Ok(PricePoint {
                timestamp: serde_util::timestamp_ms(
                    &format!("klines[{}].openTime", i),
                    k.get(KLINE_OPEN_TIME),
                )?,
                price: serde_util::decimal(&format!("klines[{}].close", i), k.get(KLINE_CLOSE))?,
            })
        })
        .collect::<Result<Vec<_>, MalformedDataError>>()?;

    PriceSeries::new(points)
}

pub fn binance_current(raw: &Value) -> Result<CurrentPrice, MalformedDataError> {
    let ticker: Ticker24hResponse = parse(raw, "ticker/24hr")?;
    Ok(CurrentPrice {
        price: serde_util::decimal("lastPrice", ticker.last_price.as_ref())?,
        change_24h: serde_util::optional_decimal(
            "priceChangePercent",
            ticker.price_change_percent.as_ref(),
        )?,
    })
}
