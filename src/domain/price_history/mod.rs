//! Price history domain — canonical daily series, current price, provider shapes.

#[cfg(feature = "http")]
pub mod client;
pub mod convert;
pub mod wire;

use crate::domain::calendar::Direction;
use crate::domain::instrument::Instrument;
use crate::error::MalformedDataError;
use chrono::{NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ─── PricePoint ──────────────────────────────────────────────────────────────

/// One daily price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    pub price: Decimal,
}

impl PricePoint {
    pub fn new(timestamp: i64, price: Decimal) -> Self {
        Self { timestamp, price }
    }

    /// Calendar date of this point as seen from `tz`.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        tz.timestamp_millis_opt(self.timestamp)
            .single()
            .map(|dt| dt.date_naive())
    }
}

// ─── PriceSeries ─────────────────────────────────────────────────────────────

/// Provider-agnostic daily series, ordered by non-decreasing timestamp.
///
/// The last point may be the current, still incomplete day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, MalformedDataError> {
        if let Some(index) = points
            .windows(2)
            .position(|w| w[1].timestamp < w[0].timestamp)
        {
            return Err(MalformedDataError::OutOfOrder { index: index + 1 });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The last `n` points, or all of them when fewer exist.
    pub fn trailing(&self, n: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = MalformedDataError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

// ─── CurrentPrice ────────────────────────────────────────────────────────────

/// Point-in-time price snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentPrice {
    pub price: Decimal,
    /// 24h change in percent. `None` when the provider left it out, which is
    /// not the same as a flat day.
    pub change_24h: Option<Decimal>,
}

impl CurrentPrice {
    pub fn change_direction(&self) -> Option<Direction> {
        self.change_24h.map(|c| {
            if c >= Decimal::ZERO {
                Direction::Up
            } else {
                Direction::Down
            }
        })
    }
}

// ─── Provider ────────────────────────────────────────────────────────────────

/// Upstream payload shape. Each variant owns one pair of mapping functions in
/// `convert`; nothing downstream of normalization looks at this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// `[[timestamp, price], ...]` history and `simple/price` snapshots.
    #[default]
    CoinGecko,
    /// Daily klines (open time + close price) and the 24h ticker.
    Binance,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoinGecko => "coingecko",
            Self::Binance => "binance",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::CoinGecko => crate::network::DEFAULT_API_URL,
            Self::Binance => crate::network::BINANCE_API_URL,
        }
    }

    pub fn to_price_series(&self, raw: &serde_json::Value) -> Result<PriceSeries, MalformedDataError> {
        match self {
            Self::CoinGecko => convert::coingecko_series(raw),
            Self::Binance => convert::binance_series(raw),
        }
    }

    pub fn to_current_price(
        &self,
        raw: &serde_json::Value,
        instrument: &Instrument,
        vs_currency: &str,
    ) -> Result<CurrentPrice, MalformedDataError> {
        match self {
            Self::CoinGecko => convert::coingecko_current(raw, instrument.id.as_str(), vs_currency),
            Self::Binance => convert::binance_current(raw),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coingecko" => Ok(Self::CoinGecko),
            "binance" => Ok(Self::Binance),
            other => Err(format!("unsupported provider `{}`", other)),
        }
    }
}
