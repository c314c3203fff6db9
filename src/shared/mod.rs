//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw strings stored in the key-value store and sent to providers.

pub mod clock;
pub mod fmt;
pub mod serde_util;

pub use clock::{Clock, ManualClock, SystemClock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── InstrumentId ────────────────────────────────────────────────────────────

/// Newtype for instrument identifiers (CoinGecko coin ids, e.g. `"bitcoin"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstrumentId(String);

impl InstrumentId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for InstrumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for InstrumentId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(InstrumentId(s.to_string()))
    }
}

impl Serialize for InstrumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for InstrumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(InstrumentId(s))
    }
}

// ─── Window ──────────────────────────────────────────────────────────────────

/// Trailing slice of daily history shown by one calendar view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "365d")]
    Year,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Year => "365d",
        }
    }

    /// Number of daily cells shown.
    pub fn days(&self) -> usize {
        match self {
            Self::Week => 7,
            Self::Year => 365,
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_id_serde() {
        let id = InstrumentId::from("bitcoin");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bitcoin\"");
        let back: InstrumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_window_serde() {
        let w: Window = serde_json::from_str("\"365d\"").unwrap();
        assert_eq!(w, Window::Year);
        assert_eq!(w.days(), 365);
        assert_eq!(Window::Week.days(), 7);
    }
}
