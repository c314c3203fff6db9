//! Instrument domain — tracked assets and the persisted selection.

#[cfg(feature = "http")]
pub mod client;
pub mod selection;

use crate::shared::InstrumentId;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

pub use selection::SelectionRepository;

/// A tracked asset. Static configuration, never derived from market data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// CoinGecko coin id, e.g. `bitcoin`.
    pub id: InstrumentId,
    /// Exchange pair, e.g. `BTCUSDT`.
    pub trading_symbol: String,
    pub display_name: String,
    /// CSS-style color for the renderer, e.g. `#F7931A`.
    pub color_hint: String,
}

impl Instrument {
    pub fn new(id: &str, trading_symbol: &str, display_name: &str, color_hint: &str) -> Self {
        Self {
            id: InstrumentId::from(id),
            trading_symbol: trading_symbol.to_string(),
            display_name: display_name.to_string(),
            color_hint: color_hint.to_string(),
        }
    }
}

lazy_static! {
    /// Instruments available when the builder is not given a list.
    pub static ref DEFAULT_INSTRUMENTS: Vec<Instrument> = vec![
        Instrument::new("bitcoin", "BTCUSDT", "Bitcoin", "#F7931A"),
        Instrument::new("ethereum", "ETHUSDT", "Ethereum", "#627EEA"),
        Instrument::new("solana", "SOLUSDT", "Solana", "#14F195"),
    ];
}

/// Ordered, non-empty set of instruments the tracker can switch between.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentRegistry {
    instruments: Vec<Instrument>,
}

impl InstrumentRegistry {
    /// Returns `None` for an empty list.
    pub fn new(instruments: Vec<Instrument>) -> Option<Self> {
        if instruments.is_empty() {
            None
        } else {
            Some(Self { instruments })
        }
    }

    pub fn get(&self, id: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The first instrument; used when nothing else is selected.
    pub fn first(&self) -> &Instrument {
        &self.instruments[0]
    }

    pub fn all(&self) -> &[Instrument] {
        &self.instruments
    }
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        Self {
            instruments: DEFAULT_INSTRUMENTS.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = InstrumentRegistry::default();
        assert_eq!(registry.first().id.as_str(), "bitcoin");
        assert_eq!(registry.get("ethereum").unwrap().trading_symbol, "ETHUSDT");
        assert!(!registry.contains("dogecoin"));
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(InstrumentRegistry::new(vec![]).is_none());
    }
}
