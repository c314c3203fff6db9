//! Persistence of the user's selected instrument across sessions.

use super::{Instrument, InstrumentRegistry};
use crate::error::StorageError;
use crate::shared::InstrumentId;
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Store key holding the selected instrument id.
pub const SELECTED_INSTRUMENT_KEY: &str = "price_calendar:selected_instrument";

/// Repository for the selected instrument id.
#[derive(Clone)]
pub struct SelectionRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SelectionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The persisted selection, if it names an instrument in `registry`.
    /// Blank values count as none.
    pub fn load(&self, registry: &InstrumentRegistry) -> Option<Instrument> {
        let id = self
            .store
            .get(SELECTED_INSTRUMENT_KEY)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())?;
        let found = registry.get(&id).cloned();
        if found.is_none() {
            tracing::debug!(instrument = %id, "Ignoring persisted selection not in registry");
        }
        found
    }

    pub fn save(&self, id: &InstrumentId) -> Result<(), StorageError> {
        self.store.set(SELECTED_INSTRUMENT_KEY, id.as_str())
    }
}

impl std::fmt::Debug for SelectionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionRepository").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_save_then_load() {
        let registry = InstrumentRegistry::default();
        let repo = SelectionRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(repo.load(&registry), None);
        repo.save(&InstrumentId::from("ethereum")).unwrap();
        assert_eq!(repo.load(&registry).unwrap().trading_symbol, "ETHUSDT");
    }

    #[test]
    fn test_blank_value_is_none() {
        let store = Arc::new(MemoryStore::new());
        store.set(SELECTED_INSTRUMENT_KEY, "  ").unwrap();
        let repo = SelectionRepository::new(store);
        assert_eq!(repo.load(&InstrumentRegistry::default()), None);
    }

    #[test]
    fn test_unknown_id_is_none() {
        let store = Arc::new(MemoryStore::new());
        store.set(SELECTED_INSTRUMENT_KEY, "dogecoin").unwrap();
        let repo = SelectionRepository::new(store);
        assert_eq!(repo.load(&InstrumentRegistry::default()), None);
    }
}
