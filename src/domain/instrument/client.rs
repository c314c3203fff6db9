//! Instruments sub-client — listing and switching the tracked asset.

use super::Instrument;
use crate::client::TrackerClient;
use crate::error::TrackerError;

/// Sub-client for instrument selection.
pub struct Instruments<'a> {
    pub(crate) client: &'a TrackerClient,
}

impl<'a> Instruments<'a> {
    pub fn list(&self) -> &'a [Instrument] {
        self.client.registry.all()
    }

    pub fn get(&self, id: &str) -> Result<Instrument, TrackerError> {
        self.client
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| TrackerError::UnknownInstrument(id.to_string()))
    }

    /// The instrument currently tracked.
    pub async fn selected(&self) -> Instrument {
        self.client.selected.read().await.clone()
    }

    /// Make `id` the tracked instrument and persist the choice.
    ///
    /// A failed write to the store is logged; the selection still takes
    /// effect for this session.
    pub async fn select(&self, id: &str) -> Result<Instrument, TrackerError> {
        let instrument = self.get(id)?;
        if let Err(e) = self.client.selection.save(&instrument.id) {
            tracing::warn!(instrument = %instrument.id, error = %e, "Failed to persist instrument selection");
        }
        *self.client.selected.write().await = instrument.clone();
        Ok(instrument)
    }
}
