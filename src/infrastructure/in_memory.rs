use crate::domain::ports::ShipmentStore;
use crate::domain::transaction::ConfirmedShipment;
use crate::error::{QuoteError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger of confirmed shipments.
///
/// Uses `Arc<RwLock<HashMap<String, ConfirmedShipment>>>` so handlers can read
/// concurrently. Contents are lost when the process exits.
#[derive(Default, Clone)]
pub struct InMemoryShipmentStore {
    shipments: Arc<RwLock<HashMap<String, ConfirmedShipment>>>,
}

impl InMemoryShipmentStore {
    /// Creates a new, empty in-memory shipment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShipmentStore for InMemoryShipmentStore {
    async fn store(&self, shipment: ConfirmedShipment) -> Result<()> {
        let mut shipments = self.shipments.write().await;
        match shipments.entry(shipment.confirmation_number.clone()) {
            Entry::Occupied(entry) => Err(QuoteError::DuplicateShipment(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(shipment);
                Ok(())
            }
        }
    }

    async fn get(&self, confirmation_number: &str) -> Result<Option<ConfirmedShipment>> {
        let shipments = self.shipments.read().await;
        Ok(shipments.get(confirmation_number).cloned())
    }

    async fn all_shipments(&self) -> Result<Vec<ConfirmedShipment>> {
        let shipments = self.shipments.read().await;
        let mut all: Vec<ConfirmedShipment> = shipments.values().cloned().collect();
        all.sort_by(|a, b| a.confirmed_at.cmp(&b.confirmed_at));
        Ok(all)
    }
}
