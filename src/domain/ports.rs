use super::payment::{AuthorizationOutcome, PaymentInfo};
use super::transaction::ConfirmedShipment;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A payment gateway able to approve or decline a payment method.
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    async fn authorize(
        &self,
        payment: &PaymentInfo,
        amount: Option<Decimal>,
    ) -> Result<AuthorizationOutcome>;
}

/// Ledger of confirmed shipments, keyed by confirmation number.
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    async fn store(&self, shipment: ConfirmedShipment) -> Result<()>;
    async fn get(&self, confirmation_number: &str) -> Result<Option<ConfirmedShipment>>;
    async fn all_shipments(&self) -> Result<Vec<ConfirmedShipment>>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type AuthorizationProviderBox = Box<dyn AuthorizationProvider>;
pub type ShipmentStoreBox = Box<dyn ShipmentStore>;
pub type ClockBox = Box<dyn Clock>;
