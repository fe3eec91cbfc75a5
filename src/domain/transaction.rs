use super::payment::{AuthorizationOutcome, PaymentInfo};
use super::pickup::PickupDetails;
use super::pricing::PricingOption;
use super::shipment::ShipmentDetails;
use crate::error::{QuoteError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionStatus {
    #[default]
    Draft,
    Pricing,
    PaymentMethodSelected,
    Review,
    Confirmed,
}

/// The booking the customer builds up step by step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingTransaction {
    pub id: String,
    /// When the selected quote was priced; drives quote expiry.
    pub timestamp: DateTime<Utc>,
    pub shipment: ShipmentDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<PricingOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<PaymentInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup: Option<PickupDetails>,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_number: Option<String>,
}

/// Steps of the booking flow, dispatched against a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionAction {
    UpdateShipment(ShipmentDetails),
    SelectOption {
        option: PricingOption,
        at: DateTime<Utc>,
    },
    SetPayment(PaymentInfo),
    SetPickup(PickupDetails),
    MarkReview,
    Confirm {
        confirmation_number: String,
    },
}

impl ShippingTransaction {
    pub fn new(id: impl Into<String>, shipment: ShipmentDetails, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            timestamp: now,
            shipment,
            selected_option: None,
            payment_info: None,
            pickup: None,
            status: TransactionStatus::Draft,
            confirmation_number: None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.status == TransactionStatus::Confirmed
    }

    /// Applies one step of the booking flow.
    ///
    /// A confirmed transaction is read-only: every action is rejected with
    /// [`QuoteError::TransactionFinalized`].
    pub fn apply(&mut self, action: TransactionAction) -> Result<()> {
        if self.is_finalized() {
            return Err(QuoteError::TransactionFinalized(self.id.clone()));
        }

        match action {
            TransactionAction::UpdateShipment(shipment) => {
                // New inputs invalidate any price picked for the old ones.
                self.shipment = shipment;
                self.selected_option = None;
                self.status = TransactionStatus::Draft;
            }
            TransactionAction::SelectOption { option, at } => {
                self.selected_option = Some(option);
                self.timestamp = at;
                self.status = TransactionStatus::Pricing;
            }
            TransactionAction::SetPayment(payment) => {
                self.payment_info = Some(payment);
                self.status = TransactionStatus::PaymentMethodSelected;
            }
            TransactionAction::SetPickup(pickup) => {
                self.pickup = Some(pickup);
            }
            TransactionAction::MarkReview => {
                self.status = TransactionStatus::Review;
            }
            TransactionAction::Confirm {
                confirmation_number,
            } => {
                self.confirmation_number = Some(confirmation_number);
                self.status = TransactionStatus::Confirmed;
            }
        }
        Ok(())
    }

    /// Throws away everything but the id and starts a fresh draft.
    pub fn start_over(&mut self, shipment: ShipmentDetails, now: DateTime<Utc>) {
        *self = Self::new(self.id.clone(), shipment, now);
    }

    pub fn normalize_legacy(&mut self) {
        self.shipment.normalize_legacy();
    }
}

/// A booked shipment as handed back to the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedShipment {
    pub confirmation_number: String,
    pub tracking_number: String,
    pub confirmed_at: DateTime<Utc>,
    pub estimated_delivery: NaiveDate,
    pub authorization: AuthorizationOutcome,
    pub transaction: ShippingTransaction,
}
