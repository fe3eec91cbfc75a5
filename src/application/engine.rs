use crate::application::pickup::{AvailabilityRequest, add_business_days, pickup_windows};
use crate::application::pricing::PricingCalculator;
use crate::application::rules::{BusinessRuleValidator, ValidationResult};
use crate::application::schema::{
    ensure_valid, missing_for_submission, validate_payment, validate_shipment,
    validate_transaction,
};
use crate::domain::payment::{AuthorizationOutcome, PaymentInfo};
use crate::domain::pickup::PickupWindow;
use crate::domain::ports::{AuthorizationProviderBox, ClockBox, ShipmentStoreBox};
use crate::domain::pricing::QuoteResponse;
use crate::domain::shipment::ShipmentDetails;
use crate::domain::transaction::{ConfirmedShipment, ShippingTransaction, TransactionAction};
use crate::error::{QuoteError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::time::Duration;
use uuid::Uuid;

const STORE_ATTEMPTS: u32 = 5;

/// Orchestrates quoting, validation, payment authorization and booking.
///
/// `QuoteEngine` owns the ports it talks to. It holds no per-request state:
/// every call works from its own input, and the only thing that outlives a
/// request is the ledger of confirmed shipments.
pub struct QuoteEngine {
    authorizer: AuthorizationProviderBox,
    shipments: ShipmentStoreBox,
    clock: ClockBox,
    pricing_delay: Duration,
}

impl QuoteEngine {
    /// Creates a new `QuoteEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `authorizer` - The payment gateway used at authorization and submission.
    /// * `shipments` - The ledger confirmed shipments are written to.
    /// * `clock` - Source of "now" for quote expiry and lead-time rules.
    pub fn new(
        authorizer: AuthorizationProviderBox,
        shipments: ShipmentStoreBox,
        clock: ClockBox,
    ) -> Self {
        Self {
            authorizer,
            shipments,
            clock,
            pricing_delay: Duration::ZERO,
        }
    }

    /// Adds an artificial wait before quotes are returned.
    pub fn with_pricing_delay(mut self, delay: Duration) -> Self {
        self.pricing_delay = delay;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn quote(&self, shipment: &ShipmentDetails) -> Result<QuoteResponse> {
        ensure_valid(validate_shipment(shipment))?;
        if !self.pricing_delay.is_zero() {
            tokio::time::sleep(self.pricing_delay).await;
        }
        let response = PricingCalculator::calculate(shipment, self.now())?;
        tracing::info!(
            zone = response.metrics.zone,
            billable = %response.metrics.billable_weight,
            options = response.quotes.all().count(),
            "quote calculated"
        );
        Ok(response)
    }

    /// Runs schema checks, then every business rule.
    ///
    /// Schema problems are an error; business-rule problems are the result.
    pub fn validate(&self, tx: &ShippingTransaction) -> Result<ValidationResult> {
        let now = self.now();
        ensure_valid(validate_transaction(tx, now.date_naive()))?;
        let mut tx = tx.clone();
        reprice_selection(&mut tx, now)?;
        Ok(BusinessRuleValidator::validate(&tx, now))
    }

    pub async fn authorize(
        &self,
        payment: &PaymentInfo,
        amount: Option<Decimal>,
    ) -> Result<AuthorizationOutcome> {
        ensure_valid(validate_payment(payment))?;
        self.authorizer.authorize(payment, amount).await
    }

    pub fn pickup_availability(&self, request: &AvailabilityRequest) -> Result<Vec<PickupWindow>> {
        pickup_windows(request, self.now())
    }

    /// Books a transaction.
    ///
    /// The transaction must pass schema checks, carry a selected option, a
    /// payment method and a pickup, satisfy every business rule and have its
    /// payment authorized for the option total. Only then is it confirmed and
    /// written to the ledger.
    ///
    /// The selected option is re-priced from the shipment and replaced by
    /// the server's own figures before any rule or authorization sees it.
    pub async fn submit(&self, mut tx: ShippingTransaction) -> Result<ConfirmedShipment> {
        if tx.is_finalized() {
            return Err(QuoteError::TransactionFinalized(tx.id));
        }
        tx.normalize_legacy();
        let now = self.now();

        let mut errors = validate_transaction(&tx, now.date_naive());
        errors.extend(missing_for_submission(&tx));
        ensure_valid(errors)?;
        reprice_selection(&mut tx, now)?;

        let rules = BusinessRuleValidator::validate(&tx, now);
        if !rules.is_valid {
            tracing::info!(transaction = %tx.id, violations = rules.errors.len(), "submission rejected by business rules");
            return Err(QuoteError::BusinessRules(rules));
        }

        let (Some(option), Some(payment), Some(pickup)) = (
            tx.selected_option.clone(),
            tx.payment_info.clone(),
            tx.pickup.clone(),
        ) else {
            return Err(QuoteError::Schema(missing_for_submission(&tx)));
        };

        let estimated_delivery = add_business_days(pickup.date, option.transit_days)
            .ok_or_else(|| QuoteError::schema("pickup.date", "pickup date is out of range"))?;

        let authorization = self.authorizer.authorize(&payment, Some(option.total())).await?;
        if let AuthorizationOutcome::Declined { reason, .. } = &authorization {
            tracing::info!(transaction = %tx.id, %reason, "payment declined at submission");
            return Err(QuoteError::PaymentDeclined {
                reason: reason.clone(),
            });
        }

        let number = confirmation_number(now);
        tx.apply(TransactionAction::MarkReview)?;
        tx.apply(TransactionAction::Confirm {
            confirmation_number: number.clone(),
        })?;

        let mut confirmed = ConfirmedShipment {
            confirmation_number: number,
            tracking_number: tracking_number(&option.carrier),
            confirmed_at: now,
            estimated_delivery,
            authorization,
            transaction: tx,
        };
        let mut attempts = 1;
        loop {
            match self.shipments.store(confirmed.clone()).await {
                Ok(()) => break,
                Err(QuoteError::DuplicateShipment(number)) if attempts < STORE_ATTEMPTS => {
                    tracing::warn!(confirmation = %number, "confirmation number taken, regenerating");
                    attempts += 1;
                    let fresh = confirmation_number(now);
                    confirmed.transaction.confirmation_number = Some(fresh.clone());
                    confirmed.confirmation_number = fresh;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            confirmation = %confirmed.confirmation_number,
            carrier = %option.carrier,
            total = %option.total(),
            "shipment confirmed"
        );
        Ok(confirmed)
    }

    pub async fn shipment(&self, confirmation_number: &str) -> Result<ConfirmedShipment> {
        self.shipments
            .get(confirmation_number)
            .await?
            .ok_or_else(|| QuoteError::NotFound(confirmation_number.to_string()))
    }

    pub async fn shipments(&self) -> Result<Vec<ConfirmedShipment>> {
        self.shipments.all_shipments().await
    }
}

/// Replaces the client's copy of the selected option with a fresh server
/// price for the same option id.
fn reprice_selection(tx: &mut ShippingTransaction, now: DateTime<Utc>) -> Result<()> {
    let Some(selected) = tx.selected_option.as_ref() else {
        return Ok(());
    };
    let quotes = PricingCalculator::calculate(&tx.shipment, now)?.quotes;
    let Some(current) = quotes.find(&selected.id) else {
        return Err(QuoteError::schema(
            "selectedOption.id",
            format!("unknown shipping option {}", selected.id),
        ));
    };
    if selected.total() != current.total() {
        tracing::warn!(
            transaction = %tx.id,
            option = %current.id,
            submitted = %selected.total(),
            priced = %current.total(),
            "selected option total differs from the rate card"
        );
    }
    tx.selected_option = Some(current.clone());
    Ok(())
}

fn confirmation_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_ascii_uppercase();
    format!("SHP-{}-{suffix}", now.format("%Y%m%d"))
}

/// Carrier initials followed by ten digits, e.g. `SE4830012931`.
fn tracking_number(carrier: &str) -> String {
    let prefix: String = carrier
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let digits: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .take(10)
        .collect();
    format!("{prefix}{digits}")
}
