mod common;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::*;
use rust_decimal_macros::dec;
use shipquote::application::engine::QuoteEngine;
use shipquote::application::rules::RuleCode;
use shipquote::domain::payment::AuthorizationOutcome;
use shipquote::domain::ports::ShipmentStore;
use shipquote::domain::pricing::ServiceCategory;
use shipquote::domain::transaction::{ConfirmedShipment, TransactionAction, TransactionStatus};
use shipquote::error::{QuoteError, Result};
use shipquote::infrastructure::clock::FixedClock;
use shipquote::infrastructure::gateway::FixedAuthorizationProvider;
use shipquote::infrastructure::in_memory::InMemoryShipmentStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Reports the first `collisions` confirmation numbers as already taken.
struct CollidingStore {
    inner: InMemoryShipmentStore,
    collisions: usize,
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl ShipmentStore for CollidingStore {
    async fn store(&self, shipment: ConfirmedShipment) -> Result<()> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) < self.collisions {
            return Err(QuoteError::DuplicateShipment(shipment.confirmation_number));
        }
        self.inner.store(shipment).await
    }

    async fn get(&self, confirmation_number: &str) -> Result<Option<ConfirmedShipment>> {
        self.inner.get(confirmation_number).await
    }

    async fn all_shipments(&self) -> Result<Vec<ConfirmedShipment>> {
        self.inner.all_shipments().await
    }
}

fn engine_with_collisions(collisions: usize) -> (QuoteEngine, Arc<AtomicUsize>) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let store = CollidingStore {
        inner: InMemoryShipmentStore::new(),
        collisions,
        attempts: attempts.clone(),
    };
    let engine = QuoteEngine::new(
        Box::new(FixedAuthorizationProvider::approving()),
        Box::new(store),
        Box::new(FixedClock(now())),
    );
    (engine, attempts)
}

#[tokio::test]
async fn test_submission_confirms_and_records_shipment() {
    let engine = engine_with(FixedAuthorizationProvider::approving());
    let tx = ready_transaction();
    let carrier = tx.selected_option.as_ref().unwrap().carrier.clone();

    let confirmed = engine.submit(tx).await.unwrap();

    assert!(confirmed.confirmation_number.starts_with("SHP-20260302-"));
    let initials: String = carrier.split_whitespace().filter_map(|w| w.chars().next()).collect();
    assert!(confirmed.tracking_number.starts_with(&initials));
    assert_eq!(confirmed.transaction.status, TransactionStatus::Confirmed);
    assert_eq!(
        confirmed.transaction.confirmation_number.as_deref(),
        Some(confirmed.confirmation_number.as_str())
    );
    assert!(confirmed.authorization.is_authorized());
    assert!(confirmed.estimated_delivery > pickup().date);

    let stored = engine.shipment(&confirmed.confirmation_number).await.unwrap();
    assert_eq!(stored, confirmed);
    assert_eq!(engine.shipments().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_declined_payment_is_not_booked() {
    let engine = engine_with(FixedAuthorizationProvider::declining("credit hold"));

    let result = engine.submit(ready_transaction()).await;

    assert!(matches!(result, Err(QuoteError::PaymentDeclined { reason }) if reason == "credit hold"));
    assert!(engine.shipments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rule_violations_stop_before_authorization() {
    let provider = FixedAuthorizationProvider::approving();
    let calls = provider.counter();
    let engine = engine_with(provider);
    let mut tx = ready_transaction();
    tx.payment_info = Some(purchase_order(dec!(5)));

    let result = engine.submit(tx).await;

    match result {
        Err(QuoteError::BusinessRules(report)) => {
            assert!(report.has_error(RuleCode::PoAmountExceeded));
        }
        other => panic!("expected business rule failure, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_incomplete_transaction_lists_missing_steps() {
    let engine = engine_with(FixedAuthorizationProvider::approving());
    let mut tx = ready_transaction();
    tx.payment_info = None;
    tx.pickup = None;

    let result = engine.submit(tx).await;

    match result {
        Err(QuoteError::Schema(fields)) => {
            let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
            assert_eq!(names, vec!["paymentInfo", "pickup"]);
        }
        other => panic!("expected schema failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_confirmed_transaction_cannot_be_resubmitted() {
    let engine = engine_with(FixedAuthorizationProvider::approving());
    let confirmed = engine.submit(ready_transaction()).await.unwrap();

    let result = engine.submit(confirmed.transaction.clone()).await;
    assert!(matches!(result, Err(QuoteError::TransactionFinalized(id)) if id == "tx-1001"));

    let mut tx = confirmed.transaction;
    let mutation = tx.apply(TransactionAction::SetPayment(corporate_account()));
    assert!(matches!(mutation, Err(QuoteError::TransactionFinalized(_))));
}

#[tokio::test]
async fn test_authorize_checks_schema_before_gateway() {
    let provider = FixedAuthorizationProvider::approving();
    let calls = provider.counter();
    let engine = engine_with(provider);

    let result = engine.authorize(&purchase_order(dec!(0)), None).await;
    assert!(matches!(result, Err(QuoteError::Schema(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let outcome = engine
        .authorize(&corporate_account(), Some(dec!(120)))
        .await
        .unwrap();
    assert!(matches!(outcome, AuthorizationOutcome::Authorized { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_quote_rejects_invalid_shipment() {
    let engine = engine_with(FixedAuthorizationProvider::approving());
    let mut shipment = shipment();
    shipment.origin.zip = "ABCDE".to_string();

    let result = engine.quote(&shipment).await;
    match result {
        Err(QuoteError::Schema(fields)) => assert_eq!(fields[0].field, "origin.zip"),
        other => panic!("expected schema failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_tampered_total_is_repriced_before_rules() {
    let provider = FixedAuthorizationProvider::approving();
    let calls = provider.counter();
    let engine = engine_with(provider);
    let mut tx = ready_transaction();
    tx.selected_option.as_mut().unwrap().pricing.total = dec!(0.01);
    tx.payment_info = Some(purchase_order(dec!(1)));

    let result = engine.submit(tx).await;

    match result {
        Err(QuoteError::BusinessRules(report)) => {
            assert!(report.has_error(RuleCode::PoAmountExceeded));
        }
        other => panic!("expected business rule failure, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(engine.shipments().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_booked_total_comes_from_the_rate_card() {
    let engine = engine_with(FixedAuthorizationProvider::approving());
    let mut tx = ready_transaction();
    let expected = cheapest(&tx.shipment, ServiceCategory::Ground);
    tx.selected_option.as_mut().unwrap().pricing.total = dec!(0.01);

    let confirmed = engine.submit(tx).await.unwrap();

    let booked = confirmed.transaction.selected_option.unwrap();
    assert_eq!(booked.id, expected.id);
    assert_eq!(booked.total(), expected.total());
}

#[tokio::test]
async fn test_unknown_option_is_rejected() {
    let provider = FixedAuthorizationProvider::approving();
    let calls = provider.counter();
    let engine = engine_with(provider);
    let mut tx = ready_transaction();
    tx.selected_option.as_mut().unwrap().id = "ground-teleport".to_string();

    let result = engine.submit(tx).await;

    match result {
        Err(QuoteError::Schema(fields)) => assert_eq!(fields[0].field, "selectedOption.id"),
        other => panic!("expected schema failure, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_pickup_date_at_calendar_end_is_a_schema_error() {
    let provider = FixedAuthorizationProvider::approving();
    let calls = provider.counter();
    let engine = engine_with(provider);

    for far in [NaiveDate::MAX, date(2027, 3, 3)] {
        let mut tx = ready_transaction();
        tx.pickup.as_mut().unwrap().date = far;

        let result = engine.submit(tx).await;
        match result {
            Err(QuoteError::Schema(fields)) => assert_eq!(fields[0].field, "pickup.date"),
            other => panic!("expected schema failure for {far}, got {other:?}"),
        }
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_taken_confirmation_number_is_regenerated() {
    let (engine, attempts) = engine_with_collisions(2);

    let confirmed = engine.submit(ready_transaction()).await.unwrap();

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(
        confirmed.transaction.confirmation_number.as_deref(),
        Some(confirmed.confirmation_number.as_str())
    );
    let stored = engine.shipment(&confirmed.confirmation_number).await.unwrap();
    assert_eq!(stored, confirmed);
}

#[tokio::test]
async fn test_persistent_collisions_fail_without_overwriting() {
    let (engine, attempts) = engine_with_collisions(usize::MAX);

    let result = engine.submit(ready_transaction()).await;

    assert!(matches!(result, Err(QuoteError::DuplicateShipment(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 5);
    assert!(engine.shipments().await.unwrap().is_empty());
}
