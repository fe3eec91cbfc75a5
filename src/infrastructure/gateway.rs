//! Payment gateway adapters.
//!
//! [`SimulatedGateway`] stands in for a real processor: it runs the structural
//! checks, waits a per-method processing delay and approves at a fixed rate.
//! [`FixedAuthorizationProvider`] always answers the same way and is what
//! tests plug in.

use crate::domain::payment::{AuthorizationOutcome, PaymentInfo, PaymentMethod};
use crate::domain::ports::AuthorizationProvider;
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

fn decline_reason(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Po => "purchase order could not be verified with the approver",
        PaymentMethod::Bol => "bill of lading was rejected by the carrier",
        PaymentMethod::Thirdparty => "third party declined to accept the charges",
        PaymentMethod::Net => "credit review did not approve net terms",
        PaymentMethod::Corporate => "corporate account is on hold",
    }
}

pub struct SimulatedGateway {
    rng: Mutex<StdRng>,
    simulate_latency: bool,
}

impl SimulatedGateway {
    pub fn new(simulate_latency: bool) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
            simulate_latency,
        }
    }

    /// A gateway whose approvals, codes and ids repeat for the same seed.
    pub fn seeded(seed: u64, simulate_latency: bool) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            simulate_latency,
        }
    }
}

#[async_trait]
impl AuthorizationProvider for SimulatedGateway {
    async fn authorize(
        &self,
        payment: &PaymentInfo,
        amount: Option<Decimal>,
    ) -> Result<AuthorizationOutcome> {
        let method = payment.method();
        if self.simulate_latency {
            tokio::time::sleep(Duration::from_millis(method.processing_delay_ms())).await;
        }
        let processed_at = Utc::now();

        let mut failures = payment.structural_failures(processed_at.date_naive());
        if let (PaymentInfo::Po(po), Some(amount)) = (payment, amount)
            && amount > po.po_amount
        {
            failures.push(format!(
                "charge of {amount} exceeds the PO amount of {}",
                po.po_amount
            ));
        }
        if !failures.is_empty() {
            tracing::info!(%method, failures = failures.len(), "payment failed structural checks");
            return Ok(AuthorizationOutcome::Declined {
                method,
                reason: format!("Validation failed: {}", failures.join("; ")),
                processed_at,
            });
        }

        let mut rng = self.rng.lock().await;
        let roll: f64 = rng.random();
        if roll < method.success_rate() {
            let authorization_code = format!("AUTH-{:08X}", rng.random::<u32>());
            let transaction_id = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
            tracing::info!(%method, %authorization_code, "payment authorized");
            Ok(AuthorizationOutcome::Authorized {
                method,
                authorization_code,
                transaction_id: transaction_id.to_string(),
                processed_at,
            })
        } else {
            tracing::info!(%method, "payment declined by simulated issuer");
            Ok(AuthorizationOutcome::Declined {
                method,
                reason: decline_reason(method).to_string(),
                processed_at,
            })
        }
    }
}

/// Answers every request with the same verdict and counts the calls.
pub struct FixedAuthorizationProvider {
    decline_with: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl FixedAuthorizationProvider {
    pub fn approving() -> Self {
        Self {
            decline_with: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn declining(reason: impl Into<String>) -> Self {
        Self {
            decline_with: Some(reason.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared handle on the call count, still readable once the provider
    /// has been boxed into an engine.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl AuthorizationProvider for FixedAuthorizationProvider {
    async fn authorize(
        &self,
        payment: &PaymentInfo,
        _amount: Option<Decimal>,
    ) -> Result<AuthorizationOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let method = payment.method();
        let processed_at = Utc::now();
        Ok(match &self.decline_with {
            None => AuthorizationOutcome::Authorized {
                method,
                authorization_code: "AUTH-FIXED".to_string(),
                transaction_id: Uuid::nil().to_string(),
                processed_at,
            },
            Some(reason) => AuthorizationOutcome::Declined {
                method,
                reason: reason.clone(),
                processed_at,
            },
        })
    }
}
