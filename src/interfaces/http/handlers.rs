use super::envelope::RequestContext;
use super::error::ApiErrorResponse;
use crate::application::engine::QuoteEngine;
use crate::application::pickup::AvailabilityRequest;
use crate::config::AppConfig;
use crate::domain::package::SpecialHandling;
use crate::domain::payment::PaymentInfo;
use crate::domain::pickup::PickupWindow;
use crate::domain::pricing::ServiceCategory;
use crate::domain::shipment::ShipmentDetails;
use crate::domain::transaction::ShippingTransaction;
use crate::error::QuoteError;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::gateway::SimulatedGateway;
use crate::infrastructure::in_memory::InMemoryShipmentStore;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

type Body<T> = Result<Json<T>, JsonRejection>;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QuoteEngine>,
}

impl AppState {
    pub fn new(engine: QuoteEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Wires the simulated gateway, the in-memory ledger and the system
    /// clock according to `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let gateway = match config.rng_seed {
            Some(seed) => SimulatedGateway::seeded(seed, config.simulate_latency),
            None => SimulatedGateway::new(config.simulate_latency),
        };
        let engine = QuoteEngine::new(
            Box::new(gateway),
            Box::new(InMemoryShipmentStore::new()),
            Box::new(SystemClock),
        )
        .with_pricing_delay(config.pricing_delay());
        Self::new(engine)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    pub payment_info: PaymentInfo,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    #[serde(default)]
    pub origin_zip: String,
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub category: Option<ServiceCategory>,
    #[serde(default)]
    pub special_handling: BTreeSet<SpecialHandling>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupAvailability {
    pub origin_zip: String,
    pub windows: Vec<PickupWindow>,
}

pub async fn health(ctx: RequestContext) -> Response {
    let status = HealthStatus {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    };
    ctx.respond(StatusCode::OK, Ok(status))
}

pub async fn create_quote(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Body<ShipmentDetails>,
) -> Response {
    let result: Result<_, ApiErrorResponse> = match payload {
        Ok(Json(mut shipment)) => {
            shipment.normalize_legacy();
            state.engine.quote(&shipment).await.map_err(Into::into)
        }
        Err(rejection) => Err(rejection.into()),
    };
    ctx.respond(StatusCode::OK, result)
}

/// Business-rule failures are the payload here, not an error: the client
/// asked for the verdict.
pub async fn validate_transaction(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Body<ShippingTransaction>,
) -> Response {
    let result: Result<_, ApiErrorResponse> = match payload {
        Ok(Json(mut tx)) => {
            tx.normalize_legacy();
            state.engine.validate(&tx).map_err(Into::into)
        }
        Err(rejection) => Err(rejection.into()),
    };
    ctx.respond(StatusCode::OK, result)
}

pub async fn authorize_payment(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Body<AuthorizeRequest>,
) -> Response {
    let result: Result<_, ApiErrorResponse> = match payload {
        Ok(Json(request)) => state
            .engine
            .authorize(&request.payment_info, request.amount)
            .await
            .map_err(Into::into),
        Err(rejection) => Err(rejection.into()),
    };
    ctx.respond(StatusCode::OK, result)
}

pub async fn pickup_availability(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Body<AvailabilityQuery>,
) -> Response {
    let result: Result<_, ApiErrorResponse> = match payload {
        Ok(Json(query)) if query.origin_zip.trim().is_empty() => Err(ApiErrorResponse::from(
            QuoteError::schema("originZip", "origin zip is required"),
        )),
        Ok(Json(query)) => {
            let request = AvailabilityRequest {
                from_date: query.from_date,
                days: query.days,
                category: query.category,
                special_handling: query.special_handling,
            };
            state
                .engine
                .pickup_availability(&request)
                .map(|windows| PickupAvailability {
                    windows,
                    origin_zip: query.origin_zip.trim().to_string(),
                })
                .map_err(Into::into)
        }
        Err(rejection) => Err(rejection.into()),
    };
    ctx.respond(StatusCode::OK, result)
}

pub async fn submit_shipment(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Body<ShippingTransaction>,
) -> Response {
    let result: Result<_, ApiErrorResponse> = match payload {
        Ok(Json(tx)) => state.engine.submit(tx).await.map_err(Into::into),
        Err(rejection) => Err(rejection.into()),
    };
    ctx.respond(StatusCode::CREATED, result)
}

pub async fn get_shipment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(confirmation_number): Path<String>,
) -> Response {
    let result = state
        .engine
        .shipment(&confirmation_number)
        .await
        .map_err(ApiErrorResponse::from);
    ctx.respond(StatusCode::OK, result)
}

pub async fn list_shipments(State(state): State<AppState>, ctx: RequestContext) -> Response {
    let result = state
        .engine
        .shipments()
        .await
        .map_err(ApiErrorResponse::from);
    ctx.respond(StatusCode::OK, result)
}
