use super::envelope::render_panic;
use super::handlers::{
    AppState, authorize_payment, create_quote, get_shipment, health, list_shipments,
    pickup_availability, submit_shipment, validate_transaction,
};
use axum::Router;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the API router. Any origin may call it; preflight requests are
/// answered by the CORS layer before they reach a handler. A handler that
/// panics still answers with an `INTERNAL_ERROR` envelope.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/quote", post(create_quote))
        .route("/api/validate", post(validate_transaction))
        .route("/api/payment/authorize", post(authorize_payment))
        .route("/api/pickup/availability", post(pickup_availability))
        .route("/api/shipments", post(submit_shipment).get(list_shipments))
        .route("/api/shipments/{confirmation_number}", get(get_shipment))
        .layer(CatchPanicLayer::custom(render_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
