mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use common::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shipquote::infrastructure::gateway::FixedAuthorizationProvider;
use shipquote::interfaces::http::{AppState, router};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(engine_with(FixedAuthorizationProvider::approving())))
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_uses_envelope() {
    let request = Request::builder()
        .uri("/api/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["meta"]["requestId"], "req-42");
    assert!(body["meta"]["timestamp"].is_string());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_request_id_is_generated_when_absent() {
    let (_, body) = send(app(), get("/api/health")).await;
    let id = body["meta"]["requestId"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_quote_returns_categorized_options() {
    let payload = serde_json::to_value(shipment()).unwrap();
    let (status, body) = send(app(), post("/api/quote", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    for category in ["ground", "air", "freight"] {
        assert_eq!(data["quotes"][category].as_array().unwrap().len(), 3);
    }
    assert_eq!(data["metrics"]["zone"], 2);
    assert!(data["quotes"]["ground"][0]["pricing"]["total"].is_number());
}

#[tokio::test]
async fn test_legacy_country_names_are_accepted() {
    let mut payload = serde_json::to_value(shipment()).unwrap();
    payload["origin"]["country"] = json!("United States");
    payload["destination"]["country"] = json!("USA");
    let (status, _) = send(app(), post("/api/quote", &payload)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/quote")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_JSON");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_schema_errors_list_fields() {
    let mut payload = serde_json::to_value(shipment()).unwrap();
    payload["destination"]["contactInfo"]["email"] = json!("nobody");
    let (status, body) = send(app(), post("/api/quote", &payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["details"][0]["field"],
        "destination.contactInfo.email"
    );
}

#[tokio::test]
async fn test_validate_reports_rule_failures_as_data() {
    let mut tx = ready_transaction();
    tx.shipment.destination = chicago();
    let payload = serde_json::to_value(&tx).unwrap();
    let (status, body) = send(app(), post("/api/validate", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isValid"], false);
    assert_eq!(body["data"]["errors"][0]["code"], "IDENTICAL_ADDRESSES");
}

#[tokio::test]
async fn test_submit_then_fetch_shipment() {
    let app = app();
    let payload = serde_json::to_value(ready_transaction()).unwrap();
    let (status, body) = send(app.clone(), post("/api/shipments", &payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    let number = body["data"]["confirmationNumber"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["transaction"]["status"], "confirmed");
    assert_eq!(body["data"]["authorization"]["status"], "authorized");

    let (status, body) = send(app, get(&format!("/api/shipments/{number}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["confirmationNumber"], number.as_str());
}

#[tokio::test]
async fn test_submit_with_rule_violation_is_unprocessable() {
    let mut tx = ready_transaction();
    tx.shipment.destination = chicago();
    let payload = serde_json::to_value(&tx).unwrap();
    let (status, body) = send(app(), post("/api/shipments", &payload)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "BUSINESS_RULE_VIOLATION");
    assert_eq!(body["error"]["details"]["errors"][0]["code"], "IDENTICAL_ADDRESSES");
}

#[tokio::test]
async fn test_declined_submission_is_payment_required() {
    let app = router(AppState::new(engine_with(
        FixedAuthorizationProvider::declining("account on hold"),
    )));
    let payload = serde_json::to_value(ready_transaction()).unwrap();
    let (status, body) = send(app, post("/api/shipments", &payload)).await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error"]["code"], "PAYMENT_DECLINED");
    assert_eq!(body["error"]["message"], "account on hold");
}

#[tokio::test]
async fn test_unknown_shipment_is_not_found() {
    let (status, body) = send(app(), get("/api/shipments/SHP-20260302-ZZZZZZ")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_authorize_endpoint_returns_outcome() {
    let payload = json!({
        "paymentInfo": {
            "method": "corporate",
            "details": {
                "accountNumber": "CORP-4410092",
                "accountPin": "2718",
                "billingContact": "Accounts Payable"
            }
        },
        "amount": 245.10
    });
    let (status, body) = send(app(), post("/api/payment/authorize", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "authorized");
    assert_eq!(body["data"]["method"], "corporate");
}

#[tokio::test]
async fn test_pickup_availability_flags_short_notice() {
    let payload = json!({
        "originZip": "60606",
        "fromDate": "2026-03-02",
        "days": 2,
        "specialHandling": ["hazmat"]
    });
    let (status, body) = send(app(), post("/api/pickup/availability", &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["originZip"], "60606");
    let windows = body["data"]["windows"].as_array().unwrap();
    assert_eq!(windows.len(), 6);
    // Hazmat needs 72 hours; nothing in the first two business days qualifies.
    assert!(windows.iter().all(|w| w["available"] == false));
    assert!(
        windows[0]["unavailableReason"]
            .as_str()
            .unwrap()
            .contains("72")
    );
}

#[tokio::test]
async fn test_pickup_availability_requires_origin_zip() {
    let (status, body) = send(
        app(),
        post("/api/pickup/availability", &json!({ "days": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "originZip");
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/quote")
        .header(header::ORIGIN, "https://portal.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_oversized_package_is_a_validation_error() {
    let mut payload = serde_json::to_value(shipment()).unwrap();
    payload["package"]["dimensions"] = json!({
        "length": 10_000_000_000u64,
        "width": 10_000_000_000u64,
        "height": 10_000_000_000u64,
        "unit": "in"
    });
    payload["package"]["weight"]["value"] = json!(10_000_000_000u64);

    let (status, body) = send(app(), post("/api/quote", &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"package.weight.value"));
    assert!(fields.contains(&"package.dimensions.height"));

    let mut tx = serde_json::to_value(ready_transaction()).unwrap();
    tx["shipment"] = payload;
    let (status, body) = send(app(), post("/api/shipments", &tx)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_pickup_availability_rejects_far_start_dates() {
    for from_date in ["+262142-12-31", "2027-03-03"] {
        let payload = json!({ "originZip": "60606", "fromDate": from_date, "days": 5 });
        let (status, body) = send(app(), post("/api/pickup/availability", &payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{from_date}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"][0]["field"], "fromDate");
    }
}

#[tokio::test]
async fn test_submitted_price_cannot_undercut_the_rate_card() {
    let mut payload = serde_json::to_value(ready_transaction()).unwrap();
    payload["selectedOption"]["pricing"]["total"] = json!(0.01);
    payload["paymentInfo"]["details"]["poAmount"] = json!(1);
    let (status, body) = send(app(), post("/api/shipments", &payload)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"]["errors"][0]["code"], "PO_AMOUNT_EXCEEDED");

    let (_, body) = send(app(), get("/api/shipments")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
