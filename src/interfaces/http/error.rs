//! Mapping of domain errors onto HTTP status codes and stable error codes.

use crate::error::QuoteError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

pub const INVALID_JSON: &str = "INVALID_JSON";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const BUSINESS_RULE_VIOLATION: &str = "BUSINESS_RULE_VIOLATION";
pub const PAYMENT_DECLINED: &str = "PAYMENT_DECLINED";
pub const TRANSACTION_FINALIZED: &str = "TRANSACTION_FINALIZED";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// The `error` member of a failed response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details<T: Serialize>(mut self, details: &T) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ApiError,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    pub fn internal_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new(INTERNAL_ERROR, "An internal error occurred"),
        )
    }
}

impl From<QuoteError> for ApiErrorResponse {
    fn from(error: QuoteError) -> Self {
        match error {
            QuoteError::Schema(fields) => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new(VALIDATION_ERROR, "Validation failed").with_details(&fields),
            ),
            QuoteError::BusinessRules(result) => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new(
                    BUSINESS_RULE_VIOLATION,
                    format!("{} business rule(s) failed", result.errors.len()),
                )
                .with_details(&result),
            ),
            QuoteError::PaymentDeclined { reason } => Self::new(
                StatusCode::PAYMENT_REQUIRED,
                ApiError::new(PAYMENT_DECLINED, reason),
            ),
            QuoteError::TransactionFinalized(id) => Self::new(
                StatusCode::CONFLICT,
                ApiError::new(
                    TRANSACTION_FINALIZED,
                    format!("transaction {id} is already confirmed"),
                ),
            ),
            QuoteError::NotFound(what) => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new(NOT_FOUND, format!("shipment {what} not found")),
            ),
            QuoteError::Json(e) => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new(INVALID_JSON, e.to_string()),
            ),
            // Internal details stay in the log.
            QuoteError::DuplicateShipment(_)
            | QuoteError::Config(_)
            | QuoteError::Csv(_)
            | QuoteError::Io(_) => {
                tracing::error!(%error, "request failed");
                Self::internal_error()
            }
        }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::new(INVALID_JSON, rejection.body_text()),
        )
    }
}
