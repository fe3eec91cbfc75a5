use crate::application::rules::ValidationResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single schema violation, reported against the JSON path of the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("schema validation failed with {} field error(s)", .0.len())]
    Schema(Vec<FieldError>),
    #[error("business rules failed with {} violation(s)", .0.errors.len())]
    BusinessRules(ValidationResult),
    #[error("payment declined: {reason}")]
    PaymentDeclined { reason: String },
    #[error("transaction {0} is confirmed and can no longer change")]
    TransactionFinalized(String),
    #[error("shipment {0} not found")]
    NotFound(String),
    #[error("shipment {0} is already recorded")]
    DuplicateShipment(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuoteError {
    pub fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema(vec![FieldError::new(field, message)])
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
