//! The `{success, data|error, meta}` wrapper every endpoint answers with.

use super::error::{ApiError, ApiErrorResponse};
use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::convert::Infallible;
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub meta: Meta,
}

/// Per-request identity and timing, extracted before the handler runs.
///
/// The id is taken from the caller's `x-request-id` header when present so
/// logs can be correlated across services; otherwise a fresh UUID is used.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    started: Instant,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            started: Instant::now(),
        }
    }

    fn meta(&self) -> Meta {
        Meta {
            request_id: self.request_id.clone(),
            timestamp: Utc::now(),
            processing_time_ms: u64::try_from(self.started.elapsed().as_millis())
                .unwrap_or(u64::MAX),
        }
    }

    /// Wraps a handler result in the envelope and picks the status code.
    pub fn respond<T: Serialize>(
        self,
        status: StatusCode,
        result: Result<T, ApiErrorResponse>,
    ) -> Response {
        let meta = self.meta();
        let header = [(REQUEST_ID_HEADER, self.request_id)];
        match result {
            Ok(data) => {
                let body = Envelope {
                    success: true,
                    data: Some(data),
                    error: None,
                    meta,
                };
                (status, header, Json(body)).into_response()
            }
            Err(failure) => {
                tracing::debug!(
                    request_id = %meta.request_id,
                    code = %failure.error.code,
                    status = failure.status.as_u16(),
                    "request failed"
                );
                let body: Envelope<()> = Envelope {
                    success: false,
                    data: None,
                    error: Some(failure.error),
                    meta,
                };
                (failure.status, header, Json(body)).into_response()
            }
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a caught handler panic into the standard 500 envelope.
pub fn render_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %message, "handler panicked");
    RequestContext::new().respond::<()>(
        StatusCode::INTERNAL_SERVER_ERROR,
        Err(ApiErrorResponse::internal_error()),
    )
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut context = Self::new();
        if let Some(id) = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= 128)
        {
            context.request_id = id.to_string();
        }
        Ok(context)
    }
}
