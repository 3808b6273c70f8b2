//! Error responses.
//!
//! # Responsibilities
//! - Map gateway errors to HTTP status codes
//! - Render every error as `{"error": "<message>"}`
//!
//! # Status Mapping
//! - validation failure, empty cart → 400
//! - backend unavailable → 503
//! - backend rejected the call → 502

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::backend::BackendError;
use crate::error::GatewayError;

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) | GatewayError::EmptyCart => StatusCode::BAD_REQUEST,
            GatewayError::Backend(err) if err.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message shown to the client. Backend internals stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Backend(BackendError::Unavailable { service, .. }) => {
                format!("Service unavailable: {service}")
            }
            GatewayError::Backend(BackendError::Rejected {
                service, message, ..
            }) => format!("Request rejected by {service}: {message}"),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
