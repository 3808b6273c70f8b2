//! Request extraction.
//!
//! # Responsibilities
//! - Deserialize JSON bodies into request types
//! - Turn body rejections into `{"error": ...}` client errors
//! - Read the request ID set by the request-id layer
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (outermost layer)

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::HeaderName;
use axum::Json;

use crate::error::GatewayError;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// JSON body whose rejection is reported as a validation error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(GatewayError::validation(rejection.body_text())),
        }
    }
}

/// The request ID header, or `"unknown"` when absent.
pub fn request_id(request: &axum::http::Request<Body>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
