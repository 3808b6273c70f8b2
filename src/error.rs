//! Crate-level error type returned by the gateway operations.

use thiserror::Error;

use crate::backend::BackendError;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request was rejected before any backend call.
    #[error("{0}")]
    Validation(String),

    #[error("Carrinho vazio")]
    EmptyCart,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
