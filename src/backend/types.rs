//! Backend error type and stream aliases.

use futures_util::stream::BoxStream;
use thiserror::Error;

/// Failure of a call to one of the backend services.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The service could not be reached or dropped the call.
    #[error("{service} unavailable during {operation}: {message}")]
    Unavailable {
        service: &'static str,
        operation: &'static str,
        message: String,
    },

    /// The service answered with a non-OK status.
    #[error("{service} rejected {operation} ({code:?}): {message}")]
    Rejected {
        service: &'static str,
        operation: &'static str,
        code: tonic::Code,
        message: String,
    },
}

impl BackendError {
    pub fn unavailable(
        service: &'static str,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Unavailable {
            service,
            operation,
            message: message.into(),
        }
    }

    /// Classifies a gRPC status. Connectivity failures become `Unavailable`.
    pub fn from_status(service: &'static str, operation: &'static str, status: &tonic::Status) -> Self {
        match status.code() {
            tonic::Code::Unavailable | tonic::Code::DeadlineExceeded | tonic::Code::Cancelled => {
                Self::unavailable(service, operation, status.message())
            }
            code => Self::Rejected {
                service,
                operation,
                code,
                message: status.message().to_string(),
            },
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    pub fn service(&self) -> &'static str {
        match self {
            Self::Unavailable { service, .. } | Self::Rejected { service, .. } => service,
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Stream of items received from a backend call.
pub type EventStream<T> = BoxStream<'static, BackendResult<T>>;
