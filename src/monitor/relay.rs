//! Status relay: one server-streaming backend call exposed as a push stream.
//!
//! # State Machine
//! ```text
//! Opening ──ok──▶ Relaying ──finalizado / end / error──▶ Closed
//!    │                                                     ▲
//!    └────────────────────open failed─────────────────────┘
//! ```
//! Dropping the relay in any state other than `Closed` cancels the backend call.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::{ready, FutureExt, Stream, StreamExt};

use crate::backend::{BackendResult, EventStream, FlightBackend};
use crate::monitor::types::MonitorEvent;
use crate::observability::metrics;

/// One item pushed to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    Update(MonitorEvent),
    /// Synthetic event sent once before the relay closes on a backend failure.
    Error { message: String },
}

enum RelayState {
    Opening(BoxFuture<'static, BackendResult<EventStream<MonitorEvent>>>),
    Relaying(EventStream<MonitorEvent>),
    Closed,
}

/// Owns exactly one status call for one client connection.
pub struct StatusRelay {
    backend: Arc<FlightBackend>,
    code: String,
    state: RelayState,
}

impl StatusRelay {
    /// Starts monitoring `code`. The backend call is opened on first poll.
    pub fn open(backend: Arc<FlightBackend>, code: impl Into<String>) -> Self {
        let code = code.into();
        metrics::relay_opened();
        tracing::debug!(code = %code, "Status relay opened");
        let state = RelayState::Opening(Self::call(&backend, &code));
        Self {
            backend,
            code,
            state,
        }
    }

    /// Replaces the active call with one for `code`. The previous call is cancelled.
    pub fn restart(&mut self, code: impl Into<String>) {
        let code = code.into();
        if !self.is_closed() {
            tracing::debug!(previous = %self.code, code = %code, "Replacing active status relay");
        }
        self.state = RelayState::Opening(Self::call(&self.backend, &code));
        self.code = code;
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, RelayState::Closed)
    }

    fn call(
        backend: &Arc<FlightBackend>,
        code: &str,
    ) -> BoxFuture<'static, BackendResult<EventStream<MonitorEvent>>> {
        let backend = Arc::clone(backend);
        let code = code.to_string();
        Box::pin(async move { backend.stream_status(code).await })
    }

    fn fail(&mut self, message: String) -> Poll<Option<RelayEvent>> {
        self.state = RelayState::Closed;
        tracing::warn!(code = %self.code, error = %message, "Status relay closed on backend error");
        Poll::Ready(Some(RelayEvent::Error { message }))
    }
}

impl Stream for StatusRelay {
    type Item = RelayEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<RelayEvent>> {
        let this = &mut *self;
        loop {
            match &mut this.state {
                RelayState::Opening(call) => match ready!(call.poll_unpin(cx)) {
                    Ok(updates) => this.state = RelayState::Relaying(updates),
                    Err(err) => return this.fail(err.to_string()),
                },
                RelayState::Relaying(updates) => {
                    return match ready!(updates.poll_next_unpin(cx)) {
                        Some(Ok(event)) => {
                            if event.is_terminal() {
                                // Dropping the stream here cancels the call.
                                this.state = RelayState::Closed;
                                tracing::info!(code = %this.code, "Flight finalized, status relay closed");
                            }
                            Poll::Ready(Some(RelayEvent::Update(event)))
                        }
                        Some(Err(err)) => this.fail(err.to_string()),
                        None => {
                            this.state = RelayState::Closed;
                            tracing::debug!(code = %this.code, "Status stream ended");
                            Poll::Ready(None)
                        }
                    };
                }
                RelayState::Closed => return Poll::Ready(None),
            }
        }
    }
}

impl Drop for StatusRelay {
    fn drop(&mut self) {
        if !self.is_closed() {
            tracing::info!(code = %self.code, "Client disconnected, cancelling status stream");
        }
        metrics::relay_closed();
    }
}
