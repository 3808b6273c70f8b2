//! Server-Sent Events for live flight status.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::{Stream, StreamExt};
use serde_json::json;

use crate::http::server::AppState;
use crate::monitor::{RelayEvent, StatusRelay};

/// `GET /api/flights/monitor/{code}`
///
/// The relay lives exactly as long as the response stream, so a client
/// disconnect drops it and cancels the backend call.
pub async fn monitor_flight(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!(code = %code, "Flight monitor requested");
    let relay = StatusRelay::open(state.backends.flights.clone(), code);
    Sse::new(relay.map(|event| Ok(sse_event(event)))).keep_alive(KeepAlive::default())
}

fn error_event(message: &str) -> Event {
    Event::default()
        .event("error")
        .data(json!({ "error": message }).to_string())
}

fn sse_event(event: RelayEvent) -> Event {
    match event {
        RelayEvent::Update(update) => Event::default()
            .json_data(&update)
            .unwrap_or_else(|err| error_event(&err.to_string())),
        RelayEvent::Error { message } => error_event(&message),
    }
}
