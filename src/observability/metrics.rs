//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_http_requests_total` (counter): requests by method, route, status
//! - `gateway_http_request_duration_seconds` (histogram): handler latency
//! - `gateway_backend_calls_total` (counter): backend calls by service, operation, outcome
//! - `gateway_status_relays_active` (gauge): open SSE status relays
//! - `gateway_chat_sessions_active` (gauge): open chat sessions
//!
//! Without an installed recorder every update is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const HTTP_REQUESTS_TOTAL: &str = "gateway_http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "gateway_http_request_duration_seconds";
pub const BACKEND_CALLS_TOTAL: &str = "gateway_backend_calls_total";
pub const STATUS_RELAYS_ACTIVE: &str = "gateway_status_relays_active";
pub const CHAT_SESSIONS_ACTIVE: &str = "gateway_chat_sessions_active";

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus metrics endpoint listening");
    Ok(())
}

/// Route-layer middleware recording one sample per request.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(method, route, response.status().as_u16(), start);
    response
}

pub fn record_request(method: String, route: String, status: u16, start: Instant) {
    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(HTTP_REQUEST_DURATION_SECONDS, "method" => method, "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_call(service: &'static str, operation: &'static str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    counter!(
        BACKEND_CALLS_TOTAL,
        "service" => service,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

pub fn relay_opened() {
    gauge!(STATUS_RELAYS_ACTIVE).increment(1.0);
}

pub fn relay_closed() {
    gauge!(STATUS_RELAYS_ACTIVE).decrement(1.0);
}

pub fn chat_session_opened() {
    gauge!(CHAT_SESSIONS_ACTIVE).increment(1.0);
}

pub fn chat_session_closed() {
    gauge!(CHAT_SESSIONS_ACTIVE).decrement(1.0);
}
