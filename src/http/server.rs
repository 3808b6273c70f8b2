//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, body limit, metrics)
//! - Bind server to listener
//! - Drain on the shutdown broadcast

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::backend::Backends;
use crate::chat::ChatMultiplexer;
use crate::config::GatewayConfig;
use crate::http::{checkout, health, monitor, request, search, websocket};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::packages::PackageLimits;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub backends: Backends,
    pub chat: ChatMultiplexer,
    pub package_limits: PackageLimits,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the given backend handles.
    pub fn new(config: GatewayConfig, backends: Backends) -> Self {
        let state = AppState {
            chat: ChatMultiplexer::new(backends.clone(), &config.chat),
            package_limits: config.packages.limits(),
            backends,
        };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let cors = if config.security.cors_permissive {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
        };

        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request::request_id(req),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(cors);

        Router::new()
            .route("/api/flights/search", post(search::search_flights))
            .route("/api/hotels/search", post(search::search_hotels))
            .route("/api/packages/search", post(search::search_packages))
            .route("/api/cart/checkout", post(checkout::checkout_cart))
            .route("/api/flights/monitor/{code}", get(monitor::monitor_flight))
            .route("/chat", get(websocket::chat))
            .route("/health", get(health::health))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .with_state(state)
            .layer(layers)
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

}
