//! Travel gateway.
//!
//! Exposes flight search, hotel search, package search, checkout, live flight
//! status and support chat to browser clients over HTTP, Server-Sent Events
//! and WebSocket, backed by two gRPC services.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──HTTP/SSE/WS──▶ http ──▶ search / packages / checkout / monitor / chat
//!                                                   │
//!                                                   ▼
//!                                     backend (TravelBackend handles)
//!                                        │                     │
//!                                        ▼                     ▼
//!                               voos.VoosService      hotel.HotelService
//!
//!   Cross-cutting: config, observability, lifecycle, error
//! ```

// Core subsystems
pub mod backend;
pub mod chat;
pub mod checkout;
pub mod monitor;
pub mod packages;
pub mod search;

// Edge
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use backend::{Backends, TravelBackend};
pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
