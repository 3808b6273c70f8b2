//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, JSON extraction)
//!     → search.rs / checkout.rs   (request/response)
//!     → monitor.rs                (Server-Sent Events)
//!     → websocket.rs              (chat)
//!     → response.rs (errors → status + {"error": ...})
//! ```

pub mod checkout;
pub mod health;
pub mod monitor;
pub mod request;
pub mod response;
pub mod search;
pub mod server;
pub mod websocket;

pub use request::{ApiJson, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
