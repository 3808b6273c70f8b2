//! Live flight status.
//!
//! # Data Flow
//! ```text
//! GET /api/flights/monitor/{code}
//!     → StatusRelay::open (relay.rs, one per SSE connection)
//!     → FlightBackend::stream_status (server-streaming call)
//!     → RelayEvent per update → SSE `data:` frame
//!     → close on finalizado, stream end, error, or client disconnect
//! ```

pub mod relay;
pub mod types;

pub use relay::{RelayEvent, StatusRelay};
pub use types::{FlightStatus, MonitorEvent};
