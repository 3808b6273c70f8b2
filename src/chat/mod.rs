//! Support chat.
//!
//! # Data Flow
//! ```text
//! WebSocket /chat
//!     → ChatMultiplexer::open (multiplexer.rs)
//!         ├── flight leg: mpsc → FlightBackend::open_chat → replies tagged `voo`
//!         └── hotel leg:  mpsc → HotelBackend::open_chat  → replies tagged `hotel`
//!     → inbound text → classifier.rs → route to one or both legs
//!     → outbound queue (greeting + merged replies) → WebSocket
//! ```

pub mod classifier;
pub mod multiplexer;
pub mod types;

pub use classifier::classify;
pub use multiplexer::{ChatMultiplexer, ChatSession};
pub use types::{BackendReply, ChatContext, ChatEnvelope, ClientMessage};
