//! Cart checkout.
//!
//! # Data Flow
//! ```text
//! POST /api/cart/checkout {items}
//!     → aggregator.rs (reject empty cart)
//!     → HotelBackend::stream_checkout (client-streaming, one message per item)
//!     → end-of-input → single PurchaseSummary
//! ```

pub mod aggregator;
pub mod types;

pub use aggregator::checkout;
pub use types::{CartItem, CheckoutRequest, ItemCode, PurchaseSummary};
