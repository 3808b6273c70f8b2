//! The call contract shared by both backend services.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::backend::types::{BackendResult, EventStream};
use crate::chat::types::{BackendReply, ChatEnvelope};
use crate::checkout::types::{CartItem, PurchaseSummary};
use crate::monitor::types::MonitorEvent;
use crate::search::types::{FlightCriteria, FlightResults, HotelCriteria, HotelResults};

/// Handle to one backend service.
///
/// A single handle is shared by every connection. It keeps no per-call state,
/// so calls on the same handle may run concurrently. Dropping a returned
/// stream cancels the underlying call.
#[async_trait]
pub trait TravelBackend: Send + Sync {
    type Criteria: Send + 'static;
    type Results: Send + 'static;

    /// Service name used in logs and errors.
    fn service(&self) -> &'static str;

    /// Unary search.
    async fn search(&self, criteria: Self::Criteria) -> BackendResult<Self::Results>;

    /// Server-streaming status updates for a flight or reservation code.
    async fn stream_status(&self, code: String) -> BackendResult<EventStream<MonitorEvent>>;

    /// Client-streaming checkout. Every item of `items` is written in order;
    /// the end of the stream is the end-of-input signal.
    async fn stream_checkout(
        &self,
        items: BoxStream<'static, CartItem>,
    ) -> BackendResult<PurchaseSummary>;

    /// Bidirectional chat. Ending `outbound` half-closes the call while
    /// replies keep flowing until the backend finishes.
    async fn open_chat(
        &self,
        outbound: BoxStream<'static, ChatEnvelope>,
    ) -> BackendResult<EventStream<BackendReply>>;
}

pub type FlightBackend = dyn TravelBackend<Criteria = FlightCriteria, Results = FlightResults>;
pub type HotelBackend = dyn TravelBackend<Criteria = HotelCriteria, Results = HotelResults>;
