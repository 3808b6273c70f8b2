//! Backend call clients.
//!
//! # Data Flow
//! ```text
//! gateway operation
//!     → TravelBackend (client.rs, one shared handle per service)
//!     → grpc.rs (criteria/items/envelopes → wire messages)
//!     → proto (tonic client over a lazily connected Channel)
//!     → voos.VoosService / hotel.HotelService
//! ```
//!
//! # Design Decisions
//! - Handles are built once at startup and injected, so tests swap in doubles
//! - Channels connect lazily; an unreachable service surfaces per call as `Unavailable`
//! - No retries at this layer

pub mod client;
pub mod grpc;
pub mod proto;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

pub use client::{FlightBackend, HotelBackend, TravelBackend};
pub use grpc::{GrpcFlightBackend, GrpcHotelBackend};
pub use types::{BackendError, BackendResult, EventStream};

use crate::config::BackendsConfig;

/// The two backend handles shared by every connection.
#[derive(Clone)]
pub struct Backends {
    pub flights: Arc<FlightBackend>,
    pub hotels: Arc<HotelBackend>,
}

impl Backends {
    pub fn new(flights: Arc<FlightBackend>, hotels: Arc<HotelBackend>) -> Self {
        Self { flights, hotels }
    }

    /// Creates lazily connected gRPC handles for the configured addresses.
    pub fn connect(config: &BackendsConfig) -> Result<Self, tonic::transport::Error> {
        let timeout = Duration::from_secs(config.connect_timeout_secs);
        let flights = grpc::lazy_channel(&config.flights, timeout)?;
        let hotels = grpc::lazy_channel(&config.hotels, timeout)?;

        tracing::info!(
            flights = %config.flights,
            hotels = %config.hotels,
            connect_timeout_secs = config.connect_timeout_secs,
            "Backend channels created"
        );

        Ok(Self {
            flights: Arc::new(GrpcFlightBackend::new(flights)),
            hotels: Arc::new(GrpcHotelBackend::new(hotels)),
        })
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("flights", &self.flights.service())
            .field("hotels", &self.hotels.service())
            .finish()
    }
}
