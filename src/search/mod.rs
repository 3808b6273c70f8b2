//! Flight and hotel search.
//!
//! # Data Flow
//! ```text
//! POST body (JSON)
//!     → types.rs (FlightSearchRequest / HotelSearchRequest)
//!     → criteria.rs (validation → FlightCriteria / HotelCriteria)
//!     → backend search call (unary)
//!     → FlightResults / HotelResults (pass-through offers)
//! ```

pub mod criteria;
pub mod types;

pub use types::{
    Flight, FlightCriteria, FlightResults, FlightSearchRequest, FlightSort, Hotel, HotelCriteria,
    HotelResults, HotelSearchRequest, HotelSort, Stay, TimeBand,
};
