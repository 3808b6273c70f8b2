//! Flight + hotel packages.
//!
//! # Data Flow
//! ```text
//! PackageSearchRequest
//!     → types.rs (validation → PackageCriteria)
//!     → search.rs (flight search ∥ hotel search, join semantics)
//!     → combinator.rs (pair, price, budget filter, rank)
//!     → PackageOffer[] (top N, ascending total price)
//! ```
//!
//! # Design Decisions
//! - The combinator is a pure function; it never calls a backend
//! - An empty result is a valid answer, not an error

pub mod combinator;
pub mod search;
pub mod types;

pub use combinator::{combine, PackageLimits};
pub use search::search_packages;
pub use types::{PackageCriteria, PackageOffer, PackageResults, PackageSearchRequest, PackageTerms};
