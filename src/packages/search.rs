//! Package search: both backend searches concurrently, then pairing.

use crate::backend::Backends;
use crate::error::GatewayResult;
use crate::packages::combinator::{combine, PackageLimits};
use crate::packages::types::{PackageCriteria, PackageOffer};

/// Runs the flight and hotel searches concurrently and combines the results.
///
/// The first failing search fails the whole request.
pub async fn search_packages(
    backends: &Backends,
    criteria: PackageCriteria,
    limits: &PackageLimits,
) -> GatewayResult<Vec<PackageOffer>> {
    let PackageCriteria {
        flights,
        hotels,
        terms,
    } = criteria;
    let destination = hotels.city.clone();

    let (flight_results, hotel_results) = tokio::try_join!(
        backends.flights.search(flights),
        backends.hotels.search(hotels),
    )?;

    let offers = combine(&flight_results.voos, &hotel_results.hotels, &terms, limits);
    tracing::debug!(
        destination = %destination,
        flights = flight_results.voos.len(),
        hotels = hotel_results.hotels.len(),
        packages = offers.len(),
        "Packages combined"
    );
    Ok(offers)
}
