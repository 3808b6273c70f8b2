//! Flight, hotel and package search handlers.

use axum::extract::State;
use axum::Json;

use crate::error::GatewayResult;
use crate::http::request::ApiJson;
use crate::http::server::AppState;
use crate::packages::{self, PackageResults, PackageSearchRequest};
use crate::search::{FlightResults, FlightSearchRequest, HotelResults, HotelSearchRequest};

/// `POST /api/flights/search`
pub async fn search_flights(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<FlightSearchRequest>,
) -> GatewayResult<Json<FlightResults>> {
    let criteria = body.into_criteria()?;
    tracing::debug!(origin = %criteria.origin, destination = %criteria.destination, "Flight search");
    let results = state.backends.flights.search(criteria).await?;
    Ok(Json(results))
}

/// `POST /api/hotels/search`
pub async fn search_hotels(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<HotelSearchRequest>,
) -> GatewayResult<Json<HotelResults>> {
    let criteria = body.into_criteria()?;
    tracing::debug!(city = %criteria.city, "Hotel search");
    let results = state.backends.hotels.search(criteria).await?;
    Ok(Json(results))
}

/// `POST /api/packages/search`
pub async fn search_packages(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PackageSearchRequest>,
) -> GatewayResult<Json<PackageResults>> {
    let criteria = body.into_criteria()?;
    let packages =
        packages::search_packages(&state.backends, criteria, &state.package_limits).await?;
    Ok(Json(PackageResults { packages }))
}
