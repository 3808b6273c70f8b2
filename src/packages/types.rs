//! Package search body, criteria and composite offers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};
use crate::search::criteria::{check_count, parse_date};
use crate::search::types::{lenient_amount, Flight, FlightCriteria, Hotel, HotelCriteria, Stay};

/// Package search body as posted by the browser client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackageSearchRequest {
    pub origem: String,
    pub destino: String,
    pub data: String,
    pub data_volta: String,
    pub rooms: Option<u32>,
    pub guests: Option<u32>,
    pub flight_class: String,
    pub min_rating: Option<i64>,
    #[serde(deserialize_with = "lenient_amount")]
    pub max_budget: Option<f64>,
    pub datas_flexiveis: bool,
}

/// Parameters applied while pairing offers.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageTerms {
    /// Explicit trip start. Absent means "use the flight's departure date".
    pub start: Option<NaiveDate>,
    /// Explicit trip end. Absent means "start plus the default stay".
    pub end: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub rooms: u32,
    pub guests: u32,
}

impl Default for PackageTerms {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            budget: None,
            rooms: 1,
            guests: 1,
        }
    }
}

/// A validated package search: one flight search, one hotel search, and the pairing terms.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageCriteria {
    pub flights: FlightCriteria,
    pub hotels: HotelCriteria,
    pub terms: PackageTerms,
}

/// One flight plus one hotel, priced for the whole stay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageOffer {
    pub id: String,
    pub flight: Flight,
    pub hotel: Hotel,
    #[serde(flatten)]
    pub stay: Stay,
    pub total_price: f64,
    pub rooms: u32,
    pub guests: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageResults {
    pub packages: Vec<PackageOffer>,
}

impl PackageSearchRequest {
    pub fn into_criteria(self) -> GatewayResult<PackageCriteria> {
        let destination = self.destino.trim().to_string();
        if destination.is_empty() {
            return Err(GatewayError::validation("destino is required"));
        }

        let mut start = parse_date("data", &self.data)?;
        let mut end = parse_date("data_volta", &self.data_volta)?;
        if self.datas_flexiveis {
            start = None;
            end = None;
        }
        if let (Some(out), Some(back)) = (start, end) {
            if back <= out {
                return Err(GatewayError::validation("data_volta must be after data"));
            }
        }

        let budget = match self.max_budget {
            Some(b) if !b.is_finite() || b < 0.0 => {
                return Err(GatewayError::validation("max_budget must be a non-negative number"))
            }
            Some(b) if b == 0.0 => None,
            other => other,
        };
        let min_stars = match self.min_rating {
            None => 0,
            Some(n @ 0..=5) => n as u8,
            Some(_) => return Err(GatewayError::validation("min_rating must be between 0 and 5")),
        };
        let rooms = check_count("rooms", self.rooms)?;
        let guests = check_count("guests", self.guests)?;

        let mut flights = FlightCriteria::route(self.origem.trim(), destination.clone());
        flights.date = start;
        flights.cabin = Some(self.flight_class.trim().to_string()).filter(|c| !c.is_empty());
        flights.passengers = guests;

        let mut hotels = HotelCriteria::city(destination);
        hotels.checkin = start;
        hotels.checkout = end;
        hotels.rooms = rooms;
        hotels.guests = guests;
        hotels.min_stars = min_stars;

        Ok(PackageCriteria {
            flights,
            hotels,
            terms: PackageTerms {
                start,
                end,
                budget,
                rooms,
                guests,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: serde_json::Value) -> PackageSearchRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn destination_is_required() {
        let err = body(serde_json::json!({ "origem": "GRU" }))
            .into_criteria()
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn destination_drives_both_searches() {
        let criteria = body(serde_json::json!({
            "origem": "GRU",
            "destino": "Salvador",
            "data": "2025-06-01",
            "data_volta": "2025-06-05",
            "rooms": 2,
            "guests": 3,
            "flight_class": "executiva",
            "min_rating": 4
        }))
        .into_criteria()
        .unwrap();

        assert_eq!(criteria.flights.destination, "Salvador");
        assert_eq!(criteria.flights.cabin.as_deref(), Some("executiva"));
        assert_eq!(criteria.flights.passengers, 3);
        assert_eq!(criteria.hotels.city, "Salvador");
        assert_eq!(criteria.hotels.min_stars, 4);
        assert_eq!(criteria.hotels.rooms, 2);
        assert_eq!(criteria.terms.start, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(criteria.terms.end, NaiveDate::from_ymd_opt(2025, 6, 5));
    }

    #[test]
    fn zero_budget_means_no_budget() {
        let criteria = body(serde_json::json!({ "destino": "Recife", "max_budget": 0 }))
            .into_criteria()
            .unwrap();
        assert_eq!(criteria.terms.budget, None);

        let criteria = body(serde_json::json!({ "destino": "Recife", "max_budget": "2500" }))
            .into_criteria()
            .unwrap();
        assert_eq!(criteria.terms.budget, Some(2500.0));
    }

    #[test]
    fn flexible_dates_clear_trip_dates() {
        let criteria = body(serde_json::json!({
            "destino": "Natal",
            "data": "2025-06-01",
            "data_volta": "2025-06-05",
            "datas_flexiveis": true
        }))
        .into_criteria()
        .unwrap();
        assert_eq!(criteria.terms.start, None);
        assert_eq!(criteria.terms.end, None);
        assert_eq!(criteria.hotels.checkin, None);
    }

    #[test]
    fn flexible_dates_skip_date_order_check() {
        let stale = serde_json::json!({
            "destino": "Natal",
            "data": "2025-06-05",
            "data_volta": "2025-06-01"
        });
        assert!(body(stale.clone()).into_criteria().is_err());

        let mut flexible = stale;
        flexible["datas_flexiveis"] = serde_json::json!(true);
        let criteria = body(flexible).into_criteria().unwrap();
        assert_eq!(criteria.terms.start, None);
        assert_eq!(criteria.flights.date, None);
    }

    #[test]
    fn room_and_guest_counts_must_be_positive() {
        assert!(body(serde_json::json!({ "destino": "Natal", "rooms": 0 }))
            .into_criteria()
            .is_err());
        let criteria = body(serde_json::json!({ "destino": "Natal", "guests": 3 }))
            .into_criteria()
            .unwrap();
        assert_eq!(criteria.hotels.rooms, 1);
        assert_eq!(criteria.flights.passengers, 3);
    }
}
