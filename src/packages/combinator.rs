//! Pairing of flight and hotel offers into ranked packages.
//!
//! # Algorithm
//! 1. Keep the first `max_per_source` offers of each result set
//! 2. Date every (flight, hotel) pair and price it for the whole stay
//! 3. Drop pairs over budget
//! 4. Stable-sort ascending by total price and keep `max_results`

use chrono::{Days, NaiveDate};

use crate::packages::types::{PackageOffer, PackageTerms};
use crate::search::types::{Flight, Hotel, Stay};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Most offers taken from each result set.
pub const MAX_PER_SOURCE: usize = 5;
/// Most packages returned by one search.
pub const MAX_RESULTS: usize = 10;

/// Bounds applied by [`combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageLimits {
    pub max_per_source: usize,
    pub max_results: usize,
    /// Stay length used when no return date is known.
    pub default_stay_nights: u32,
}

impl Default for PackageLimits {
    fn default() -> Self {
        Self {
            max_per_source: MAX_PER_SOURCE,
            max_results: MAX_RESULTS,
            default_stay_nights: 3,
        }
    }
}

/// Builds the cheapest packages from two independent result sets.
///
/// Empty input on either side yields an empty list.
pub fn combine(
    flights: &[Flight],
    hotels: &[Hotel],
    terms: &PackageTerms,
    limits: &PackageLimits,
) -> Vec<PackageOffer> {
    let hotels = &hotels[..hotels.len().min(limits.max_per_source)];

    let mut offers: Vec<PackageOffer> = flights
        .iter()
        .take(limits.max_per_source)
        .flat_map(|flight| hotels.iter().map(move |hotel| (flight, hotel)))
        .filter_map(|(flight, hotel)| {
            let stay = stay_for(flight, terms, limits);
            let total_price = flight.preco + hotel.price * f64::from(stay.nights);
            if terms.budget.is_some_and(|budget| total_price > budget) {
                return None;
            }
            Some(PackageOffer {
                id: format!("{}-{}", flight.id, hotel.id),
                flight: Flight {
                    stay: Some(stay),
                    ..flight.clone()
                },
                hotel: Hotel {
                    stay: Some(stay),
                    ..hotel.clone()
                },
                stay,
                total_price,
                rooms: terms.rooms,
                guests: terms.guests,
            })
        })
        .collect();

    offers.sort_by(|a, b| a.total_price.total_cmp(&b.total_price));
    offers.truncate(limits.max_results);
    offers
}

/// Dates one pairing. An unparseable flight date counts as absent.
fn stay_for(flight: &Flight, terms: &PackageTerms, limits: &PackageLimits) -> Stay {
    let checkin = terms
        .start
        .or_else(|| NaiveDate::parse_from_str(flight.data.trim(), DATE_FORMAT).ok());
    let checkout = terms.end.or_else(|| {
        checkin.and_then(|day| day.checked_add_days(Days::new(u64::from(limits.default_stay_nights))))
    });
    let nights = match (checkin, checkout) {
        (Some(start), Some(end)) => u32::try_from((end - start).num_days().max(1)).unwrap_or(u32::MAX),
        _ => 1,
    };
    Stay {
        checkin,
        checkout,
        nights,
    }
}
