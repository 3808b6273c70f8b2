//! Search request bodies, validated criteria and result sets.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};

/// Flight search body as posted by the browser client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlightSearchRequest {
    pub origem: String,
    pub destino: String,
    pub data: String,
    pub data_volta: String,
    pub passageiros: Option<u32>,
    pub classe: String,
    pub companhia_aerea: String,
    pub faixa_horario: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub preco_max: Option<f64>,
    pub ordenacao: String,
    pub tipo_viagem: String,
    pub datas_flexiveis: bool,
}

/// Hotel search body as posted by the browser client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HotelSearchRequest {
    pub city: String,
    pub checkin: String,
    pub checkout: String,
    pub rooms: Option<u32>,
    pub guests: Option<u32>,
    pub accommodation_type: String,
    pub min_stars: Option<i64>,
    #[serde(deserialize_with = "lenient_amount")]
    pub max_price: Option<f64>,
    pub order_by: String,
    pub datas_flexiveis: bool,
    pub delay_seconds: Option<u32>,
}

/// Departure time-of-day band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBand {
    Morning,
    Afternoon,
    Evening,
}

impl TimeBand {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "manha" => Some(Self::Morning),
            "tarde" => Some(Self::Afternoon),
            "noite" => Some(Self::Evening),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Morning => "manha",
            Self::Afternoon => "tarde",
            Self::Evening => "noite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightSort {
    #[default]
    Price,
    DepartureTime,
    Duration,
}

impl FlightSort {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "" | "preco" => Some(Self::Price),
            "horario" => Some(Self::DepartureTime),
            "duracao" => Some(Self::Duration),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Price => "preco",
            Self::DepartureTime => "horario",
            Self::Duration => "duracao",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HotelSort {
    #[default]
    Price,
    Rating,
}

impl HotelSort {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "" | "price" => Some(Self::Price),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Rating => "rating",
        }
    }
}

/// Validated flight filter. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightCriteria {
    pub origin: String,
    pub destination: String,
    /// Absent when the client asked for flexible dates.
    pub date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub max_price: Option<f64>,
    pub carrier: Option<String>,
    pub time_band: Option<TimeBand>,
    pub sort: FlightSort,
    pub cabin: Option<String>,
    pub passengers: u32,
}

impl FlightCriteria {
    /// Criteria matching every flight between two cities.
    pub fn route(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            date: None,
            return_date: None,
            max_price: None,
            carrier: None,
            time_band: None,
            sort: FlightSort::Price,
            cabin: None,
            passengers: 1,
        }
    }
}

/// Validated hotel filter.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelCriteria {
    pub city: String,
    pub checkin: Option<NaiveDate>,
    pub checkout: Option<NaiveDate>,
    pub rooms: u32,
    pub guests: u32,
    pub accommodation_type: Option<String>,
    pub min_stars: u8,
    pub max_price: Option<f64>,
    pub sort: HotelSort,
    pub delay_seconds: u32,
}

impl HotelCriteria {
    /// Criteria matching every hotel in a city.
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            checkin: None,
            checkout: None,
            rooms: 1,
            guests: 1,
            accommodation_type: None,
            min_stars: 0,
            max_price: None,
            sort: HotelSort::Price,
            delay_seconds: 0,
        }
    }
}

/// Stay dates attached to offers that were combined into a package.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stay {
    pub checkin: Option<NaiveDate>,
    pub checkout: Option<NaiveDate>,
    pub nights: u32,
}

/// A flight offer. Fields are passed through from the flight backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flight {
    pub id: String,
    pub origem: String,
    pub destino: String,
    pub data: String,
    pub horario_partida: String,
    pub horario_chegada: String,
    pub preco: f64,
    pub companhia_aerea: String,
    pub numero_voo: String,
    pub assentos_disponiveis: i32,
    pub status: String,
    pub classe_economica: String,
    pub aeronave: String,
    pub duracao_minutos: i32,
    #[serde(flatten)]
    pub stay: Option<Stay>,
}

/// A hotel offer. `price` is the nightly price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub city: String,
    pub stars: i32,
    pub price: f64,
    pub available: bool,
    pub amenities: Vec<String>,
    pub accommodation_type: String,
    #[serde(flatten)]
    pub stay: Option<Stay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightResults {
    pub voos: Vec<Flight>,
    pub total_encontrados: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo_processamento: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelResults {
    pub hotels: Vec<Hotel>,
    pub has_availability: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

/// Accepts a number, a numeric string, an empty string or null.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Amount::Number(n)) => Ok(Some(n)),
        Some(Amount::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Amount::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid amount: {s:?}"))),
    }
}
