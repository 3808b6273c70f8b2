//! Validation of search request bodies into immutable criteria.
//!
//! # Design Decisions
//! - Every check runs before a backend is contacted
//! - Empty strings mean "no filter", matching the browser form
//! - Flexible dates drop the date filter entirely

use chrono::NaiveDate;

use crate::error::{GatewayError, GatewayResult};
use crate::search::types::{
    FlightCriteria, FlightSearchRequest, FlightSort, HotelCriteria, HotelSearchRequest, HotelSort,
    TimeBand,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const ONE_WAY: &str = "oneway";

/// Parses an optional `YYYY-MM-DD` field. Blank means absent.
pub fn parse_date(field: &str, raw: &str) -> GatewayResult<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| GatewayError::validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn check_amount(field: &str, value: Option<f64>) -> GatewayResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(GatewayError::validation(format!(
            "{field} must be a non-negative number"
        ))),
        other => Ok(other),
    }
}

pub(crate) fn check_count(field: &str, value: Option<u32>) -> GatewayResult<u32> {
    match value {
        None => Ok(1),
        Some(0) => Err(GatewayError::validation(format!("{field} must be at least 1"))),
        Some(n) => Ok(n),
    }
}

impl FlightSearchRequest {
    pub fn into_criteria(self) -> GatewayResult<FlightCriteria> {
        let date = parse_date("data", &self.data)?;
        let mut return_date = parse_date("data_volta", &self.data_volta)?;

        if self.tipo_viagem == ONE_WAY {
            return_date = None;
        }
        let (date, return_date) = if self.datas_flexiveis {
            (None, None)
        } else {
            (date, return_date)
        };
        if let (Some(out), Some(back)) = (date, return_date) {
            if back <= out {
                return Err(GatewayError::validation("data_volta must be after data"));
            }
        }

        let time_band = match self.faixa_horario.trim() {
            "" => None,
            raw => Some(TimeBand::parse(raw).ok_or_else(|| {
                GatewayError::validation("faixa_horario must be one of manha, tarde, noite")
            })?),
        };
        let sort = FlightSort::parse(self.ordenacao.trim()).ok_or_else(|| {
            GatewayError::validation("ordenacao must be one of preco, horario, duracao")
        })?;

        Ok(FlightCriteria {
            origin: self.origem.trim().to_string(),
            destination: self.destino.trim().to_string(),
            date,
            return_date,
            max_price: check_amount("preco_max", self.preco_max)?,
            carrier: non_empty(&self.companhia_aerea),
            time_band,
            sort,
            cabin: non_empty(&self.classe),
            passengers: check_count("passageiros", self.passageiros)?,
        })
    }
}

impl HotelSearchRequest {
    pub fn into_criteria(self) -> GatewayResult<HotelCriteria> {
        let checkin = parse_date("checkin", &self.checkin)?;
        let checkout = parse_date("checkout", &self.checkout)?;
        let (checkin, checkout) = if self.datas_flexiveis {
            (None, None)
        } else {
            (checkin, checkout)
        };
        if let (Some(start), Some(end)) = (checkin, checkout) {
            if end <= start {
                return Err(GatewayError::validation("checkout must be after checkin"));
            }
        }

        let min_stars = match self.min_stars {
            None => 0,
            Some(n @ 0..=5) => n as u8,
            Some(_) => return Err(GatewayError::validation("min_stars must be between 0 and 5")),
        };
        let sort = HotelSort::parse(self.order_by.trim())
            .ok_or_else(|| GatewayError::validation("order_by must be one of price, rating"))?;

        Ok(HotelCriteria {
            city: self.city.trim().to_string(),
            checkin,
            checkout,
            rooms: check_count("rooms", self.rooms)?,
            guests: check_count("guests", self.guests)?,
            accommodation_type: non_empty(&self.accommodation_type),
            min_stars,
            max_price: check_amount("max_price", self.max_price)?,
            sort,
            delay_seconds: self.delay_seconds.unwrap_or(0),
        })
    }
}
