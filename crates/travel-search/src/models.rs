//! Search parameter models with validated constructors.
//!
//! Constructors take the raw query-string values and either return a
//! well-formed params struct or an [`TravelSearchError::InvalidParams`]
//! naming the offending field. Providers can assume every struct they
//! receive has already passed these checks.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TravelSearchError;

const DEFAULT_RADIUS_KM: u32 = 20;

/// Cabin class for flight searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl TravelClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelClass::Economy => "ECONOMY",
            TravelClass::PremiumEconomy => "PREMIUM_ECONOMY",
            TravelClass::Business => "BUSINESS",
            TravelClass::First => "FIRST",
        }
    }
}

impl FromStr for TravelClass {
    type Err = TravelSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ECONOMY" => Ok(TravelClass::Economy),
            "PREMIUM_ECONOMY" => Ok(TravelClass::PremiumEconomy),
            "BUSINESS" => Ok(TravelClass::Business),
            "FIRST" => Ok(TravelClass::First),
            other => Err(TravelSearchError::InvalidParams(format!(
                "travelClass must be a valid cabin class, got '{}'",
                other
            ))),
        }
    }
}

/// Validated flight offer search.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearchParams {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub adults: u32,
    pub travel_class: TravelClass,
    pub airline: Option<String>,
}

impl FlightSearchParams {
    pub fn new(
        origin: &str,
        destination: &str,
        departure_date: &str,
        return_date: Option<&str>,
        adults: Option<&str>,
        travel_class: Option<&str>,
        airline: Option<&str>,
    ) -> Result<Self, TravelSearchError> {
        Ok(FlightSearchParams {
            origin: validate_city_code(origin, "origin")?,
            destination: validate_city_code(destination, "destination")?,
            departure_date: validate_date(departure_date, "departureDate")?,
            return_date: return_date
                .map(|d| validate_date(d, "returnDate"))
                .transpose()?,
            adults: validate_int_in_range(adults.unwrap_or("1"), "adults", 1, 30)?,
            travel_class: travel_class.unwrap_or("ECONOMY").parse()?,
            airline: airline.map(|a| a.trim().to_ascii_uppercase()),
        })
    }
}

/// Validated hotel offer search.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelSearchParams {
    pub city_code: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub adults: u32,
    pub room_quantity: u32,
}

impl HotelSearchParams {
    pub fn new(
        city_code: &str,
        check_in_date: &str,
        check_out_date: &str,
        adults: Option<&str>,
        room_quantity: Option<&str>,
    ) -> Result<Self, TravelSearchError> {
        Ok(HotelSearchParams {
            city_code: validate_city_code(city_code, "cityCode")?,
            check_in_date: validate_date(check_in_date, "checkInDate")?,
            check_out_date: validate_date(check_out_date, "checkOutDate")?,
            adults: validate_int_in_range(adults.unwrap_or("1"), "adults", 1, 30)?,
            room_quantity: validate_int_in_range(
                room_quantity.unwrap_or("1"),
                "roomQuantity",
                1,
                10,
            )?,
        })
    }
}

/// Validated points-of-interest activity search.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySearchParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: u32,
}

impl ActivitySearchParams {
    pub fn new(
        latitude: &str,
        longitude: &str,
        radius: Option<&str>,
    ) -> Result<Self, TravelSearchError> {
        Ok(ActivitySearchParams {
            latitude: validate_coordinate(latitude, "latitude", 90.0)?,
            longitude: validate_coordinate(longitude, "longitude", 180.0)?,
            radius_km: match radius {
                // Empty string and absent both fall back to the default.
                None => DEFAULT_RADIUS_KM,
                Some(raw) if raw.trim().is_empty() => DEFAULT_RADIUS_KM,
                Some(raw) => validate_int_in_range(raw, "radius", 1, 100)?,
            },
        })
    }
}

/// The provider's answer, passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub data: Value,
    #[serde(default)]
    pub meta: Value,
}

fn validate_city_code(raw: &str, field: &str) -> Result<String, TravelSearchError> {
    let code = raw.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(TravelSearchError::InvalidParams(format!(
            "{} must be exactly 3 letters",
            field
        )));
    }
    Ok(code.to_ascii_uppercase())
}

fn validate_date(raw: &str, field: &str) -> Result<String, TravelSearchError> {
    let value = raw.trim();
    let shape_ok = value.len() == 10
        && value
            .chars()
            .enumerate()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !shape_ok {
        return Err(TravelSearchError::InvalidParams(format!(
            "{} must be in YYYY-MM-DD format",
            field
        )));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        TravelSearchError::InvalidParams(format!("{} is not a valid date", field))
    })?;
    Ok(value.to_string())
}

fn validate_int_in_range(
    raw: &str,
    field: &str,
    min: u32,
    max: u32,
) -> Result<u32, TravelSearchError> {
    let value: u32 = raw.trim().parse().map_err(|_| {
        TravelSearchError::InvalidParams(format!("{} must be a valid integer", field))
    })?;
    if value < min || value > max {
        return Err(TravelSearchError::InvalidParams(format!(
            "{} must be between {} and {}",
            field, min, max
        )));
    }
    Ok(value)
}

fn validate_coordinate(raw: &str, field: &str, bound: f64) -> Result<f64, TravelSearchError> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        TravelSearchError::InvalidParams(format!("{} must be a valid number", field))
    })?;
    if !value.is_finite() || value < -bound || value > bound {
        return Err(TravelSearchError::InvalidParams(format!(
            "{} must be between -{} and {}",
            field, bound, bound
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_params_uppercase_codes_and_default_adults() {
        let params =
            FlightSearchParams::new("cdg", "jfk", "2025-10-01", None, None, None, Some("af"))
                .unwrap();
        assert_eq!(params.origin, "CDG");
        assert_eq!(params.destination, "JFK");
        assert_eq!(params.adults, 1);
        assert_eq!(params.travel_class, TravelClass::Economy);
        assert_eq!(params.airline.as_deref(), Some("AF"));
        assert!(params.return_date.is_none());
    }

    #[test]
    fn flight_params_reject_bad_city_code() {
        let err = FlightSearchParams::new("CDGX", "JFK", "2025-10-01", None, None, None, None)
            .unwrap_err();
        assert!(matches!(err, TravelSearchError::InvalidParams(_)));

        let err = FlightSearchParams::new("C1G", "JFK", "2025-10-01", None, None, None, None)
            .unwrap_err();
        assert!(matches!(err, TravelSearchError::InvalidParams(_)));
    }

    #[test]
    fn flight_params_reject_impossible_date() {
        let err = FlightSearchParams::new("CDG", "JFK", "2025-02-30", None, None, None, None)
            .unwrap_err();
        assert!(matches!(err, TravelSearchError::InvalidParams(_)));

        let err = FlightSearchParams::new("CDG", "JFK", "01-10-2025", None, None, None, None)
            .unwrap_err();
        assert!(matches!(err, TravelSearchError::InvalidParams(_)));
    }

    #[test]
    fn travel_class_parses_case_insensitively() {
        assert_eq!(
            "premium_economy".parse::<TravelClass>().unwrap(),
            TravelClass::PremiumEconomy
        );
        assert!("COACH".parse::<TravelClass>().is_err());
    }

    #[test]
    fn hotel_params_enforce_room_and_adult_ranges() {
        let params = HotelSearchParams::new("PAR", "2025-10-01", "2025-10-05", Some("2"), Some("1"))
            .unwrap();
        assert_eq!(params.adults, 2);

        assert!(
            HotelSearchParams::new("PAR", "2025-10-01", "2025-10-05", Some("31"), None).is_err()
        );
        assert!(
            HotelSearchParams::new("PAR", "2025-10-01", "2025-10-05", None, Some("11")).is_err()
        );
        assert!(
            HotelSearchParams::new("PAR", "2025-10-01", "2025-10-05", Some("0"), None).is_err()
        );
    }

    #[test]
    fn activity_params_bound_coordinates_and_default_radius() {
        let params = ActivitySearchParams::new("48.8584", "2.2945", None).unwrap();
        assert_eq!(params.radius_km, 20);

        let params = ActivitySearchParams::new("48.8584", "2.2945", Some("")).unwrap();
        assert_eq!(params.radius_km, 20);

        assert!(ActivitySearchParams::new("91.0", "2.2945", None).is_err());
        assert!(ActivitySearchParams::new("48.8584", "-180.5", None).is_err());
        assert!(ActivitySearchParams::new("48.8584", "2.2945", Some("0")).is_err());
        assert!(ActivitySearchParams::new("48.8584", "2.2945", Some("101")).is_err());
    }
}
