//! Derivation of scheduled-activity fields from proposal payloads.
//!
//! Proposal payloads are arbitrary category-specific JSON submitted by
//! members, so every accessor here is tolerant: a missing or malformed
//! field falls through to the next source in its priority chain instead of
//! failing the conversion.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::proposals_model::{Proposal, ProposalCategory};
use crate::schedule::NewScheduledActivity;
use crate::trips::Trip;

/// Derives the activity row to insert for an accepted proposal.
///
/// Location resolution priority: explicit `city`/`country` fields, then a
/// structured `location` object, then comma-splitting a free-form `address`
/// (last segment country, segment before it city), then the trip's own
/// destination metadata, then the literal `"Unknown"`.
pub fn derive_activity(proposal: &Proposal, trip: &Trip) -> NewScheduledActivity {
    let payload = &proposal.payload;
    let (city, country) = resolve_location(payload, trip);
    let (start_time, end_time) = resolve_times(payload, proposal.category);

    NewScheduledActivity {
        trip_id: proposal.trip_id.clone(),
        name: resolve_name(payload, proposal.category),
        description: get_str(payload, &["description", "notes"]),
        start_time,
        end_time,
        location_city: city,
        location_country: country,
        cost: resolve_cost(payload),
        currency: get_str(payload, &["currency"]),
        max_capacity: resolve_capacity(payload, proposal.category),
        created_by: proposal.created_by.clone(),
    }
}

fn resolve_name(payload: &Value, category: ProposalCategory) -> String {
    if let Some(name) = get_str(payload, &["name", "title"]) {
        return name;
    }
    match category {
        ProposalCategory::Restaurant => get_str(payload, &["restaurantName"])
            .map(|n| format!("Dinner at {}", n))
            .unwrap_or_else(|| "Restaurant reservation".to_string()),
        ProposalCategory::Flight => {
            let airline = get_str(payload, &["airline"]);
            let number = get_str(payload, &["flightNumber"]);
            match (airline, number) {
                (Some(a), Some(n)) => format!("Flight {} {}", a, n),
                _ => match (
                    get_str(payload, &["origin"]),
                    get_str(payload, &["destination"]),
                ) {
                    (Some(o), Some(d)) => format!("Flight {} to {}", o, d),
                    _ => "Flight".to_string(),
                },
            }
        }
        ProposalCategory::Hotel => get_str(payload, &["hotelName"])
            .map(|n| format!("Stay at {}", n))
            .unwrap_or_else(|| "Hotel stay".to_string()),
        ProposalCategory::Activity => {
            get_str(payload, &["activityName"]).unwrap_or_else(|| "Group activity".to_string())
        }
    }
}

fn resolve_location(payload: &Value, trip: &Trip) -> (Option<String>, Option<String>) {
    // 1. Explicit top-level fields.
    let city = get_str(payload, &["city"]);
    let country = get_str(payload, &["country"]);
    if city.is_some() || country.is_some() {
        return (city.or_else(|| unknown()), country);
    }

    // 2. Structured location object.
    if let Some(location) = payload.get("location").filter(|l| l.is_object()) {
        let city = get_str(location, &["city"]);
        let country = get_str(location, &["country"]);
        if city.is_some() || country.is_some() {
            return (city.or_else(|| unknown()), country);
        }
    }

    // 3. Free-form address: "venue, city, country".
    if let Some(address) = get_str(payload, &["address"]) {
        let segments: Vec<&str> = address
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        match segments.as_slice() {
            [] => {}
            [only] => return (Some((*only).to_string()), None),
            [.., city, country] => {
                return (Some((*city).to_string()), Some((*country).to_string()))
            }
        }
    }

    // 4. Trip destination metadata.
    if trip.destination_city.is_some() || trip.destination_country.is_some() {
        return (
            trip.destination_city.clone().or_else(|| unknown()),
            trip.destination_country.clone(),
        );
    }

    // 5. Literal fallback.
    (unknown(), None)
}

fn unknown() -> Option<String> {
    Some("Unknown".to_string())
}

fn resolve_times(
    payload: &Value,
    category: ProposalCategory,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let (start_keys, end_keys): (&[&str], &[&str]) = match category {
        ProposalCategory::Restaurant => (&["startTime", "reservationTime"], &["endTime"]),
        ProposalCategory::Flight => (
            &["startTime", "departureTime"],
            &["endTime", "arrivalTime"],
        ),
        ProposalCategory::Hotel => (
            &["startTime", "checkInDate"],
            &["endTime", "checkOutDate"],
        ),
        ProposalCategory::Activity => (&["startTime"], &["endTime"]),
    };
    (
        first_datetime(payload, start_keys),
        first_datetime(payload, end_keys),
    )
}

fn first_datetime(payload: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter()
        .filter_map(|k| get_str(payload, &[k]))
        .find_map(|raw| parse_datetime(&raw))
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM[:SS]`, and bare
/// dates (interpreted as midnight UTC).
fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

fn resolve_cost(payload: &Value) -> Option<Decimal> {
    for key in ["cost", "price"] {
        match payload.get(key) {
            Some(Value::String(s)) => {
                if let Ok(d) = Decimal::from_str(s.trim()) {
                    return Some(d);
                }
            }
            Some(Value::Number(n)) => {
                if let Ok(d) = Decimal::from_str(&n.to_string()) {
                    return Some(d);
                }
            }
            _ => {}
        }
    }
    None
}

fn resolve_capacity(payload: &Value, category: ProposalCategory) -> Option<i32> {
    if let Some(cap) = get_positive_i32(payload, "maxCapacity") {
        return Some(cap);
    }
    // A restaurant booking for N seats caps attendance at N.
    if category == ProposalCategory::Restaurant {
        return get_positive_i32(payload, "partySize");
    }
    None
}

fn get_positive_i32(payload: &Value, key: &str) -> Option<i32> {
    payload
        .get(key)
        .and_then(Value::as_i64)
        .filter(|v| *v > 0 && *v <= i32::MAX as i64)
        .map(|v| v as i32)
}

fn get_str(payload: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| {
        payload
            .get(k)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposals::proposals_model::ProposalStatus;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn trip(city: Option<&str>, country: Option<&str>) -> Trip {
        Trip {
            id: "trip1".to_string(),
            name: "Paris getaway".to_string(),
            destination_city: city.map(str::to_string),
            destination_country: country.map(str::to_string),
            start_date: None,
            end_date: None,
        }
    }

    fn proposal(category: ProposalCategory, payload: Value) -> Proposal {
        let now = Utc::now();
        Proposal {
            id: "prop1".to_string(),
            trip_id: "trip1".to_string(),
            created_by: "creator".to_string(),
            category,
            payload,
            status: ProposalStatus::Proposed,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn explicit_city_and_country_win() {
        let p = proposal(
            ProposalCategory::Restaurant,
            json!({
                "city": "Lyon",
                "country": "France",
                "location": {"city": "Nowhere"},
                "address": "1 Rue Test, Marseille, France"
            }),
        );
        let derived = derive_activity(&p, &trip(Some("Paris"), Some("France")));
        assert_eq!(derived.location_city.as_deref(), Some("Lyon"));
        assert_eq!(derived.location_country.as_deref(), Some("France"));
    }

    #[test]
    fn structured_location_beats_address() {
        let p = proposal(
            ProposalCategory::Activity,
            json!({
                "location": {"city": "Nice", "country": "France"},
                "address": "Somewhere, Else"
            }),
        );
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.location_city.as_deref(), Some("Nice"));
        assert_eq!(derived.location_country.as_deref(), Some("France"));
    }

    #[test]
    fn address_splits_on_commas_last_segment_country() {
        let p = proposal(
            ProposalCategory::Restaurant,
            json!({"address": "12 Via Roma, Florence, Italy"}),
        );
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.location_city.as_deref(), Some("Florence"));
        assert_eq!(derived.location_country.as_deref(), Some("Italy"));
    }

    #[test]
    fn single_segment_address_is_city_only() {
        let p = proposal(ProposalCategory::Activity, json!({"address": "Montmartre"}));
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.location_city.as_deref(), Some("Montmartre"));
        assert_eq!(derived.location_country, None);
    }

    #[test]
    fn trip_destination_is_the_fallback() {
        let p = proposal(ProposalCategory::Flight, json!({}));
        let derived = derive_activity(&p, &trip(Some("Tokyo"), Some("Japan")));
        assert_eq!(derived.location_city.as_deref(), Some("Tokyo"));
        assert_eq!(derived.location_country.as_deref(), Some("Japan"));
    }

    #[test]
    fn unknown_when_nothing_resolves() {
        let p = proposal(ProposalCategory::Activity, json!({}));
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.location_city.as_deref(), Some("Unknown"));
        assert_eq!(derived.location_country, None);
    }

    #[test]
    fn restaurant_name_and_party_size() {
        let p = proposal(
            ProposalCategory::Restaurant,
            json!({
                "restaurantName": "Le Jules Verne",
                "partySize": 6,
                "reservationTime": "2025-09-12T19:30:00Z",
                "price": "85.50",
                "currency": "EUR"
            }),
        );
        let derived = derive_activity(&p, &trip(Some("Paris"), Some("France")));
        assert_eq!(derived.name, "Dinner at Le Jules Verne");
        assert_eq!(derived.max_capacity, Some(6));
        assert_eq!(derived.cost, Some(dec!(85.50)));
        assert_eq!(derived.currency.as_deref(), Some("EUR"));
        assert_eq!(
            derived.start_time.unwrap().to_rfc3339(),
            "2025-09-12T19:30:00+00:00"
        );
    }

    #[test]
    fn explicit_max_capacity_beats_party_size() {
        let p = proposal(
            ProposalCategory::Restaurant,
            json!({"maxCapacity": 4, "partySize": 8}),
        );
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.max_capacity, Some(4));
    }

    #[test]
    fn non_positive_capacity_is_ignored() {
        let p = proposal(ProposalCategory::Restaurant, json!({"partySize": 0}));
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.max_capacity, None);
    }

    #[test]
    fn flight_name_from_airline_and_number() {
        let p = proposal(
            ProposalCategory::Flight,
            json!({
                "airline": "AF",
                "flightNumber": "276",
                "departureTime": "2025-09-10T10:05:00Z",
                "arrivalTime": "2025-09-10T14:40:00Z"
            }),
        );
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.name, "Flight AF 276");
        assert!(derived.start_time.is_some());
        assert!(derived.end_time.is_some());
    }

    #[test]
    fn hotel_dates_parse_as_midnight() {
        let p = proposal(
            ProposalCategory::Hotel,
            json!({
                "hotelName": "Hotel Lutetia",
                "checkInDate": "2025-09-10",
                "checkOutDate": "2025-09-14"
            }),
        );
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.name, "Stay at Hotel Lutetia");
        assert_eq!(
            derived.start_time.unwrap().to_rfc3339(),
            "2025-09-10T00:00:00+00:00"
        );
        assert_eq!(
            derived.end_time.unwrap().to_rfc3339(),
            "2025-09-14T00:00:00+00:00"
        );
    }

    #[test]
    fn malformed_cost_and_time_fall_through_to_none() {
        let p = proposal(
            ProposalCategory::Activity,
            json!({
                "activityName": "Seine cruise",
                "cost": "not a number",
                "startTime": "tomorrow-ish"
            }),
        );
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.name, "Seine cruise");
        assert_eq!(derived.cost, None);
        assert_eq!(derived.start_time, None);
    }

    #[test]
    fn numeric_cost_is_accepted() {
        let p = proposal(ProposalCategory::Activity, json!({"cost": 42.5}));
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.cost, Some(dec!(42.5)));
    }

    #[test]
    fn top_level_name_overrides_category_naming() {
        let p = proposal(
            ProposalCategory::Hotel,
            json!({"name": "Weekend base camp", "hotelName": "Ignored"}),
        );
        let derived = derive_activity(&p, &trip(None, None));
        assert_eq!(derived.name, "Weekend base camp");
    }
}
