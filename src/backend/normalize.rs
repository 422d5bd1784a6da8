//! Response normalization
//!
//! The travel API's JSON is loosely shaped: field names vary between camel
//! and snake case, and some deployments wrap each suggestion in a redundant
//! `suggestion` envelope. Everything here parses defensively and skips
//! entries it cannot make sense of rather than failing the whole response.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::suggestions::{
    GeoPoint, PlaceDetail, PlanSummary, Suggestion, SuggestionSource, SuggestionStatus,
};

/// How many `suggestion` envelopes to unwrap before giving up.
const MAX_NESTING: usize = 4;

/// Extract suggestions from a suggest-endpoint response body.
pub(crate) fn suggestions_from_response(body: &Value) -> Vec<Suggestion> {
    let items = body
        .as_array()
        .or_else(|| body.get("suggestions").and_then(Value::as_array))
        .or_else(|| body.get("results").and_then(Value::as_array));

    items
        .map(|items| items.iter().filter_map(suggestion_from_value).collect())
        .unwrap_or_default()
}

/// Extract place details from a place-endpoint response body.
pub(crate) fn place_from_response(body: &Value) -> Option<PlaceDetail> {
    let place = body.get("place").unwrap_or(body);

    let name = str_field(place, &["name", "title"])?;
    let id = str_field(place, &["id", "placeId", "place_id"]).unwrap_or(name);

    Some(PlaceDetail {
        id: id.to_string(),
        name: name.to_string(),
        secondary: str_field(place, &["secondary", "address"]).map(String::from),
        location: place.get("location").and_then(point_field),
        rating: f64_field(place, &["rating"]),
    })
}

/// Extract plan summaries from a plan-search response body.
pub(crate) fn plans_from_response(body: &Value) -> Vec<PlanSummary> {
    let items = body
        .as_array()
        .or_else(|| body.get("plans").and_then(Value::as_array))
        .or_else(|| body.get("results").and_then(Value::as_array));

    items
        .map(|items| items.iter().filter_map(plan_from_value).collect())
        .unwrap_or_default()
}

fn suggestion_from_value(value: &Value) -> Option<Suggestion> {
    let value = unwrap_envelope(value);

    let name = str_field(value, &["name", "title"])?;
    let place_id = str_field(value, &["placeId", "place_id"]).map(String::from);
    let id = str_field(value, &["id"])
        .map(String::from)
        .or_else(|| place_id.clone())
        .unwrap_or_else(|| name.to_string());

    Some(Suggestion {
        id,
        name: name.to_string(),
        secondary: str_field(value, &["secondary", "address"]).map(String::from),
        source: str_field(value, &["source"])
            .map(parse_source)
            .unwrap_or_default(),
        status: str_field(value, &["status"])
            .map(parse_status)
            .unwrap_or_default(),
        place_id,
        location: value.get("location").and_then(point_field),
        distance_km: f64_field(value, &["distanceKm", "distance_km"]),
        rating: f64_field(value, &["rating"]),
    })
}

fn plan_from_value(value: &Value) -> Option<PlanSummary> {
    let title = str_field(value, &["title", "name"])?;
    let id = str_field(value, &["id", "planId", "plan_id"]).unwrap_or(title);

    Some(PlanSummary {
        id: id.to_string(),
        title: title.to_string(),
        destination: str_field(value, &["destination"]).map(String::from),
        updated_at: str_field(value, &["updatedAt", "updated_at"]).and_then(parse_timestamp),
    })
}

/// Unwrap `{"suggestion": {...}}` envelopes, which some API versions emit
/// once per entry and older ones emit recursively.
///
/// TODO: drop this once the suggest API stops double-wrapping entries.
fn unwrap_envelope(value: &Value) -> &Value {
    let mut current = value;
    for _ in 0..MAX_NESTING {
        match current.get("suggestion") {
            Some(inner) if inner.is_object() => current = inner,
            _ => break,
        }
    }
    current
}

fn parse_source(raw: &str) -> SuggestionSource {
    match raw {
        "document-store" | "documentStore" | "document_store" => SuggestionSource::DocumentStore,
        "places-provider" | "placesProvider" | "places_provider" | "places" => {
            SuggestionSource::PlacesProvider
        }
        "administrative-area" | "administrativeArea" | "administrative_area" => {
            SuggestionSource::AdministrativeArea
        }
        "region" => SuggestionSource::Region,
        _ => SuggestionSource::Index,
    }
}

fn parse_status(raw: &str) -> SuggestionStatus {
    match raw {
        "pending" => SuggestionStatus::Pending,
        _ => SuggestionStatus::Resolved,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc))
}

fn str_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
}

fn f64_field(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(Value::as_f64))
}

fn point_field(value: &Value) -> Option<GeoPoint> {
    let lat = f64_field(value, &["lat", "latitude"])?;
    let lng = f64_field(value, &["lng", "lon", "longitude"])?;
    Some(GeoPoint::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_camel_case_suggestion() {
        let body = json!({
            "suggestions": [{
                "id": "plc-1",
                "name": "Alfama District",
                "secondary": "Lisbon, Portugal",
                "source": "placesProvider",
                "status": "pending",
                "placeId": "plc-1",
                "location": {"lat": 38.71, "lng": -9.13},
                "distanceKm": 1.2,
                "rating": 4.5
            }]
        });

        let parsed = suggestions_from_response(&body);
        assert_eq!(parsed.len(), 1);

        let suggestion = &parsed[0];
        assert_eq!(suggestion.id, "plc-1");
        assert_eq!(suggestion.name, "Alfama District");
        assert_eq!(suggestion.secondary.as_deref(), Some("Lisbon, Portugal"));
        assert_eq!(suggestion.source, SuggestionSource::PlacesProvider);
        assert_eq!(suggestion.status, SuggestionStatus::Pending);
        assert_eq!(suggestion.place_id.as_deref(), Some("plc-1"));
        assert!(suggestion.location.is_some());
        assert_eq!(suggestion.distance_km, Some(1.2));
        assert_eq!(suggestion.rating, Some(4.5));
    }

    #[test]
    fn test_unwraps_nested_envelopes() {
        let body = json!({
            "results": [
                {"suggestion": {"suggestion": {"name": "Porto", "id": "porto"}}},
                {"name": "Faro", "id": "faro"}
            ]
        });

        let parsed = suggestions_from_response(&body);
        let names: Vec<_> = parsed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Porto", "Faro"]);
    }

    #[test]
    fn test_skips_entries_without_name() {
        let body = json!([
            {"id": "nameless"},
            {"name": "Sintra"}
        ]);

        let parsed = suggestions_from_response(&body);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Sintra");
    }

    #[test]
    fn test_id_falls_back_to_place_id_then_name() {
        let body = json!([
            {"name": "Sintra", "placeId": "plc-9"},
            {"name": "Obidos"}
        ]);

        let parsed = suggestions_from_response(&body);
        assert_eq!(parsed[0].id, "plc-9");
        assert_eq!(parsed[1].id, "Obidos");
    }

    #[test]
    fn test_unknown_source_defaults_to_index() {
        let body = json!([{"name": "Sintra", "source": "mystery"}]);

        let parsed = suggestions_from_response(&body);
        assert_eq!(parsed[0].source, SuggestionSource::Index);
    }

    #[test]
    fn test_place_from_response() {
        let body = json!({
            "place": {
                "placeId": "plc-1",
                "name": "Belem Tower",
                "address": "Av. Brasilia, Lisbon",
                "location": {"lat": 38.6916, "lng": -9.2160},
                "rating": 4.7
            }
        });

        let place = place_from_response(&body).unwrap();
        assert_eq!(place.id, "plc-1");
        assert_eq!(place.name, "Belem Tower");
        assert_eq!(place.secondary.as_deref(), Some("Av. Brasilia, Lisbon"));
        assert!(place.location.is_some());
        assert_eq!(place.rating, Some(4.7));
    }

    #[test]
    fn test_place_without_location() {
        let body = json!({"id": "plc-2", "name": "Mystery Spot"});

        let place = place_from_response(&body).unwrap();
        assert_eq!(place.name, "Mystery Spot");
        assert!(place.location.is_none());
    }

    #[test]
    fn test_plans_from_response() {
        let body = json!({
            "plans": [{
                "id": "plan-1",
                "title": "Summer in Portugal",
                "destination": "Lisbon",
                "updatedAt": "2026-07-01T10:30:00Z"
            }]
        });

        let parsed = plans_from_response(&body);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "plan-1");
        assert_eq!(parsed[0].title, "Summer in Portugal");
        assert_eq!(parsed[0].destination.as_deref(), Some("Lisbon"));
        assert!(parsed[0].updated_at.is_some());
    }
}
