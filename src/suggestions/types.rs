//! Suggestion type definitions

use serde::{Deserialize, Serialize};

/// Mean earth radius in kilometers, used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic coordinate (WGS84 decimal degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in kilometers (haversine).
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

/// Which backend produced a suggestion.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionSource {
    /// Cheap full-text index hit.
    #[default]
    Index,
    /// Curated place documents.
    DocumentStore,
    /// Third-party places provider.
    PlacesProvider,
    /// City/municipality level match.
    AdministrativeArea,
    /// Country/region level match.
    Region,
}

/// Whether a suggestion carries full display detail.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    /// Complete: can be committed as-is.
    #[default]
    Resolved,
    /// Lightweight index hit: needs a second fetch before commit.
    Pending,
}

/// A single place suggestion shown in the dropdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    /// Stable identifier across backends.
    pub id: String,
    /// Primary display name.
    pub name: String,
    /// Secondary display line (address, parent region).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    /// Backend that produced this suggestion.
    #[serde(default)]
    pub source: SuggestionSource,
    /// Resolution status.
    #[serde(default)]
    pub status: SuggestionStatus,
    /// Provider place identifier, required to resolve a pending hit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    /// Coordinate, when the backend knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Distance from the caller-supplied coordinate, in kilometers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Provider rating, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Suggestion {
    /// Create a resolved suggestion with the required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            secondary: None,
            source: SuggestionSource::default(),
            status: SuggestionStatus::default(),
            place_id: None,
            location: None,
            distance_km: None,
            rating: None,
        }
    }

    /// Create a pending suggestion that must be resolved before commit.
    pub fn pending(
        id: impl Into<String>,
        name: impl Into<String>,
        place_id: impl Into<String>,
    ) -> Self {
        let mut suggestion = Self::new(id, name);
        suggestion.status = SuggestionStatus::Pending;
        suggestion.place_id = Some(place_id.into());
        suggestion
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }

    pub fn with_source(mut self, source: SuggestionSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::Pending
    }

    /// Merge resolved place detail into this suggestion. Fields absent from
    /// the detail keep their current value; the result is always resolved.
    pub fn merged_with(&self, detail: &PlaceDetail) -> Suggestion {
        let mut merged = self.clone();
        merged.status = SuggestionStatus::Resolved;
        merged.name = detail.name.clone();
        if detail.secondary.is_some() {
            merged.secondary = detail.secondary.clone();
        }
        if detail.location.is_some() {
            merged.location = detail.location;
        }
        if detail.rating.is_some() {
            merged.rating = detail.rating;
        }
        merged
    }
}

/// Full place detail returned by the resolution endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceDetail {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// A saved travel plan matched by the sibling plan-search surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Fill in missing `distance_km` fields from the caller's coordinate.
/// Suggestions whose distance the backend already computed are left alone.
pub fn fill_distances(suggestions: &mut [Suggestion], origin: Option<GeoPoint>) {
    let Some(origin) = origin else { return };
    for suggestion in suggestions {
        if suggestion.distance_km.is_none() {
            if let Some(location) = suggestion.location {
                suggestion.distance_km = Some(origin.distance_km(&location));
            }
        }
    }
}
