//! The canonical lookup result shared by table and geocoder resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::table::PostalCodeRecord;

/// Upper bound of every confidence score.
pub const MAX_CONFIDENCE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Placeholder used for table hits; the table does not carry coordinates.
    pub const UNKNOWN: Coordinates = Coordinates { lat: 0.0, lng: 0.0 };
}

/// Where the postal code in a [`LocationResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Database,
    Geocoder,
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationSource::Database => write!(f, "database"),
            LocationSource::Geocoder => write!(f, "geocoder"),
        }
    }
}

/// A resolved location. Immutable once built; never persisted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    /// `None` only for geocoder results where the provider had no postcode.
    pub postal_code: Option<String>,
    pub source: LocationSource,
    pub address: String,
    pub lga: Option<String>,
    pub area: Option<String>,
    pub state: Option<String>,
    /// Always within `0..=MAX_CONFIDENCE`.
    pub confidence: u8,
    pub coordinates: Coordinates,
    pub resolved_at: DateTime<Utc>,
}

impl LocationResult {
    /// Builds a full-confidence result for a table hit.
    ///
    /// The address is synthesised as `"{locality}, {area}, {lga}, {state}"` and
    /// the coordinates are [`Coordinates::UNKNOWN`].
    #[must_use]
    pub fn from_record(record: &PostalCodeRecord) -> Self {
        Self {
            postal_code: Some(record.postal_code.clone()),
            source: LocationSource::Database,
            address: format!(
                "{}, {}, {}, {}",
                record.locality, record.area, record.lga, record.state
            ),
            lga: Some(record.lga.clone()),
            area: Some(record.area.clone()),
            state: Some(record.state.clone()),
            confidence: MAX_CONFIDENCE,
            coordinates: Coordinates::UNKNOWN,
            resolved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ikeja() -> PostalCodeRecord {
        PostalCodeRecord {
            state: "Lagos".to_owned(),
            lga: "Ikeja".to_owned(),
            locality: "GRA".to_owned(),
            area: "Alausa".to_owned(),
            postal_code: "100271".to_owned(),
        }
    }

    #[test]
    fn from_record_builds_synthetic_address() {
        let result = LocationResult::from_record(&ikeja());
        assert_eq!(result.address, "GRA, Alausa, Ikeja, Lagos");
        assert_eq!(result.postal_code.as_deref(), Some("100271"));
        assert_eq!(result.source, LocationSource::Database);
        assert_eq!(result.confidence, 100);
        assert_eq!(result.coordinates, Coordinates::UNKNOWN);
    }

    #[test]
    fn source_serializes_lowercase() {
        let json = serde_json::to_string(&LocationSource::Geocoder).unwrap();
        assert_eq!(json, "\"geocoder\"");
    }
}
