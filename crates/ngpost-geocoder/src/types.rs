//! Provider response shapes and the normalized result built from them.
//!
//! Nominatim omits whatever it does not know, so every field is optional at
//! the parse boundary. [`GeocodedAddress`] is the normalized form: absent and
//! blank values become `None`, and a missing display name becomes `""`.

use chrono::Utc;
use ngpost_core::{Coordinates, LocationResult, LocationSource, MAX_CONFIDENCE};
use ngpost_matching::MatchQuery;
use serde::{Deserialize, Serialize};

/// Body of `GET /reverse?format=json&addressdetails=1`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NominatimReverse {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
    /// Set instead of the other fields when the provider cannot geocode the
    /// point (e.g. open sea).
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NominatimAddress {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub quarter: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
}

/// A reverse-geocoded point in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedAddress {
    pub address: String,
    pub state: Option<String>,
    /// County, falling back to city.
    pub lga: Option<String>,
    /// First of suburb, neighbourhood, quarter, town, village.
    pub area: Option<String>,
    pub postal_code: Option<String>,
    pub coordinates: Coordinates,
    /// The provider document exactly as received.
    pub raw: serde_json::Value,
}

/// What the provider said about one point.
#[derive(Debug, Clone, PartialEq)]
pub enum ReverseOutcome {
    Found(GeocodedAddress),
    /// The provider answered with an error document instead of an address.
    NoAddress { raw: serde_json::Value },
}

impl ReverseOutcome {
    #[must_use]
    pub fn into_address(self) -> Option<GeocodedAddress> {
        match self {
            ReverseOutcome::Found(geocoded) => Some(geocoded),
            ReverseOutcome::NoAddress { .. } => None,
        }
    }

    /// The provider document exactly as received.
    #[must_use]
    pub fn raw(&self) -> &serde_json::Value {
        match self {
            ReverseOutcome::Found(geocoded) => &geocoded.raw,
            ReverseOutcome::NoAddress { raw } => raw,
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl GeocodedAddress {
    /// Normalizes a provider response. Only an error document yields
    /// [`ReverseOutcome::NoAddress`]; a partial document keeps whatever
    /// fields it has.
    #[must_use]
    pub fn from_response(
        response: NominatimReverse,
        coordinates: Coordinates,
        raw: serde_json::Value,
    ) -> ReverseOutcome {
        if response.error.is_some() {
            return ReverseOutcome::NoAddress { raw };
        }
        let address = clean(response.display_name).unwrap_or_default();
        let parts = response.address.unwrap_or_default();
        let lga = clean(parts.county).or_else(|| clean(parts.city));
        let area = [
            parts.suburb,
            parts.neighbourhood,
            parts.quarter,
            parts.town,
            parts.village,
        ]
        .into_iter()
        .find_map(clean);

        ReverseOutcome::Found(Self {
            address,
            state: clean(parts.state),
            lga,
            area,
            postal_code: clean(parts.postcode),
            coordinates,
            raw,
        })
    }

    /// Borrowed view for the match scorer.
    #[must_use]
    pub fn match_query(&self) -> MatchQuery<'_> {
        MatchQuery {
            address: Some(&self.address),
            state: self.state.as_deref(),
            lga: self.lga.as_deref(),
            area: self.area.as_deref(),
        }
    }

    /// Wraps the result as a geocoder-sourced [`LocationResult`]. Confidence
    /// is full when the provider supplied a postcode and zero otherwise.
    #[must_use]
    pub fn into_location_result(self) -> LocationResult {
        let confidence = if self.postal_code.is_some() {
            MAX_CONFIDENCE
        } else {
            0
        };
        LocationResult {
            postal_code: self.postal_code,
            source: LocationSource::Geocoder,
            address: self.address,
            lga: self.lga,
            area: self.area,
            state: self.state,
            confidence,
            coordinates: self.coordinates,
            resolved_at: Utc::now(),
        }
    }
}
