//! Single entry point for turning either a `(state, LGA)` pair or a
//! coordinate into a [`LocationResult`].

use std::sync::Arc;

use ngpost_core::{LocationResult, LocationSource, PostalCodeTable};
use ngpost_matching::{MatchScorer, TieredMatchScorer};

use crate::client::{GeocodingClient, ReverseGeocoder};
use crate::error::GeocodeError;

/// Lowest scorer confidence that [`LocationResolver::resolve_with_fallback`]
/// will still report as a table-derived postal code.
pub const FALLBACK_MIN_CONFIDENCE: u8 = 50;

pub struct LocationResolver<G = GeocodingClient> {
    table: Arc<PostalCodeTable>,
    geocoder: G,
    scorer: Arc<dyn MatchScorer>,
}

impl<G: ReverseGeocoder> LocationResolver<G> {
    /// Creates a resolver using the default tiered scorer.
    #[must_use]
    pub fn new(table: Arc<PostalCodeTable>, geocoder: G) -> Self {
        Self {
            table,
            geocoder,
            scorer: Arc::new(TieredMatchScorer::default()),
        }
    }

    #[must_use]
    pub fn with_scorer(mut self, scorer: Arc<dyn MatchScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    #[must_use]
    pub fn table(&self) -> &PostalCodeTable {
        &self.table
    }

    #[must_use]
    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    #[must_use]
    pub fn scorer(&self) -> &dyn MatchScorer {
        self.scorer.as_ref()
    }

    /// Table lookup. Matching is case-insensitive and whitespace-trimmed; the
    /// first matching row wins. `None` means there is no mapping.
    #[must_use]
    pub fn resolve_by_state_lga(&self, state: &str, lga: &str) -> Option<LocationResult> {
        self.table
            .find_by_state_lga(state, lga)
            .map(LocationResult::from_record)
    }

    /// Reverse-geocodes the point and reports what the provider said.
    ///
    /// # Errors
    ///
    /// Propagates every [`GeocodeError`] from the geocoder.
    pub async fn resolve_by_coordinates(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Option<LocationResult>, GeocodeError> {
        let outcome = self.geocoder.reverse(lat, lng).await?;
        Ok(outcome
            .into_address()
            .map(crate::types::GeocodedAddress::into_location_result))
    }

    /// Like [`Self::resolve_by_coordinates`], but when the provider has no
    /// postcode the geocoded fields are scored against the table. A table hit
    /// at or above [`FALLBACK_MIN_CONFIDENCE`] is returned with
    /// `source = database`; anything weaker yields `None`.
    ///
    /// # Errors
    ///
    /// Propagates every [`GeocodeError`] from the geocoder.
    pub async fn resolve_with_fallback(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Option<LocationResult>, GeocodeError> {
        let Some(geocoded) = self.geocoder.reverse(lat, lng).await?.into_address() else {
            return Ok(None);
        };
        if geocoded.postal_code.is_some() {
            return Ok(Some(geocoded.into_location_result()));
        }

        let outcome = self.scorer.score(&geocoded.match_query(), &self.table);
        let Some(code) = outcome.matched_postal_code.clone() else {
            return Ok(None);
        };
        if outcome.confidence < FALLBACK_MIN_CONFIDENCE {
            tracing::debug!(
                lat,
                lng,
                confidence = outcome.confidence,
                match_type = %outcome.match_type,
                "table match below fallback threshold"
            );
            return Ok(None);
        }

        let row = outcome.matched_record.as_ref();
        let mut result = geocoded.into_location_result();
        result.source = LocationSource::Database;
        result.confidence = outcome.confidence;
        result.state = result.state.or_else(|| row.map(|r| r.state.clone()));
        result.lga = result.lga.or_else(|| row.map(|r| r.lga.clone()));
        result.area = result.area.or_else(|| row.map(|r| r.area.clone()));
        result.postal_code = Some(code);
        Ok(Some(result))
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
