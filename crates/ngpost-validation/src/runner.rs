//! Sequential replay of test cases through geocoder and scorer.
//!
//! Cases run one at a time, in input order. The geocoder's rate limiter
//! already serializes outbound calls, so running cases concurrently would
//! gain nothing. A failing case never aborts the run: its error becomes a
//! `failed` [`TestResult`] and the next case proceeds.

use std::sync::Arc;

use ngpost_core::PostalCodeTable;
use ngpost_geocoder::{GeocodeError, GeocodedAddress, ReverseGeocoder, ReverseOutcome};
use ngpost_matching::{MatchOutcome, MatchQuery, MatchScorer, MatchStatus, TieredMatchScorer};

use crate::types::{TestCase, TestResult};

pub struct ValidationRunner<G> {
    geocoder: G,
    table: Arc<PostalCodeTable>,
    scorer: Arc<dyn MatchScorer>,
}

impl<G: ReverseGeocoder> ValidationRunner<G> {
    #[must_use]
    pub fn new(geocoder: G, table: Arc<PostalCodeTable>) -> Self {
        Self {
            geocoder,
            table,
            scorer: Arc::new(TieredMatchScorer::default()),
        }
    }

    #[must_use]
    pub fn with_scorer(mut self, scorer: Arc<dyn MatchScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Runs every case and returns one result per case, in input order.
    pub async fn run(&self, cases: &[TestCase]) -> Vec<TestResult> {
        self.run_with_progress(cases, |_, _, _| {}).await
    }

    /// Like [`Self::run`], calling `on_progress(current, total, location_name)`
    /// (1-based `current`) before each case.
    pub async fn run_with_progress<F>(&self, cases: &[TestCase], mut on_progress: F) -> Vec<TestResult>
    where
        F: FnMut(usize, usize, &str),
    {
        let total = cases.len();
        let mut results = Vec::with_capacity(total);
        for (index, case) in cases.iter().enumerate() {
            on_progress(index + 1, total, &case.location_name);
            let result = self.run_case(case).await;
            tracing::info!(
                coordinate_id = %result.coordinate_id,
                status = %result.status,
                match_type = %result.match_type,
                confidence = result.confidence,
                "validation case finished"
            );
            results.push(result);
        }

        let succeeded = results
            .iter()
            .filter(|r| r.status == MatchStatus::Success)
            .count();
        tracing::info!(total, succeeded, "validation run finished");
        results
    }

    /// Replays a single case. Never fails; errors are folded into the result.
    pub async fn run_case(&self, case: &TestCase) -> TestResult {
        match self.geocoder.reverse(case.latitude, case.longitude).await {
            Ok(ReverseOutcome::Found(geocoded)) => {
                let outcome = self.scorer.score(&geocoded.match_query(), &self.table);
                let mut result = build_result(case, Some(&geocoded), outcome);
                result.raw_provider_response = Some(geocoded.raw);
                result
            }
            Ok(ReverseOutcome::NoAddress { raw }) => {
                let outcome = self.scorer.score(&MatchQuery::default(), &self.table);
                let mut result = build_result(case, None, outcome);
                result.raw_provider_response = Some(raw);
                result
            }
            Err(err) => {
                tracing::warn!(
                    coordinate_id = %case.coordinate_id,
                    error = %err,
                    "geocoder call failed for validation case"
                );
                build_result(case, None, MatchOutcome::none(failure_reason(&err)))
            }
        }
    }
}

/// Stable, groupable description of a geocoder failure. Transport details
/// (URLs, coordinates) stay in the logs.
fn failure_reason(err: &GeocodeError) -> String {
    match err {
        GeocodeError::InvalidCoordinates { .. } => "coordinates outside Nigeria".to_owned(),
        GeocodeError::GeocodingFailed { status } => format!("geocoding failed (HTTP {status})"),
        GeocodeError::Http(e) if e.is_timeout() => "geocoder request timed out".to_owned(),
        GeocodeError::Http(_) => "geocoder request failed".to_owned(),
        GeocodeError::Deserialize { .. } => "geocoder response could not be parsed".to_owned(),
        GeocodeError::InvalidBaseUrl { .. } => "geocoder is misconfigured".to_owned(),
    }
}

fn build_result(
    case: &TestCase,
    geocoded: Option<&GeocodedAddress>,
    outcome: MatchOutcome,
) -> TestResult {
    let status = outcome.status();
    let (address, postal_code, lga, area) = match geocoded {
        Some(g) => (
            Some(g.address.clone()),
            g.postal_code.clone(),
            g.lga.clone(),
            g.area.clone(),
        ),
        None => (None, None, None, None),
    };
    TestResult {
        id: format!("result-{}", case.coordinate_id),
        coordinate_id: case.coordinate_id.clone(),
        location_name: case.location_name.clone(),
        latitude: case.latitude,
        longitude: case.longitude,
        geocoder_address: address,
        geocoder_postal_code: postal_code,
        geocoder_lga: lga,
        geocoder_area: area,
        matched_postal_code: outcome.matched_postal_code,
        confidence: outcome.confidence,
        status,
        match_type: outcome.match_type,
        failure_reason: outcome.failure_reason,
        raw_provider_response: None,
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
