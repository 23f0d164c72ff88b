//! Pure reductions over a set of [`TestResult`]s.

use ngpost_core::ViabilityThresholds;
use ngpost_matching::MatchStatus;

use crate::types::{FailureAnalysis, TestMetrics, TestResult, Viability};

/// Results at or above this confidence count as high confidence.
pub const HIGH_CONFIDENCE_MIN: u8 = 80;
/// Results at or above this confidence (and below high) count as medium.
pub const MEDIUM_CONFIDENCE_MIN: u8 = 50;

const UNKNOWN_REASON: &str = "unknown reason";

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsAggregator {
    thresholds: ViabilityThresholds,
}

impl MetricsAggregator {
    #[must_use]
    pub fn new(thresholds: ViabilityThresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> ViabilityThresholds {
        self.thresholds
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aggregate(&self, results: &[TestResult]) -> TestMetrics {
        let total = results.len();
        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;
        let mut with_postal_code = 0;
        let mut succeeded = 0;

        for result in results {
            match result.confidence {
                c if c >= HIGH_CONFIDENCE_MIN => high += 1,
                c if c >= MEDIUM_CONFIDENCE_MIN => medium += 1,
                _ => low += 1,
            }
            if result.geocoder_postal_code.is_some() {
                with_postal_code += 1;
            }
            if result.status == MatchStatus::Success {
                succeeded += 1;
            }
        }

        let success_rate = if total == 0 {
            0.0
        } else {
            succeeded as f64 / total as f64
        };

        TestMetrics {
            total,
            high_confidence: high,
            medium_confidence: medium,
            low_confidence: low,
            geocoder_returned_postal_code: with_postal_code,
            success_rate,
            viability: self.viability(success_rate),
        }
    }

    #[must_use]
    pub fn viability(&self, success_rate: f64) -> Viability {
        if success_rate >= self.thresholds.viable {
            Viability::Viable
        } else if success_rate >= self.thresholds.conditional {
            Viability::Conditional
        } else {
            Viability::NotViable
        }
    }

    /// Groups non-successful results by failure reason, compared after
    /// trimming, collapsing whitespace and lowercasing. The reported reason is
    /// the first spelling seen. Groups are ordered by descending count, ties
    /// in first-seen order.
    #[must_use]
    pub fn group_failures(results: &[TestResult]) -> Vec<FailureAnalysis> {
        let mut groups: Vec<(String, FailureAnalysis)> = Vec::new();
        for result in results.iter().filter(|r| r.status != MatchStatus::Success) {
            let reason = result
                .failure_reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(UNKNOWN_REASON);
            let key = normalize_reason(reason);
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, group)) => {
                    group.count += 1;
                    group.locations.push(result.location_name.clone());
                }
                None => groups.push((
                    key,
                    FailureAnalysis {
                        reason: reason.to_owned(),
                        count: 1,
                        locations: vec![result.location_name.clone()],
                    },
                )),
            }
        }

        let mut analysis: Vec<FailureAnalysis> = groups.into_iter().map(|(_, g)| g).collect();
        // Stable sort keeps first-seen order among equal counts.
        analysis.sort_by(|a, b| b.count.cmp(&a.count));
        analysis
    }
}

fn normalize_reason(reason: &str) -> String {
    reason
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
