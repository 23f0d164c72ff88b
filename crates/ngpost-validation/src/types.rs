use ngpost_matching::{MatchStatus, MatchType};
use serde::{Deserialize, Serialize};

/// One point of the validation fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub coordinate_id: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcome of replaying one [`TestCase`]. Built once by the runner and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: String,
    pub coordinate_id: String,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub geocoder_address: Option<String>,
    pub geocoder_postal_code: Option<String>,
    pub geocoder_lga: Option<String>,
    pub geocoder_area: Option<String>,
    pub matched_postal_code: Option<String>,
    pub confidence: u8,
    pub status: MatchStatus,
    pub match_type: MatchType,
    pub failure_reason: Option<String>,
    pub raw_provider_response: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Viability {
    Viable,
    Conditional,
    NotViable,
}

impl std::fmt::Display for Viability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Viability::Viable => write!(f, "viable"),
            Viability::Conditional => write!(f, "conditional"),
            Viability::NotViable => write!(f, "not-viable"),
        }
    }
}

/// Aggregate over a set of [`TestResult`]s, recomputed from scratch each time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestMetrics {
    pub total: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
    pub geocoder_returned_postal_code: usize,
    /// In `[0.0, 1.0]`; `0.0` for an empty run.
    pub success_rate: f64,
    pub viability: Viability,
}

/// Non-successful results sharing one failure reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureAnalysis {
    pub reason: String,
    pub count: usize,
    pub locations: Vec<String>,
}
