//! Replays a fixed set of coordinates through the geocoder and the match
//! scorer, then reduces the outcomes into metrics and failure groups.

pub mod fixtures;
pub mod metrics;
pub mod runner;
pub mod types;

pub use fixtures::{default_test_cases, FixtureError};
pub use metrics::MetricsAggregator;
pub use runner::ValidationRunner;
pub use types::{FailureAnalysis, TestCase, TestMetrics, TestResult, Viability};
