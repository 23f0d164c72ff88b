//! `validate` command: replays the bundled fixture through the live
//! geocoder and reports metrics.

use std::sync::Arc;

use ngpost_core::{AppConfig, PostalCodeTable};
use ngpost_geocoder::GeocodingClient;
use ngpost_validation::{
    default_test_cases, FailureAnalysis, MetricsAggregator, TestMetrics, TestResult,
    ValidationRunner,
};
use serde::Serialize;

use crate::OutputFormat;

#[derive(Debug, Serialize)]
struct ValidationReport {
    results: Vec<TestResult>,
    metrics: TestMetrics,
    failures: Vec<FailureAnalysis>,
}

pub(crate) async fn run_validate(
    config: &AppConfig,
    table: Arc<PostalCodeTable>,
    client: GeocodingClient,
    limit: Option<usize>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let mut cases = default_test_cases()?;
    if let Some(limit) = limit {
        cases.truncate(limit);
    }

    let runner = ValidationRunner::new(client, table);
    let results = runner
        .run_with_progress(&cases, |current, total, name| {
            eprintln!("[{current}/{total}] {name}");
        })
        .await;

    let aggregator = MetricsAggregator::new(config.viability);
    let report = ValidationReport {
        metrics: aggregator.aggregate(&results),
        failures: MetricsAggregator::group_failures(&results),
        results,
    };

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Summary => print!("{}", render_summary(&report.metrics, &report.failures)),
    }
    Ok(())
}

fn render_summary(metrics: &TestMetrics, failures: &[FailureAnalysis]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total cases:              {}\n", metrics.total));
    out.push_str(&format!(
        "Success rate:             {:.1}%\n",
        metrics.success_rate * 100.0
    ));
    out.push_str(&format!("Viability:                {}\n", metrics.viability));
    out.push_str(&format!(
        "High / medium / low:      {} / {} / {}\n",
        metrics.high_confidence, metrics.medium_confidence, metrics.low_confidence
    ));
    out.push_str(&format!(
        "Geocoder postal codes:    {}\n",
        metrics.geocoder_returned_postal_code
    ));

    if !failures.is_empty() {
        out.push_str("\nFailure reasons:\n");
        for failure in failures {
            out.push_str(&format!(
                "  {:>3}  {}  ({})\n",
                failure.count,
                failure.reason,
                failure.locations.join(", ")
            ));
        }
    }
    out
}
