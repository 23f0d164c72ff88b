//! The bundled validation fixture.

use serde::Deserialize;
use thiserror::Error;

use crate::types::TestCase;

const DEFAULT_FIXTURE: &str = include_str!("../data/test_coordinates.yaml");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to parse validation fixture: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Deserialize)]
struct FixtureFile {
    cases: Vec<TestCase>,
}

/// Parses a fixture document of the form `cases: [ ... ]`.
///
/// # Errors
///
/// Returns [`FixtureError::Parse`] if the document is not valid YAML or does
/// not match the expected shape.
pub fn parse_test_cases(raw: &str) -> Result<Vec<TestCase>, FixtureError> {
    let file: FixtureFile = serde_yaml::from_str(raw)?;
    Ok(file.cases)
}

/// The 50 Lagos landmarks shipped with the crate.
///
/// # Errors
///
/// Returns [`FixtureError::Parse`] if the embedded fixture is malformed.
pub fn default_test_cases() -> Result<Vec<TestCase>, FixtureError> {
    parse_test_cases(DEFAULT_FIXTURE)
}
