//! In-memory postal-code reference table.
//!
//! The table is loaded once at startup (from the embedded dataset or a YAML
//! file) and never mutated afterwards. Lookups are linear scans: the dataset
//! holds a few hundred rows, well below the point where an index keyed by
//! `(state, lga)` would pay for itself.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

const EMBEDDED_TABLE: &str = include_str!("../data/postal_codes.yaml");
const SUPPORTED_VERSION: u32 = 1;

/// One row of the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalCodeRecord {
    pub state: String,
    pub lga: String,
    pub locality: String,
    pub area: String,
    /// Six ASCII digits.
    pub postal_code: String,
}

#[derive(Debug, Deserialize)]
struct TableDocument {
    version: u32,
    records: Vec<PostalCodeRecord>,
}

/// Immutable collection of [`PostalCodeRecord`]s. Row order is significant:
/// the first row matching a `(state, lga)` pair is authoritative.
#[derive(Debug, Clone)]
pub struct PostalCodeTable {
    records: Vec<PostalCodeRecord>,
}

impl PostalCodeTable {
    /// Builds a table from records, validating every postal code.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Empty`] for an empty record list and
    /// [`TableError::InvalidPostalCode`] when a code is not six digits.
    pub fn new(records: Vec<PostalCodeRecord>) -> Result<Self, TableError> {
        if records.is_empty() {
            return Err(TableError::Empty);
        }
        if let Some(bad) = records.iter().find(|r| !is_valid_postal_code(&r.postal_code)) {
            return Err(TableError::InvalidPostalCode {
                state: bad.state.clone(),
                lga: bad.lga.clone(),
                postal_code: bad.postal_code.clone(),
            });
        }
        Ok(Self { records })
    }

    /// Loads the dataset compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if the embedded document fails validation.
    pub fn embedded() -> Result<Self, TableError> {
        Self::from_yaml_str(EMBEDDED_TABLE)
    }

    /// Parses a versioned YAML table document.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Parse`] on malformed YAML,
    /// [`TableError::UnsupportedVersion`] for unknown versions, or any error
    /// from [`PostalCodeTable::new`].
    pub fn from_yaml_str(raw: &str) -> Result<Self, TableError> {
        let doc: TableDocument = serde_yaml::from_str(raw)?;
        if doc.version != SUPPORTED_VERSION {
            return Err(TableError::UnsupportedVersion(doc.version));
        }
        Self::new(doc.records)
    }

    /// Reads and parses a YAML table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] if the file cannot be read, otherwise as
    /// [`PostalCodeTable::from_yaml_str`].
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Loads from `path` when given, otherwise the embedded dataset.
    ///
    /// # Errors
    ///
    /// See [`PostalCodeTable::from_path`] and [`PostalCodeTable::embedded`].
    pub fn load(path: Option<&Path>) -> Result<Self, TableError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    /// First record whose state and LGA equal the inputs after trimming and
    /// lowercasing both sides. `None` is an expected outcome, not an error.
    #[must_use]
    pub fn find_by_state_lga(&self, state: &str, lga: &str) -> Option<&PostalCodeRecord> {
        let state = normalize_key(state);
        let lga = normalize_key(lga);
        self.records
            .iter()
            .find(|r| normalize_key(&r.state) == state && normalize_key(&r.lga) == lga)
    }

    #[must_use]
    pub fn records(&self) -> &[PostalCodeRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct state names in first-seen order.
    #[must_use]
    pub fn states(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.iter().any(|s| s.eq_ignore_ascii_case(&record.state)) {
                seen.push(&record.state);
            }
        }
        seen
    }

    /// Distinct LGAs of `state` (case-insensitive) in first-seen order.
    #[must_use]
    pub fn lgas_for_state(&self, state: &str) -> Vec<&str> {
        let state = normalize_key(state);
        let mut seen: Vec<&str> = Vec::new();
        for record in self.records.iter().filter(|r| normalize_key(&r.state) == state) {
            if !seen.iter().any(|l| l.eq_ignore_ascii_case(&record.lga)) {
                seen.push(&record.lga);
            }
        }
        seen
    }
}

fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

fn is_valid_postal_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}
