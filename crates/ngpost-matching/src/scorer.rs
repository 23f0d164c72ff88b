//! Tiered scorer that reconciles geocoder output with the postal-code table.
//!
//! Rules are tried in priority order and the first one that fires wins:
//!
//! | Tier    | Fires when                                                        | Confidence |
//! |---------|-------------------------------------------------------------------|------------|
//! | `exact` | state and LGA both normalize-match a row                          | 100        |
//! | `area`  | state matches and the address contains a row's area               | 70..=90    |
//! | `lga`   | state matches and the LGA is similar to a row's LGA               | 50..=70    |
//! | `fuzzy` | state matches and address words overlap a row's locality/area     | 20..=50    |
//! | `none`  | nothing fired                                                     | 0          |
//!
//! Within a band the score is interpolated linearly by how specific the match
//! was (area coverage of the address, LGA similarity, word overlap).

use ngpost_core::{PostalCodeRecord, PostalCodeTable, MAX_CONFIDENCE};
use serde::{Deserialize, Serialize};

use crate::text::{
    canonical_lga, canonical_state, contains_phrase, expand_abbreviations, normalize_text,
    similarity, tokens, word_overlap,
};

pub(crate) const REASON_NO_ADDRESS: &str = "geocoder returned no address";
pub(crate) const REASON_STATE_NOT_FOUND: &str = "state not found";
pub(crate) const REASON_NO_LGA: &str = "geocoder returned no LGA";
pub(crate) const REASON_NO_LGA_MATCH: &str = "no LGA match";
pub(crate) const REASON_NO_AREA_MATCH: &str = "no area match";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Area,
    Lga,
    Fuzzy,
    None,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchType::Exact => "exact",
            MatchType::Area => "area",
            MatchType::Lga => "lga",
            MatchType::Fuzzy => "fuzzy",
            MatchType::None => "none",
        };
        f.write_str(s)
    }
}

/// Outcome class derived purely from a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Success,
    Partial,
    Failed,
}

impl MatchStatus {
    pub const SUCCESS_MIN: u8 = 70;
    pub const PARTIAL_MIN: u8 = 30;

    #[must_use]
    pub fn from_confidence(confidence: u8) -> Self {
        if confidence >= Self::SUCCESS_MIN {
            MatchStatus::Success
        } else if confidence >= Self::PARTIAL_MIN {
            MatchStatus::Partial
        } else {
            MatchStatus::Failed
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchStatus::Success => "success",
            MatchStatus::Partial => "partial",
            MatchStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Inclusive confidence band. Reversed bounds are treated as the same band
/// written the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub min: u8,
    pub max: u8,
}

impl Band {
    #[must_use]
    pub const fn new(min: u8, max: u8) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Linear interpolation inside the band. `t` is clamped to `[0, 1]` and
    /// the result is rounded down, so it never leaves the band.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_lossless
    )]
    pub fn at(self, t: f64) -> u8 {
        let (lo, hi) = (self.min.min(self.max), self.min.max(self.max));
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let span = f64::from(hi - lo);
        let value = (f64::from(lo) + span * t).floor() as u8;
        value.clamp(lo, hi)
    }
}

/// Tunable constants of [`TieredMatchScorer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    pub area_band: Band,
    pub lga_band: Band,
    pub fuzzy_band: Band,
    /// Minimum similarity (0..=100) for an LGA to count as a fuzzy match.
    pub lga_similarity_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            area_band: Band::new(70, 90),
            lga_band: Band::new(50, 70),
            fuzzy_band: Band::new(20, 50),
            lga_similarity_threshold: 80.0,
        }
    }
}

/// Geocoder-derived fields to reconcile. Every field may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchQuery<'a> {
    pub address: Option<&'a str>,
    pub state: Option<&'a str>,
    pub lga: Option<&'a str>,
    pub area: Option<&'a str>,
}

/// Result of scoring one query.
///
/// `match_type == MatchType::None` exactly when `matched_postal_code` is
/// `None`, and `failure_reason` is set exactly when the derived status is not
/// [`MatchStatus::Success`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub match_type: MatchType,
    pub matched_postal_code: Option<String>,
    pub confidence: u8,
    pub failure_reason: Option<String>,
    /// The table row that produced `matched_postal_code`. Postal codes are
    /// shared across LGAs, so the code alone does not identify the row.
    #[serde(skip)]
    pub matched_record: Option<PostalCodeRecord>,
}

impl MatchOutcome {
    #[must_use]
    pub fn none(reason: impl Into<String>) -> Self {
        Self {
            match_type: MatchType::None,
            matched_postal_code: None,
            confidence: 0,
            failure_reason: Some(reason.into()),
            matched_record: None,
        }
    }

    /// A hit on `record`. `stage_reason` is kept only when the confidence is
    /// too low for the result to count as a success.
    ///
    /// # Panics
    ///
    /// Debug builds assert that `match_type` is not [`MatchType::None`].
    #[must_use]
    pub fn matched(
        match_type: MatchType,
        record: &PostalCodeRecord,
        confidence: u8,
        stage_reason: &str,
    ) -> Self {
        debug_assert!(match_type != MatchType::None);
        let confidence = confidence.min(MAX_CONFIDENCE);
        let failure_reason = (MatchStatus::from_confidence(confidence) != MatchStatus::Success)
            .then(|| stage_reason.to_owned());
        Self {
            match_type,
            matched_postal_code: Some(record.postal_code.clone()),
            confidence,
            failure_reason,
            matched_record: Some(record.clone()),
        }
    }

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        MatchStatus::from_confidence(self.confidence)
    }
}

/// Strategy seam: anything that can reconcile a query with the table.
pub trait MatchScorer: Send + Sync {
    fn score(&self, query: &MatchQuery<'_>, table: &PostalCodeTable) -> MatchOutcome;
}

/// Default [`MatchScorer`] implementing the tiered rules described in the
/// module docs.
#[derive(Debug, Clone, Copy)]
pub struct TieredMatchScorer {
    policy: ScoringPolicy,
    similarity: fn(&str, &str) -> f64,
}

impl Default for TieredMatchScorer {
    fn default() -> Self {
        Self::new(ScoringPolicy::default())
    }
}

impl TieredMatchScorer {
    #[must_use]
    pub fn new(policy: ScoringPolicy) -> Self {
        Self {
            policy,
            similarity,
        }
    }

    /// Replaces the LGA similarity function (must return `0.0..=100.0`).
    #[must_use]
    pub fn with_similarity(mut self, similarity: fn(&str, &str) -> f64) -> Self {
        self.similarity = similarity;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    fn exact<'t>(
        rows: &[&'t PostalCodeRecord],
        lga_key: &str,
        haystacks: &[String],
    ) -> Option<&'t PostalCodeRecord> {
        let mut same_lga = rows
            .iter()
            .copied()
            .filter(|r| canonical_lga(&r.lga) == lga_key)
            .peekable();
        let first = *same_lga.peek()?;
        // Prefer the row whose area or locality the address names; otherwise
        // the first row for the pair stays authoritative.
        let refined = same_lga.find(|r| {
            let area = normalize_text(&r.area);
            let locality = normalize_text(&r.locality);
            haystacks
                .iter()
                .any(|h| contains_phrase(h, &locality) || contains_phrase(h, &area))
        });
        Some(refined.unwrap_or(first))
    }

    #[allow(clippy::cast_precision_loss)]
    fn area<'t>(
        rows: &[&'t PostalCodeRecord],
        haystacks: &[String],
    ) -> Option<(&'t PostalCodeRecord, f64)> {
        let mut best: Option<(&'t PostalCodeRecord, usize, f64)> = None;
        for &row in rows {
            let area = normalize_text(&row.area);
            if area.is_empty() {
                continue;
            }
            let coverage = haystacks
                .iter()
                .filter(|h| contains_phrase(h, &area))
                .map(|h| area.chars().count() as f64 / h.chars().count().max(1) as f64)
                .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |a| a.max(c))));
            let Some(coverage) = coverage else { continue };
            let specificity = area.chars().count();
            let better = best.is_none_or(|(_, len, cov)| {
                specificity > len || (specificity == len && coverage > cov)
            });
            if better {
                best = Some((row, specificity, coverage));
            }
        }
        best.map(|(row, _, coverage)| (row, coverage))
    }

    fn lga<'t>(
        &self,
        rows: &[&'t PostalCodeRecord],
        lga_key: &str,
    ) -> Option<(&'t PostalCodeRecord, f64)> {
        let mut best: Option<(&'t PostalCodeRecord, f64)> = None;
        for &row in rows {
            let score = (self.similarity)(lga_key, &canonical_lga(&row.lga));
            if score >= self.policy.lga_similarity_threshold
                && best.is_none_or(|(_, s)| score > s)
            {
                best = Some((row, score));
            }
        }
        best
    }

    fn fuzzy<'t>(
        rows: &[&'t PostalCodeRecord],
        haystacks: &[String],
    ) -> Option<(&'t PostalCodeRecord, f64)> {
        let haystack_tokens: Vec<Vec<String>> = haystacks.iter().map(|h| tokens(h)).collect();
        let mut best: Option<(&'t PostalCodeRecord, f64)> = None;
        for &row in rows {
            let row_tokens = tokens(&format!("{} {}", row.locality, row.area));
            let overlap = haystack_tokens
                .iter()
                .map(|h| word_overlap(h, &row_tokens))
                .fold(0.0_f64, f64::max);
            if overlap > 0.0 && best.is_none_or(|(_, o)| overlap > o) {
                best = Some((row, overlap));
            }
        }
        best
    }
}

impl MatchScorer for TieredMatchScorer {
    fn score(&self, query: &MatchQuery<'_>, table: &PostalCodeTable) -> MatchOutcome {
        let address = present(query.address);
        let state = present(query.state);
        let lga = present(query.lga);
        let area = present(query.area);

        if address.is_none() && state.is_none() && lga.is_none() && area.is_none() {
            return MatchOutcome::none(REASON_NO_ADDRESS);
        }

        let Some(state) = state else {
            return MatchOutcome::none(REASON_STATE_NOT_FOUND);
        };
        let state_key = canonical_state(state);
        let rows: Vec<&PostalCodeRecord> = table
            .records()
            .iter()
            .filter(|r| canonical_state(&r.state) == state_key)
            .collect();
        if rows.is_empty() {
            return MatchOutcome::none(REASON_STATE_NOT_FOUND);
        }

        let text = [address, area]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let haystacks = expand_abbreviations(&text);
        let lga_key = lga.map(canonical_lga).filter(|k| !k.is_empty());

        if let Some(lga_key) = lga_key.as_deref() {
            if let Some(row) = Self::exact(&rows, lga_key, &haystacks) {
                return MatchOutcome::matched(MatchType::Exact, row, MAX_CONFIDENCE, "");
            }
        }

        if let Some((row, coverage)) = Self::area(&rows, &haystacks) {
            let confidence = self.policy.area_band.at(coverage);
            return MatchOutcome::matched(MatchType::Area, row, confidence, REASON_NO_LGA_MATCH);
        }

        if let Some(lga_key) = lga_key.as_deref() {
            if let Some((row, score)) = self.lga(&rows, lga_key) {
                let threshold = self.policy.lga_similarity_threshold;
                let t = (score - threshold) / (100.0 - threshold).max(f64::EPSILON);
                let confidence = self.policy.lga_band.at(t);
                return MatchOutcome::matched(MatchType::Lga, row, confidence, REASON_NO_AREA_MATCH);
            }
        }

        let miss_reason = if lga_key.is_some() {
            REASON_NO_LGA_MATCH
        } else {
            REASON_NO_LGA
        };

        if let Some((row, overlap)) = Self::fuzzy(&rows, &haystacks) {
            let confidence = self.policy.fuzzy_band.at(overlap);
            return MatchOutcome::matched(MatchType::Fuzzy, row, confidence, miss_reason);
        }

        tracing::debug!(state = %state, lga = ?lga, "no table row reconciled with geocoder output");
        MatchOutcome::none(miss_reason)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
