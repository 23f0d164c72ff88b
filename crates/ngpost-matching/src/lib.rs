//! Reconciles free-text geocoder output with the local postal-code table.

pub mod scorer;
pub mod text;

pub use scorer::{
    Band, MatchOutcome, MatchQuery, MatchScorer, MatchStatus, MatchType, ScoringPolicy,
    TieredMatchScorer,
};
pub use text::{canonical_lga, canonical_state, expand_abbreviations, normalize_text, similarity};
