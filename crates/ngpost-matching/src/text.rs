//! Text normalization and similarity heuristics for Nigerian place names.

/// Local abbreviations and their spelled-out forms. Matching tries both
/// directions, so an address saying "VI" still finds "Victoria Island".
pub(crate) const ABBREVIATIONS: &[(&str, &[&str])] = &[
    ("vi", &["victoria island"]),
    (
        "gra",
        &["government reservation area", "government reserved area"],
    ),
    ("lekki ph1", &["lekki phase 1", "lekki phase one"]),
    ("lekki ph2", &["lekki phase 2", "lekki phase two"]),
    ("vgc", &["victoria garden city"]),
    ("festac", &["festival town"]),
    ("unilag", &["university of lagos"]),
    ("luth", &["lagos university teaching hospital"]),
    ("mmia", &["murtala muhammed international airport"]),
    ("cms", &["church missionary society"]),
];

const STATE_SUFFIX: &str = " state";
const FCT: &str = "federal capital territory";
const LGA_SUFFIXES: &[&str] = &[" local government area", " local government", " lga"];

/// Lowercases, turns every non-alphanumeric character into a space and
/// collapses runs of whitespace.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .to_lowercase();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized words of `text`.
#[must_use]
pub fn tokens(text: &str) -> Vec<String> {
    normalize_text(text)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Canonical comparison key for a state name: `"Lagos State"` and `"lagos"`
/// both become `"lagos"`; the various names of the capital territory collapse
/// into one key.
#[must_use]
pub fn canonical_state(state: &str) -> String {
    let normalized = normalize_text(state);
    let stripped = normalized
        .strip_suffix(STATE_SUFFIX)
        .unwrap_or(&normalized)
        .to_owned();
    match stripped.as_str() {
        "fct" | "abuja" | "abuja fct" | "fct abuja" | FCT => FCT.to_owned(),
        _ => stripped,
    }
}

/// Canonical comparison key for an LGA name. Providers sometimes append
/// "Local Government Area" or "LGA".
#[must_use]
pub fn canonical_lga(lga: &str) -> String {
    let normalized = normalize_text(lga);
    LGA_SUFFIXES
        .iter()
        .find_map(|suffix| normalized.strip_suffix(suffix))
        .map_or_else(|| normalized.clone(), str::to_owned)
}

/// Returns `true` if `phrase` occurs in `haystack` on word boundaries. Both
/// inputs must already be normalized.
#[must_use]
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    format!(" {haystack} ").contains(&format!(" {phrase} "))
}

fn replace_phrase(haystack: &str, from: &str, to: &str) -> String {
    format!(" {haystack} ")
        .replace(&format!(" {from} "), &format!(" {to} "))
        .trim()
        .to_owned()
}

/// The normalized text plus every variant obtained by expanding or
/// contracting one known abbreviation. The first element is always the
/// normalized input; duplicates are removed.
#[must_use]
pub fn expand_abbreviations(text: &str) -> Vec<String> {
    let normalized = normalize_text(text);
    let mut variations = vec![normalized.clone()];
    for (abbr, expansions) in ABBREVIATIONS {
        for expansion in *expansions {
            if contains_phrase(&normalized, abbr) {
                variations.push(replace_phrase(&normalized, abbr, expansion));
            }
            if contains_phrase(&normalized, expansion) {
                variations.push(replace_phrase(&normalized, expansion, abbr));
            }
        }
    }
    let mut unique: Vec<String> = Vec::with_capacity(variations.len());
    for v in variations {
        if !unique.contains(&v) {
            unique.push(v);
        }
    }
    unique
}

/// Dice coefficient over word sets, in `[0.0, 1.0]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn word_overlap(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let common = a.iter().filter(|w| b.contains(w)).count();
    (common * 2) as f64 / (a.len() + b.len()) as f64
}

/// Similarity of two place names in `[0.0, 100.0]`.
///
/// Equal after normalization scores 100. If one contains the other the score
/// is `85 + 15 * shorter/longer`. Otherwise it is the better of word-level
/// Dice overlap and the Levenshtein ratio, scaled to 100.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let s1 = normalize_text(a);
    let s2 = normalize_text(b);
    if s1 == s2 {
        return 100.0;
    }
    let (longer, shorter) = if s1.chars().count() >= s2.chars().count() {
        (s1, s2)
    } else {
        (s2, s1)
    };
    if shorter.is_empty() {
        return 0.0;
    }
    let longer_len = longer.chars().count();
    let shorter_len = shorter.chars().count();
    if longer.contains(&shorter) {
        return 85.0 + (shorter_len as f64 / longer_len as f64) * 15.0;
    }

    let words = word_overlap(&tokens(&longer), &tokens(&shorter));
    let edit = strsim::normalized_levenshtein(&longer, &shorter);
    (words.max(edit) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_text("  Eti-Osa,  LAGOS!! "), "eti osa lagos");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn canonical_state_strips_suffix() {
        assert_eq!(canonical_state("Lagos State"), "lagos");
        assert_eq!(canonical_state(" lagos "), "lagos");
    }

    #[test]
    fn canonical_state_unifies_capital_territory() {
        assert_eq!(canonical_state("FCT"), canonical_state("Federal Capital Territory"));
        assert_eq!(canonical_state("Abuja"), FCT);
    }

    #[test]
    fn canonical_lga_strips_government_suffix() {
        assert_eq!(canonical_lga("Ikeja Local Government Area"), "ikeja");
        assert_eq!(canonical_lga("Eti-Osa LGA"), "eti osa");
        assert_eq!(canonical_lga("Surulere"), "surulere");
    }

    #[test]
    fn contains_phrase_respects_word_boundaries() {
        assert!(contains_phrase("ikeja gra lagos", "gra"));
        assert!(!contains_phrase("ikeja grace lagos", "gra"));
        assert!(!contains_phrase("anything", ""));
    }

    #[test]
    fn expands_and_contracts_abbreviations() {
        let expanded = expand_abbreviations("Adeola Odeku, VI");
        assert_eq!(expanded[0], "adeola odeku vi");
        assert!(expanded.contains(&"adeola odeku victoria island".to_owned()));

        let contracted = expand_abbreviations("Victoria Island, Lagos");
        assert!(contracted.contains(&"vi lagos".to_owned()));
    }

    #[test]
    fn abbreviation_inside_word_is_not_expanded() {
        let variants = expand_abbreviations("Ikovi Road");
        assert_eq!(variants, vec!["ikovi road".to_owned()]);
    }

    #[test]
    fn similarity_uses_edit_ratio_for_single_words() {
        // kitten -> sitting: 3 edits over 7 chars
        let score = similarity("kitten", "sitting");
        assert!((score - 100.0 * 4.0 / 7.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn similarity_equal_is_full() {
        assert!((similarity("Eti-Osa", "eti osa") - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn similarity_containment_is_high() {
        let score = similarity("Ikeja", "Ikeja GRA");
        assert!((85.0..100.0).contains(&score), "got {score}");
    }

    #[test]
    fn similarity_typo_beats_unrelated() {
        let typo = similarity("Surulere", "Surelere");
        let unrelated = similarity("Surulere", "Badagry");
        assert!(typo > 80.0, "got {typo}");
        assert!(unrelated < typo);
    }

    #[test]
    fn similarity_empty_side_is_zero() {
        assert!(similarity("", "Ikeja").abs() < f64::EPSILON);
    }

    #[test]
    fn word_overlap_dice() {
        let a = tokens("Lekki Phase 1");
        let b = tokens("Lekki Phase 2");
        let overlap = word_overlap(&a, &b);
        assert!((overlap - 2.0 / 3.0).abs() < 1e-9, "got {overlap}");
    }
}
