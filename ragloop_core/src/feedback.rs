//! Feedback key normalization.
//!
//! Judges label their comments inconsistently ("Coverage Notes", "COVERAGE",
//! "practical concerns", ...). Normalization folds every label onto one of
//! the canonical facets, or keeps the cleaned-up label when none applies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::FeedbackMap;

/// Canonical feedback facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    /// Whether the group hangs together around one topic
    Cohesion,
    /// Whether anything expected is missing
    Coverage,
    /// Whether entries overlap or repeat each other
    Redundancy,
    /// Whether entries are feasible to apply
    Practicality,
}

impl Facet {
    /// Facets in the order their queries are generated.
    pub const ALL: [Facet; 4] = [
        Facet::Coverage,
        Facet::Redundancy,
        Facet::Practicality,
        Facet::Cohesion,
    ];

    /// Canonical key used in normalized feedback maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Cohesion => "cohesion",
            Facet::Coverage => "coverage",
            Facet::Redundancy => "redundancy",
            Facet::Practicality => "practicality",
        }
    }

    /// Matches a raw label against the facet rules.
    ///
    /// The label is trimmed and lowercased first. Returns `None` when no rule
    /// applies.
    pub fn classify(label: &str) -> Option<Facet> {
        let label = label.trim().to_lowercase();
        FACET_RULES
            .iter()
            .find(|(needle, _)| label.contains(needle))
            .map(|(_, facet)| *facet)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a canonical facet name, ignoring case and surrounding whitespace.
///
/// Unlike [`Facet::classify`] this does not match substrings, so
/// "not coverage" is an error rather than `Coverage`.
impl FromStr for Facet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Facet::ALL
            .into_iter()
            .find(|facet| facet.as_str() == name)
            .ok_or_else(|| format!("unknown facet: {}", s))
    }
}

/// Substring rules, checked top to bottom. First match wins.
///
/// "practical" maps to `practicality` so that "practical concerns" and
/// "practicality" land on the same facet.
const FACET_RULES: &[(&str, Facet)] = &[
    ("cohesion", Facet::Cohesion),
    ("coverage", Facet::Coverage),
    ("redundancy", Facet::Redundancy),
    ("practical", Facet::Practicality),
];

/// Normalizes a raw feedback label to its facet key.
pub fn normalize_key(label: &str) -> String {
    match Facet::classify(label) {
        Some(facet) => facet.as_str().to_string(),
        None => label.trim().to_lowercase(),
    }
}

/// Folds feedback labels onto canonical facet keys.
///
/// When several labels normalize to the same key, the value of the last one
/// wins; values are never merged.
///
/// # Examples
///
/// ```
/// use ragloop_core::{normalize_feedback_keys, FeedbackMap};
///
/// let mut feedback = FeedbackMap::new();
/// feedback.insert("Coverage Notes".into(), "x".into());
/// feedback.insert("COVERAGE".into(), "y".into());
///
/// let normalized = normalize_feedback_keys(&feedback);
/// assert_eq!(normalized.len(), 1);
/// assert_eq!(normalized["coverage"], "y");
/// ```
pub fn normalize_feedback_keys(feedback: &FeedbackMap) -> FeedbackMap {
    let mut out = FeedbackMap::with_capacity(feedback.len());
    for (label, comment) in feedback {
        out.insert(normalize_key(label), comment.clone());
    }
    out
}

/// Comment text for a facet, or `""` when the facet has no feedback.
pub fn facet_comment(normalized: &FeedbackMap, facet: Facet) -> &str {
    normalized
        .get(facet.as_str())
        .map(String::as_str)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback(pairs: &[(&str, &str)]) -> FeedbackMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_last_label_wins() {
        let normalized =
            normalize_feedback_keys(&feedback(&[("Coverage Notes", "x"), ("COVERAGE", "y")]));
        assert_eq!(normalized, feedback(&[("coverage", "y")]));
    }

    #[test]
    fn test_practical_maps_to_practicality() {
        let normalized = normalize_feedback_keys(&feedback(&[("Practical Concerns", "z")]));
        assert_eq!(normalized, feedback(&[("practicality", "z")]));
    }

    #[test]
    fn test_rule_priority() {
        // Mentions two facets; cohesion is checked first
        assert_eq!(normalize_key("coverage/cohesion"), "cohesion");
        assert_eq!(normalize_key("redundancy & practicality"), "redundancy");
    }

    #[test]
    fn test_unknown_label_is_cleaned() {
        let normalized = normalize_feedback_keys(&feedback(&[("  Tone Issues ", "too casual")]));
        assert_eq!(normalized, feedback(&[("tone issues", "too casual")]));
    }

    #[test]
    fn test_empty_feedback() {
        assert!(normalize_feedback_keys(&FeedbackMap::new()).is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_feedback_keys(&feedback(&[
            ("Cohesion score", "a"),
            ("coverage", "b"),
            ("Redundancy!", "c"),
            ("PRACTICALITY", "d"),
            ("Misc", "e"),
        ]));
        let twice = normalize_feedback_keys(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_facet_parse_and_display() {
        assert_eq!(" Practicality ".parse::<Facet>(), Ok(Facet::Practicality));
        assert_eq!(Facet::Coverage.to_string(), "coverage");
        assert!("tone".parse::<Facet>().is_err());
    }

    #[test]
    fn test_facet_parse_is_exact() {
        assert!("not coverage".parse::<Facet>().is_err());
        assert!("Practical".parse::<Facet>().is_err());
        for facet in Facet::ALL {
            assert_eq!(facet.as_str().parse::<Facet>(), Ok(facet));
        }
        // classification still matches substrings
        assert_eq!(Facet::classify("not coverage"), Some(Facet::Coverage));
    }

    #[test]
    fn test_facet_comment_defaults_to_empty() {
        let normalized = feedback(&[("coverage", "missing retention")]);
        assert_eq!(facet_comment(&normalized, Facet::Coverage), "missing retention");
        assert_eq!(facet_comment(&normalized, Facet::Cohesion), "");
    }
}
