//! Coverage gap detection.
//!
//! A gap term is a profile keyword that appears nowhere in the current group.
//! Those terms are the vocabulary the group is most likely still missing.

use std::collections::HashSet;

use crate::text::{dedup_preserving_order, extract_keywords, tokenize};
use crate::types::SpecText;

/// Keywords scanned from each profile by [`missing_profile_terms`].
pub const GAP_SCAN_KEYWORDS: usize = 32;

/// Returns profile keywords absent from every spec in `group_specs`.
///
/// Up to [`GAP_SCAN_KEYWORDS`] keywords are taken from each profile, domain
/// profile first, duplicates removed. Result is capped at `max_terms`.
///
/// # Examples
///
/// ```
/// use ragloop_core::missing_profile_terms;
///
/// let group = vec!["alpha beta"];
/// let gaps = missing_profile_terms(Some(group.as_slice()), "alpha gamma", "", 8);
/// assert_eq!(gaps, vec!["gamma"]);
/// ```
pub fn missing_profile_terms<S: SpecText>(
    group_specs: Option<&[S]>,
    domain_profile: &str,
    task_profile: &str,
    max_terms: usize,
) -> Vec<String> {
    missing_terms_scanning(
        group_specs,
        domain_profile,
        task_profile,
        GAP_SCAN_KEYWORDS,
        max_terms,
    )
}

/// Like [`missing_profile_terms`] with an explicit per-profile scan depth.
pub fn missing_terms_scanning<S: SpecText>(
    group_specs: Option<&[S]>,
    domain_profile: &str,
    task_profile: &str,
    scan_keywords: usize,
    max_terms: usize,
) -> Vec<String> {
    let mut profile_terms = extract_keywords(domain_profile, scan_keywords);
    profile_terms.extend(extract_keywords(task_profile, scan_keywords));
    let profile_terms = dedup_preserving_order(profile_terms);

    let covered = group_vocabulary(group_specs.unwrap_or(&[]));

    let missing: Vec<String> = profile_terms
        .into_iter()
        .filter(|term| !covered.contains(term))
        .take(max_terms)
        .collect();

    tracing::debug!(
        "Gap detection: {} group tokens, {} missing profile terms",
        covered.len(),
        missing.len()
    );
    missing
}

/// All tokens appearing in the text of any spec.
pub fn group_vocabulary<S: SpecText>(group_specs: &[S]) -> HashSet<String> {
    group_specs
        .iter()
        .flat_map(|spec| tokenize(spec.spec_text()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Spec;
    use serde_json::json;

    #[test]
    fn test_single_gap() {
        let group = vec![json!({"text": "alpha beta"})];
        let gaps = missing_profile_terms(Some(group.as_slice()), "alpha gamma", "", 8);
        assert_eq!(gaps, vec!["gamma"]);
    }

    #[test]
    fn test_no_group_means_everything_missing() {
        let gaps = missing_profile_terms::<Spec>(None, "encryption audit", "retention", 8);
        assert_eq!(gaps, vec!["audit", "encryption", "retention"]);
    }

    #[test]
    fn test_domain_terms_come_first_and_dedup() {
        let gaps = missing_profile_terms::<Spec>(
            Some(&[][..]),
            "zeta zeta alpha",
            "alpha omega",
            8,
        );
        assert_eq!(gaps, vec!["zeta", "alpha", "omega"]);
    }

    #[test]
    fn test_cap_applies() {
        let gaps = missing_profile_terms::<Spec>(None, "one two three four", "", 2);
        assert_eq!(gaps.len(), 2);
        assert!(missing_profile_terms::<Spec>(None, "one two", "", 0).is_empty());
    }

    #[test]
    fn test_group_text_is_tokenized_not_substring_matched() {
        // "encryption" does not cover "crypt"
        let group = vec![Spec::new("Encryption at rest")];
        let gaps = missing_profile_terms(Some(group.as_slice()), "crypt rest", "", 8);
        assert_eq!(gaps, vec!["crypt"]);
    }

    #[test]
    fn test_specs_without_text() {
        let group = vec![json!({"id": 1}), json!({"text": "retention"})];
        let gaps = missing_profile_terms(Some(group.as_slice()), "retention backup", "", 8);
        assert_eq!(gaps, vec!["backup"]);
    }

    #[test]
    fn test_scan_depth_limits_profile_terms() {
        let gaps = missing_terms_scanning::<Spec>(None, "aa bb cc", "dd", 1, 8);
        assert_eq!(gaps, vec!["aa", "dd"]);
    }
}
