//! Tokenizer and frequency keyword extractor.
//!
//! Tokens are maximal runs of ASCII letters, digits, underscore and modern
//! Hangul syllables (U+AC00..=U+D7A3), at least two characters long,
//! lowercased. Purely numeric tokens and stopwords are dropped.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9가-힣_]{2,}").expect("token regex is valid")
});

/// English function words.
const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "into", "your", "have", "has", "are",
    "was", "were", "will", "shall", "should", "must", "may", "not", "but", "can", "could", "to",
    "of", "in", "on", "by", "as", "at", "it", "or", "be", "is", "a", "an", "we", "you", "they",
    "their", "our", "its", "over", "under", "more", "less", "than", "such",
];

/// Vague nouns that make queries unspecific.
const VAGUE_STOPWORDS: &[&str] = &[
    "spec", "specs", "some", "any", "many", "various", "thing", "things", "item", "items",
    "example", "examples", "policy", "policies", "requirement", "requirements", "group", "groups",
    "text", "texts",
];

/// Korean particles and connectives.
const KOREAN_STOPWORDS: &[&str] = &[
    "및", "그리고", "또는", "그러나", "하지만", "등", "이", "가", "을", "를", "은", "는", "에",
    "의", "로", "으로", "에서", "까지", "마다", "하여", "하고", "한다", "수", "있는", "없는",
    "대한", "관련", "위한",
];

/// Words that carry no domain signal on their own. Every entry is also a
/// stopword.
pub const GENERIC_TOKENS: &[&str] = &[
    "spec", "specs", "some", "item", "items", "example", "examples", "policy", "policies",
    "requirement", "requirements",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ENGLISH_STOPWORDS
        .iter()
        .chain(VAGUE_STOPWORDS)
        .chain(KOREAN_STOPWORDS)
        .copied()
        .collect()
});

static GENERIC: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| GENERIC_TOKENS.iter().copied().collect());

/// Default keyword count for [`extract_keywords`] callers without a preference.
pub const DEFAULT_MAX_KEYWORDS: usize = 8;

/// Returns true if `token` is dropped by the tokenizer as a stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Returns true if `token` is in the generic vocabulary.
pub fn is_generic(token: &str) -> bool {
    GENERIC.contains(token)
}

/// Splits `text` into normalized tokens.
///
/// Order follows first occurrence in the text and duplicates are kept.
///
/// # Examples
///
/// ```
/// use ragloop_core::text::tokenize;
///
/// let tokens = tokenize("The API must log 404 errors, errors and 보안 정책");
/// assert_eq!(tokens, vec!["api", "log", "errors", "errors", "보안", "정책"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| keep_token(t))
        .collect()
}

fn keep_token(token: &str) -> bool {
    if is_stopword(token) {
        return false;
    }
    if token.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    token.chars().count() >= 2
}

/// Returns up to `max_k` distinct tokens of `text`, most frequent first.
///
/// Ties are broken by ascending token order, so the result is fully
/// determined by the text.
pub fn extract_keywords(text: &str, max_k: usize) -> Vec<String> {
    if max_k == 0 {
        return Vec::new();
    }

    let mut freq: HashMap<String, usize> = HashMap::new();
    for token in tokenize(text) {
        *freq.entry(token).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(max_k);

    ranked.into_iter().map(|(token, _)| token).collect()
}

/// Drops repeated entries, keeping the first occurrence of each.
pub(crate) fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t").is_empty());
    }

    #[test]
    fn test_tokenize_lowercases_and_keeps_duplicates() {
        assert_eq!(
            tokenize("Token TOKEN token_bucket"),
            vec!["token", "token", "token_bucket"]
        );
    }

    #[test]
    fn test_tokenize_drops_digits_and_short_runs() {
        assert_eq!(tokenize("v2 2024 x a9 42b 7"), vec!["v2", "a9", "42b"]);
    }

    #[test]
    fn test_tokenize_drops_stopwords() {
        assert_eq!(
            tokenize("The policy for some requirements and the retention"),
            vec!["retention"]
        );
    }

    #[test]
    fn test_tokenize_hangul() {
        assert_eq!(tokenize("개인정보 및 보안 정책"), vec!["개인정보", "보안", "정책"]);
        // Single syllables are too short, particles are stopwords
        assert_eq!(tokenize("수 있는 암호화"), vec!["암호화"]);
    }

    #[test]
    fn test_tokenize_hangul_syllable_block_only() {
        // compatibility jamo (U+3131..) and leading jamo (U+1100..) break runs
        assert_eq!(tokenize("ㄱㄴㄷ 한글ᄀ 힣힣"), vec!["한글", "힣힣"]);
        // both ends of U+AC00..=U+D7A3 are kept
        assert_eq!(tokenize("\u{AC00}\u{D7A3}"), vec!["\u{AC00}\u{D7A3}"]);
        // jamo extended-B just past the block splits into single syllables
        assert!(tokenize("\u{AC00}\u{D7B0}\u{AC00}").is_empty());
    }

    #[test]
    fn test_tokenize_splits_on_punctuation_and_other_scripts() {
        assert_eq!(
            tokenize("rate-limit, café;résumé"),
            vec!["rate", "limit", "caf", "sum"]
        );
    }

    #[test]
    fn test_generic_tokens_are_stopwords() {
        for token in GENERIC_TOKENS {
            assert!(is_stopword(token), "{token} should be a stopword");
            assert!(is_generic(token));
        }
        assert!(!is_generic("group"));
    }

    #[test]
    fn test_extract_keywords_frequency_then_lexical() {
        let text = "cache eviction cache ttl eviction cache alpha";
        assert_eq!(
            extract_keywords(text, 8),
            vec!["cache", "eviction", "alpha", "ttl"]
        );
    }

    #[test]
    fn test_extract_keywords_respects_limit() {
        let text = "delta gamma beta alpha";
        assert_eq!(extract_keywords(text, 2), vec!["alpha", "beta"]);
        assert!(extract_keywords(text, 0).is_empty());
    }

    #[test]
    fn test_extract_keywords_distinct_and_sorted() {
        let text = "logs logs metrics traces logs metrics retention traces alerts";
        let keywords = extract_keywords(text, 10);
        let unique: HashSet<_> = keywords.iter().collect();
        assert_eq!(unique.len(), keywords.len());

        let tokens = tokenize(text);
        let count = |w: &str| tokens.iter().filter(|t| t.as_str() == w).count();
        for pair in keywords.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(count(a) > count(b) || (count(a) == count(b) && a < b));
        }
    }

    #[test]
    fn test_dedup_preserving_order() {
        let items = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_preserving_order(items), vec!["b", "a"]);
    }
}
