//! Tunable caps for query synthesis and ranking.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};

/// Default cap on synthesized queries.
pub const DEFAULT_MAX_QUERIES: usize = 8;

/// Default cap on selected specs.
pub const DEFAULT_TOP_K: usize = 5;

/// Caps used by the query synthesizer and spec ranker.
///
/// Every field has a default, so a YAML file only needs the values it
/// changes:
///
/// ```yaml
/// max_queries: 12
/// top_k: 3
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Maximum number of queries kept after filtering (default: 8)
    pub max_queries: usize,
    /// Maximum number of specs selected (default: 5)
    pub top_k: usize,
    /// Keywords extracted from each facet comment (default: 4)
    pub facet_keywords: usize,
    /// Facet keywords expanded into templates (default: 2)
    pub keywords_per_facet_template: usize,
    /// Keywords taken from each profile for hybrid queries (default: 6)
    pub profile_keywords_each: usize,
    /// Cap on combined profile keywords (default: 8)
    pub profile_keywords_cap: usize,
    /// Keywords scanned from each profile during gap detection (default: 32)
    pub gap_scan_keywords: usize,
    /// Cap on missing profile terms (default: 8)
    pub max_missing_terms: usize,
    /// Missing terms expanded into templates (default: 4)
    pub missing_terms_for_queries: usize,
    /// Profile keywords used in hybrid queries (default: 3)
    pub hybrid_profile_terms: usize,
    /// Mix-source keywords used in hybrid queries (default: 2)
    pub hybrid_mix_terms: usize,
    /// Keywords drawn from all feedback when no facet yields any (default: 4)
    pub fallback_mix_keywords: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_queries: DEFAULT_MAX_QUERIES,
            top_k: DEFAULT_TOP_K,
            facet_keywords: 4,
            keywords_per_facet_template: 2,
            profile_keywords_each: 6,
            profile_keywords_cap: 8,
            gap_scan_keywords: 32,
            max_missing_terms: 8,
            missing_terms_for_queries: 4,
            hybrid_profile_terms: 3,
            hybrid_mix_terms: 2,
            fallback_mix_keywords: 4,
        }
    }
}

impl RetrievalConfig {
    /// Parses a YAML document and validates it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: RetrievalConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&raw)?;
        tracing::debug!("Loaded retrieval config from {}", path.display());
        Ok(config)
    }

    /// Returns a copy with a different query cap.
    pub fn with_max_queries(mut self, max_queries: usize) -> Self {
        self.max_queries = max_queries;
        self
    }

    /// Returns a copy with a different selection cap.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Checks that no stage asks for more terms than its source can hold.
    ///
    /// Zero caps are allowed; they just produce empty output.
    pub fn validate(&self) -> Result<()> {
        let pairs = [
            (
                "keywords_per_facet_template",
                self.keywords_per_facet_template,
                "facet_keywords",
                self.facet_keywords,
            ),
            (
                "missing_terms_for_queries",
                self.missing_terms_for_queries,
                "max_missing_terms",
                self.max_missing_terms,
            ),
            (
                "hybrid_profile_terms",
                self.hybrid_profile_terms,
                "profile_keywords_cap",
                self.profile_keywords_cap,
            ),
        ];

        for (name, value, bound_name, bound) in pairs {
            if value > bound {
                return Err(RetrievalError::InvalidConfig(format!(
                    "{} ({}) exceeds {} ({})",
                    name, value, bound_name, bound
                )));
            }
        }

        if self.max_queries == 0 {
            tracing::warn!("max_queries is 0; no queries will be produced");
        }
        if self.top_k == 0 {
            tracing::warn!("top_k is 0; no specs will be selected");
        }

        Ok(())
    }
}
