//! Single-pass retrieval: synthesize queries, then rank a candidate pool.

use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;
use crate::queries::{QuerySynthesizer, SynthesizedQuery};
use crate::ranking::{RankedSpec, SpecRanker};
use crate::types::{FeedbackMap, Spec, SpecText};

/// Inputs for one retrieval pass.
///
/// Deserializes from JSON such as:
///
/// ```json
/// {
///   "feedback": {"Coverage": "nothing on key rotation"},
///   "domain_profile": "cloud storage security",
///   "task_profile": "write access control requirements",
///   "group_specs": [{"id": "S1", "text": "Encrypt data at rest"}]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalRequest {
    /// Judge comments keyed by facet label
    pub feedback: FeedbackMap,
    /// Domain description
    pub domain_profile: String,
    /// Task description
    pub task_profile: String,
    /// Specs already in the group under review
    pub group_specs: Option<Vec<Spec>>,
}

impl RetrievalRequest {
    /// Parses a request from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn group(&self) -> Option<&[Spec]> {
        self.group_specs.as_deref()
    }
}

/// Result of one retrieval pass.
#[derive(Debug, Clone)]
pub struct RetrievalOutcome<'a, S> {
    /// Queries used for ranking, in generation order
    pub queries: Vec<SynthesizedQuery>,
    /// Profile terms the group does not cover
    pub missing_terms: Vec<String>,
    /// Selected candidates, best first
    pub selected: Vec<RankedSpec<'a, S>>,
}

impl<'a, S> RetrievalOutcome<'a, S> {
    /// Query strings only.
    pub fn query_texts(&self) -> Vec<&str> {
        self.queries.iter().map(|q| q.text.as_str()).collect()
    }

    /// Selected specs only.
    pub fn specs(&self) -> Vec<&'a S> {
        self.selected.iter().map(|r| r.spec).collect()
    }
}

/// Builds queries for `request` and selects matching `candidates`.
pub fn retrieve<'a, S: SpecText>(
    request: &RetrievalRequest,
    candidates: &'a [S],
    config: &RetrievalConfig,
) -> RetrievalOutcome<'a, S> {
    let synth = QuerySynthesizer::new(config.clone());
    let seeds = synth.seeds(
        &request.feedback,
        &request.domain_profile,
        &request.task_profile,
        request.group(),
    );
    let queries = synth.select(synth.candidates(&seeds));

    let texts: Vec<&str> = queries.iter().map(|q| q.text.as_str()).collect();
    let selected = SpecRanker::with_config(texts.as_slice(), config).rank(candidates);

    tracing::debug!(
        "Retrieval pass: {} queries, {} missing terms, {} of {} candidates selected",
        queries.len(),
        seeds.missing_terms.len(),
        selected.len(),
        candidates.len()
    );

    RetrievalOutcome {
        queries,
        missing_terms: seeds.missing_terms,
        selected,
    }
}
