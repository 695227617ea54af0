//! Retrieval query synthesis.
//!
//! Turns normalized feedback, profile keywords and gap terms into short
//! templated queries. Generation order is fixed and decides which queries
//! survive the cap:
//!
//! 1. facet templates (coverage, redundancy, practicality, cohesion)
//! 2. gap templates for missing profile terms
//! 3. profile x feedback hybrids
//!
//! Candidates are then filtered: blank, uninformative and duplicate queries
//! are dropped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;
use crate::feedback::{facet_comment, normalize_feedback_keys, Facet};
use crate::gaps::missing_terms_scanning;
use crate::text::{dedup_preserving_order, extract_keywords, is_generic, tokenize};
use crate::types::{FeedbackMap, SpecText};

/// Where a synthesized query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "facet")]
pub enum QuerySource {
    /// Facet template filled with a keyword from that facet's comment
    Facet(Facet),
    /// Template for a profile term missing from the group
    MissingTerm,
    /// Profile keyword combined with a feedback keyword
    Hybrid,
}

/// A query together with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizedQuery {
    /// Query text
    pub text: String,
    /// Generator that produced it
    pub source: QuerySource,
}

/// Why a candidate query was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Empty or whitespace only
    Blank,
    /// Nothing left after tokenization
    NoTokens,
    /// Only generic vocabulary
    AllGeneric,
    /// Fewer than two meaningful tokens
    TooFewTokens,
    /// Already accepted earlier
    Duplicate,
}

/// Checks whether a query carries enough signal to be worth a ranking slot.
///
/// Duplicates are not detected here; see [`QuerySynthesizer`].
pub fn check_query(query: &str) -> Result<(), Rejection> {
    if query.trim().is_empty() {
        return Err(Rejection::Blank);
    }
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Err(Rejection::NoTokens);
    }
    if tokens.iter().all(|t| is_generic(t)) {
        return Err(Rejection::AllGeneric);
    }
    if tokens.len() < 2 {
        return Err(Rejection::TooFewTokens);
    }
    Ok(())
}

/// The two templates for a facet keyword.
fn facet_queries(facet: Facet, w: &str) -> [String; 2] {
    match facet {
        Facet::Coverage => [
            format!("coverage gaps for {w}"),
            format!("requirements to include {w}"),
        ],
        Facet::Redundancy => [
            format!("deduplicate overlapping requirements {w}"),
            format!("merge similar policies {w}"),
        ],
        Facet::Practicality => [
            format!("practical constraints and feasibility {w}"),
            format!("operational constraints {w}"),
        ],
        Facet::Cohesion => [
            format!("ensure group cohesion around {w}"),
            format!("align terminology for {w}"),
        ],
    }
}

fn missing_term_queries(t: &str) -> [String; 2] {
    [format!("coverage missing {t}"), format!("best practices for {t}")]
}

fn hybrid_query(a: &str, b: &str) -> String {
    format!("{a} {b} requirements")
}

/// Keywords gathered from every input before templates are filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySeeds {
    /// Keywords per facet, in [`Facet::ALL`] order
    pub facet_keywords: Vec<(Facet, Vec<String>)>,
    /// Deduplicated keywords from both profiles, domain first
    pub profile_keywords: Vec<String>,
    /// Profile terms not found in the group
    pub missing_terms: Vec<String>,
    /// Feedback keywords paired with profile keywords in hybrids
    pub mix_source: Vec<String>,
}

/// Builds retrieval queries from feedback and profiles.
///
/// # Examples
///
/// ```
/// use ragloop_core::{FeedbackMap, QuerySynthesizer, RetrievalConfig, Spec};
///
/// let mut feedback = FeedbackMap::new();
/// feedback.insert("Coverage".into(), "no mention of encryption".into());
///
/// let synth = QuerySynthesizer::new(RetrievalConfig::default());
/// let queries = synth.build::<Spec>(&feedback, "cloud storage", "", None);
/// assert_eq!(queries[0], "coverage gaps for encryption");
/// ```
#[derive(Clone, Debug, Default)]
pub struct QuerySynthesizer {
    config: RetrievalConfig,
}

impl QuerySynthesizer {
    /// Creates a synthesizer with the given caps.
    pub fn new(config: RetrievalConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Extracts facet, profile, gap and mix keywords.
    pub fn seeds<S: SpecText>(
        &self,
        feedback: &FeedbackMap,
        domain_profile: &str,
        task_profile: &str,
        group_specs: Option<&[S]>,
    ) -> QuerySeeds {
        let cfg = &self.config;
        let normalized = normalize_feedback_keys(feedback);

        let facet_keywords: Vec<(Facet, Vec<String>)> = Facet::ALL
            .iter()
            .map(|&facet| {
                let comment = facet_comment(&normalized, facet);
                (facet, extract_keywords(comment, cfg.facet_keywords))
            })
            .collect();

        let mut profile_keywords = extract_keywords(domain_profile, cfg.profile_keywords_each);
        profile_keywords.extend(extract_keywords(task_profile, cfg.profile_keywords_each));
        profile_keywords.truncate(cfg.profile_keywords_cap);
        let profile_keywords = dedup_preserving_order(profile_keywords);

        let missing_terms = missing_terms_scanning(
            group_specs,
            domain_profile,
            task_profile,
            cfg.gap_scan_keywords,
            cfg.max_missing_terms,
        );

        let mix_source = facet_keywords
            .iter()
            .map(|(_, keywords)| keywords)
            .chain(std::iter::once(&missing_terms))
            .find(|keywords| !keywords.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                let all_feedback = normalized
                    .values()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                extract_keywords(&all_feedback, cfg.fallback_mix_keywords)
            });

        QuerySeeds {
            facet_keywords,
            profile_keywords,
            missing_terms,
            mix_source,
        }
    }

    /// Fills every template in generation order, before filtering.
    pub fn candidates(&self, seeds: &QuerySeeds) -> Vec<SynthesizedQuery> {
        let cfg = &self.config;
        let mut out = Vec::new();

        for (facet, keywords) in &seeds.facet_keywords {
            for w in keywords.iter().take(cfg.keywords_per_facet_template) {
                for text in facet_queries(*facet, w) {
                    out.push(SynthesizedQuery {
                        text,
                        source: QuerySource::Facet(*facet),
                    });
                }
            }
        }

        for t in seeds.missing_terms.iter().take(cfg.missing_terms_for_queries) {
            for text in missing_term_queries(t) {
                out.push(SynthesizedQuery {
                    text,
                    source: QuerySource::MissingTerm,
                });
            }
        }

        for a in seeds.profile_keywords.iter().take(cfg.hybrid_profile_terms) {
            for b in seeds.mix_source.iter().take(cfg.hybrid_mix_terms) {
                out.push(SynthesizedQuery {
                    text: hybrid_query(a, b),
                    source: QuerySource::Hybrid,
                });
            }
        }

        out
    }

    /// Filters candidates and applies the query cap.
    pub fn select(&self, candidates: Vec<SynthesizedQuery>) -> Vec<SynthesizedQuery> {
        let max_queries = self.config.max_queries;
        let mut seen: HashSet<String> = HashSet::new();
        let mut accepted = Vec::new();
        let mut rejected = 0usize;

        for candidate in candidates {
            if accepted.len() >= max_queries {
                break;
            }

            let text = candidate.text.trim().to_string();
            let verdict = check_query(&text).and_then(|()| {
                if seen.contains(&text) {
                    Err(Rejection::Duplicate)
                } else {
                    Ok(())
                }
            });

            match verdict {
                Ok(()) => {
                    seen.insert(text.clone());
                    accepted.push(SynthesizedQuery {
                        text,
                        source: candidate.source,
                    });
                }
                Err(reason) => {
                    rejected += 1;
                    tracing::trace!("Dropped query {:?}: {:?}", text, reason);
                }
            }
        }

        tracing::debug!(
            "Selected {} queries ({} rejected, cap {})",
            accepted.len(),
            rejected,
            max_queries
        );
        accepted
    }

    /// Builds queries with their sources.
    pub fn build_detailed<S: SpecText>(
        &self,
        feedback: &FeedbackMap,
        domain_profile: &str,
        task_profile: &str,
        group_specs: Option<&[S]>,
    ) -> Vec<SynthesizedQuery> {
        let seeds = self.seeds(feedback, domain_profile, task_profile, group_specs);
        self.select(self.candidates(&seeds))
    }

    /// Builds query strings.
    pub fn build<S: SpecText>(
        &self,
        feedback: &FeedbackMap,
        domain_profile: &str,
        task_profile: &str,
        group_specs: Option<&[S]>,
    ) -> Vec<String> {
        self.build_detailed(feedback, domain_profile, task_profile, group_specs)
            .into_iter()
            .map(|q| q.text)
            .collect()
    }
}

/// Builds up to `max_queries` unique retrieval queries with default caps.
pub fn build_retrieval_queries_from_feedback<S: SpecText>(
    feedback: &FeedbackMap,
    domain_profile: &str,
    task_profile: &str,
    max_queries: usize,
    group_specs: Option<&[S]>,
) -> Vec<String> {
    let config = RetrievalConfig::default().with_max_queries(max_queries);
    QuerySynthesizer::new(config).build(feedback, domain_profile, task_profile, group_specs)
}
