//! ragloop - Feedback-driven retrieval query synthesis
//!
//! This crate is the query-generation and ranking stage of a
//! retrieval-augmented refinement loop. Judge feedback says what a document
//! group is missing or doing wrong; ragloop turns that feedback into short
//! retrieval queries and picks which candidate specs to keep.
//!
//! # Overview
//!
//! - **Tokenizer / keywords** ([`text`]): lowercase word tokens, stopword
//!   filtering, frequency keywords
//! - **Feedback** ([`feedback`]): folds judge labels onto canonical facets
//! - **Gaps** ([`gaps`]): profile terms absent from the current group
//! - **Queries** ([`queries`]): templated, filtered, deduplicated queries
//! - **Ranking** ([`ranking`]): lexical token-containment scoring
//! - **Pipeline** ([`pipeline`]): one synthesize-then-rank pass
//!
//! Every operation is synchronous, pure and total: bad or empty input gives
//! empty output, never an error. Only config loading and JSON parsing can
//! fail.
//!
//! # Quick Start
//!
//! ```rust
//! use ragloop_core::{
//!     build_retrieval_queries_from_feedback, select_specs_by_queries, FeedbackMap, Spec,
//! };
//!
//! let mut feedback = FeedbackMap::new();
//! feedback.insert("Coverage Notes".into(), "key rotation is never mentioned".into());
//!
//! let group = vec![Spec::new("Encrypt cloud buckets at rest")];
//! let queries = build_retrieval_queries_from_feedback(
//!     &feedback,
//!     "cloud storage encryption",
//!     "access control",
//!     8,
//!     Some(group.as_slice()),
//! );
//! assert!(!queries.is_empty());
//!
//! let pool = vec![Spec::new("Rotate key material yearly"), Spec::new("Lunch menu")];
//! let picked = select_specs_by_queries(&pool, &queries, 5);
//! assert_eq!(picked.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod feedback;
pub mod gaps;
pub mod pipeline;
pub mod queries;
pub mod ranking;
pub mod text;
pub mod types;

// Re-export commonly used types
pub use config::{RetrievalConfig, DEFAULT_MAX_QUERIES, DEFAULT_TOP_K};
pub use error::{Result, RetrievalError};
pub use feedback::{normalize_feedback_keys, Facet};
pub use gaps::missing_profile_terms;
pub use pipeline::{retrieve, RetrievalOutcome, RetrievalRequest};
pub use queries::{
    build_retrieval_queries_from_feedback, QuerySource, QuerySynthesizer, SynthesizedQuery,
};
pub use ranking::{rank_specs, select_specs_by_queries, RankedSpec, SpecRanker};
pub use text::{extract_keywords, tokenize, DEFAULT_MAX_KEYWORDS};
pub use types::{FeedbackMap, Spec, SpecText};

/// Version of the ragloop core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
