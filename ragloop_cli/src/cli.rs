//! Command-line interface for ragloop.
//!
//! Thin front end over `ragloop_core` for inspecting what a feedback round
//! would ask for and which candidates it would keep.
//!
//! # Examples
//!
//! Show the queries a request produces:
//!
//! ```bash
//! $ ragloop queries --input request.json
//! ```
//!
//! Rank a candidate pool:
//!
//! ```bash
//! $ ragloop rank --input request.json --candidates pool.json --top-k 3
//! ```
//!
//! Keywords of a piece of text:
//!
//! ```bash
//! $ ragloop keywords "key rotation and key escrow"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ragloop_core::gaps::missing_terms_scanning;
use ragloop_core::{
    extract_keywords, retrieve, QuerySynthesizer, RetrievalConfig, RetrievalRequest, Spec,
    DEFAULT_MAX_KEYWORDS,
};
use serde::Serialize;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ragloop", version, about = "Feedback-driven retrieval queries")]
pub struct Cli {
    /// YAML file overriding the default caps
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub action: Action,
}

/// Actions available via CLI.
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Print the queries synthesized for a request
    Queries {
        /// Request JSON (feedback, profiles, group specs)
        #[arg(short, long)]
        input: PathBuf,

        /// Override the query cap
        #[arg(long)]
        max_queries: Option<usize>,

        /// Print JSON with query sources instead of plain lines
        #[arg(long)]
        json: bool,
    },

    /// Print profile terms missing from the request's group
    Gaps {
        /// Request JSON
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Rank candidate specs against the request's queries
    Rank {
        /// Request JSON
        #[arg(short, long)]
        input: PathBuf,

        /// JSON array of candidate specs
        #[arg(long)]
        candidates: PathBuf,

        /// Override the selection cap
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Print frequency keywords of a text
    Keywords {
        /// Text to analyse
        text: String,

        /// Maximum number of keywords
        #[arg(long, default_value_t = DEFAULT_MAX_KEYWORDS)]
        max_k: usize,
    },
}

/// One ranked candidate in `rank` output.
#[derive(Serialize, Debug)]
struct RankedOutput<'a> {
    score: usize,
    index: usize,
    spec: &'a Spec,
}

/// `rank` output document.
#[derive(Serialize, Debug)]
struct RankOutput<'a> {
    queries: Vec<&'a str>,
    missing_terms: &'a [String],
    selected: Vec<RankedOutput<'a>>,
}

async fn read_request(path: &Path) -> Result<RetrievalRequest> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read request {}", path.display()))?;
    RetrievalRequest::from_json(&raw)
        .with_context(|| format!("failed to parse request {}", path.display()))
}

async fn read_candidates(path: &Path) -> Result<Vec<Spec>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read candidates {}", path.display()))?;
    Spec::parse_list(&raw).with_context(|| format!("failed to parse candidates {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<RetrievalConfig> {
    match path {
        Some(path) => RetrievalConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(RetrievalConfig::default()),
    }
}

/// Runs the parsed command and returns what should be printed to stdout.
pub async fn run(cli: Cli) -> Result<String> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.action {
        Action::Queries {
            input,
            max_queries,
            json,
        } => {
            if let Some(max_queries) = max_queries {
                config = config.with_max_queries(max_queries);
            }
            let request = read_request(&input).await?;
            let queries = QuerySynthesizer::new(config).build_detailed(
                &request.feedback,
                &request.domain_profile,
                &request.task_profile,
                request.group_specs.as_deref(),
            );

            if json {
                Ok(serde_json::to_string_pretty(&queries)?)
            } else {
                Ok(lines(queries.iter().map(|q| q.text.as_str())))
            }
        }
        Action::Gaps { input } => {
            let request = read_request(&input).await?;
            let gaps = missing_terms_scanning(
                request.group_specs.as_deref(),
                &request.domain_profile,
                &request.task_profile,
                config.gap_scan_keywords,
                config.max_missing_terms,
            );
            Ok(lines(gaps.iter().map(String::as_str)))
        }
        Action::Rank {
            input,
            candidates,
            top_k,
        } => {
            if let Some(top_k) = top_k {
                config = config.with_top_k(top_k);
            }
            let request = read_request(&input).await?;
            let pool = read_candidates(&candidates).await?;
            let outcome = retrieve(&request, &pool, &config);

            let output = RankOutput {
                queries: outcome.query_texts(),
                missing_terms: &outcome.missing_terms,
                selected: outcome
                    .selected
                    .iter()
                    .map(|r| RankedOutput {
                        score: r.score,
                        index: r.index,
                        spec: r.spec,
                    })
                    .collect(),
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        Action::Keywords { text, max_k } => {
            Ok(lines(extract_keywords(&text, max_k).iter().map(String::as_str)))
        }
    }
}

fn lines<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join("\n")
}
