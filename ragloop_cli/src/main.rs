mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

/// Builds the log filter from `RUST_LOG` directives, falling back to `warn`
/// when they are absent or malformed. `--verbose` raises the default level
/// to `debug`.
fn log_filter(env_directives: Option<&str>, verbose: bool) -> Result<EnvFilter> {
    let mut filter = env_directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    if verbose {
        filter = filter.add_directive("debug".parse()?);
    }
    Ok(filter)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(env_directives.as_deref(), cli.verbose)?)
        .init();

    tracing::debug!("ragloop v{}", ragloop_core::VERSION);

    let output = cli::run(cli).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_rust_log_level_is_kept() {
        let filter = log_filter(Some("debug"), false).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = log_filter(Some("trace"), false).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_default_is_warn() {
        let filter = log_filter(None, false).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));

        let filter = log_filter(Some("  "), false).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_verbose_raises_to_debug() {
        let filter = log_filter(None, true).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_malformed_rust_log_falls_back() {
        let filter = log_filter(Some("ragloop=loudest"), false).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }
}
