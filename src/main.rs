//! repo-reader - Gather a repository's source files into an LLM token budget
//!
//! repo-reader provides:
//! - Extension-driven file search with ignore-file support
//! - Greedy token budgeting over the encoded files
//! - Settings layered from a VS Code style settings file and CLI flags
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod backends;
mod cli;
mod core;
mod flows;
mod host;

fn init_logging(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "repo_reader=debug"
    } else if quiet {
        "repo_reader=warn"
    } else {
        "repo_reader=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    cli::run(cli).await
}
