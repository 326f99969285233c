//! automerge CLI

mod cli;

use automerge::actions::{init_logging, runner_debug_enabled};
use automerge::platform::DEFAULT_API_URL;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "automerge")]
#[command(about = "Promote branches by opening and auto-merging pull requests from CI events")]
#[command(version)]
struct Cli {
    /// Name of the triggering event
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: String,

    /// Path to the webhook payload JSON
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Git ref the event ran on
    #[arg(long = "ref", env = "GITHUB_REF", default_value = "")]
    git_ref: String,

    /// GitHub REST API root
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Log pull request creation, labeling and merges instead of performing them
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose || runner_debug_enabled());

    let ctx = cli::RunContext {
        event_name: &cli.event_name,
        event_path: cli.event_path.as_deref(),
        repository: &cli.repository,
        git_ref: &cli.git_ref,
        api_url: &cli.api_url,
        dry_run: cli.dry_run,
    };

    match cli::run(ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
