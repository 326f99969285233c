//! Command entry point: wire inputs, services and the promotion flow

pub mod style;

use anstream::println;
use anyhow::Context;
use automerge::actions::{join_numbers, set_output};
use automerge::config::{ActionConfig, EnvInputs};
use automerge::event::{EventContext, EventKind};
use automerge::notify::create_notifier;
use automerge::platform::GitHubService;
use automerge::promote::{PromotionReport, Promoter};
use std::path::Path;
use style::{Stylize, arrow, check, cross};
use tracing::info;

/// Runner context, as collected by the command line
#[derive(Debug, Clone)]
pub struct RunContext<'a> {
    /// Event name (`push`, `check_run`, ...)
    pub event_name: &'a str,
    /// Webhook payload file
    pub event_path: Option<&'a Path>,
    /// `owner/name`
    pub repository: &'a str,
    /// Ref the event ran on
    pub git_ref: &'a str,
    /// REST API root
    pub api_url: &'a str,
    /// Log writes instead of performing them
    pub dry_run: bool,
}

/// Run one promotion and report the outcome
pub async fn run(ctx: RunContext<'_>) -> anyhow::Result<()> {
    let mut config =
        ActionConfig::from_inputs(&EnvInputs).context("failed to read action inputs")?;
    config.dry_run = ctx.dry_run;

    if !config.has_targets() {
        info!("no auto-merge branches configured, nothing to do");
        write_outputs(&PromotionReport::default())?;
        return Ok(());
    }

    let event = EventContext::load(
        EventKind::parse(ctx.event_name),
        ctx.event_path,
        ctx.repository,
        ctx.git_ref,
    )
    .context("failed to load event context")?;

    let platform = GitHubService::new(&config.token, event.repo.clone(), ctx.api_url)
        .context("failed to create GitHub client")?;
    let notifier =
        create_notifier(config.slack.as_ref()).context("failed to create chat notifier")?;

    let report = Promoter::new(&config, &platform, notifier.as_ref())
        .run(&event)
        .await?;

    write_outputs(&report)?;

    print_summary(&report);

    if let Some(err) = report.failure() {
        return Err(err.into());
    }

    info!("done");
    Ok(())
}

/// Step outputs declared by the action
fn write_outputs(report: &PromotionReport) -> automerge::error::Result<()> {
    set_output("merged", &join_numbers(&report.merged))?;
    set_output("created", &join_numbers(&report.created))
}

fn format_numbers(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| format!("#{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print the run summary
fn print_summary(report: &PromotionReport) {
    println!();
    println!("{}:", "Promotion summary".emphasis());

    if !report.merged.is_empty() {
        println!("  {} merged: {}", check(), format_numbers(&report.merged).accent());
    }
    if !report.created.is_empty() {
        println!("  {} created: {}", arrow(), format_numbers(&report.created).accent());
    }
    if !report.reused.is_empty() {
        println!("  {} reused: {}", arrow(), format_numbers(&report.reused).accent());
    }
    for skipped in &report.skipped {
        let pr = skipped
            .pr_number
            .map_or_else(|| "new PR".to_string(), |n| format!("PR #{n}"));
        println!(
            "  {} skipped {} ({} -> {}): {}",
            "-".muted(),
            pr,
            skipped.head,
            skipped.base,
            skipped.reason.to_string().muted()
        );
    }
    for branch in &report.missing_branches {
        println!("  {} missing branch: {}", cross(), branch.warn());
    }
    if !report.failed_merges.is_empty() {
        println!(
            "  {} merge failed: {}",
            cross(),
            format_numbers(&report.failed_merges).failure()
        );
    }
    if report.merged.is_empty()
        && report.created.is_empty()
        && report.reused.is_empty()
        && report.skipped.is_empty()
        && report.missing_branches.is_empty()
        && report.failed_merges.is_empty()
    {
        println!("  {}", "Nothing to do".muted());
    }
}
