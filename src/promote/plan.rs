//! Promotion planning - pure decisions
//!
//! No I/O happens here. Execution feeds in the branch list, the PR labels
//! and the event, and acts on what comes back.

use crate::config::AutoMergeTriggers;
use crate::event::{EventContext, EventKind};

/// A configured target branch checked against the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetBranch {
    /// Branch exists
    Present(String),
    /// Branch is configured but not in the repository
    Missing(String),
}

impl TargetBranch {
    /// Branch name
    pub fn name(&self) -> &str {
        match self {
            Self::Present(name) | Self::Missing(name) => name,
        }
    }
}

/// What to do with a resolved promotion PR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// Attempt the merge
    Merge,
    /// The PR lacks the auto-merge label
    SkipUnlabeled,
    /// The triggering event may not merge
    SkipUnauthorized,
}

impl std::fmt::Display for MergeDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::SkipUnlabeled => write!(f, "missing auto-merge label"),
            Self::SkipUnauthorized => write!(f, "event not allowed to merge"),
        }
    }
}

/// Check configured branches against the repository's branch list.
///
/// Order follows `configured`; repeated entries keep their first position.
#[must_use]
pub fn resolve_targets(configured: &[String], branches: &[String]) -> Vec<TargetBranch> {
    let mut seen: Vec<&str> = Vec::new();
    let mut result = Vec::new();

    for name in configured {
        if seen.contains(&name.as_str()) {
            continue;
        }
        seen.push(name);

        if branches.iter().any(|b| b == name) {
            result.push(TargetBranch::Present(name.clone()));
        } else {
            result.push(TargetBranch::Missing(name.clone()));
        }
    }

    result
}

/// Label gate followed by event authorization.
#[must_use]
pub fn decide_merge(labels: &[String], label: &str, authorized: bool) -> MergeDecision {
    if !labels.iter().any(|l| l == label) {
        MergeDecision::SkipUnlabeled
    } else if authorized {
        MergeDecision::Merge
    } else {
        MergeDecision::SkipUnauthorized
    }
}

/// Whether the triggering event is allowed to merge.
///
/// Reviews must be approvals and check runs must have completed
/// successfully, on top of the per-event switch.
#[must_use]
pub fn event_authorizes_merge(event: &EventContext, triggers: &AutoMergeTriggers) -> bool {
    match event.kind {
        EventKind::Push => triggers.push,
        EventKind::PullRequestReview => triggers.review && event.review_approved(),
        EventKind::CheckRun => triggers.check_run && event.check_run_succeeded(),
        EventKind::Other(_) => false,
    }
}

/// Title for a PR opened by the bot
#[must_use]
pub fn pr_title(head: &str, base: &str) -> String {
    format!("{head} -> {base}")
}
