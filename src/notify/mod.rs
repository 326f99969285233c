//! Chat notifications
//!
//! Notifications are a side channel: callers log delivery failures and
//! carry on. Use [`notify_best_effort`] for that.

mod slack;

pub use slack::{SLACK_API_URL, SlackNotifier};

use crate::config::SlackConfig;
use crate::error::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Something worth telling the channel about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A promotion PR was opened
    PullRequestCreated {
        /// Repository `owner/name`
        repository: String,
        /// PR number
        pr_number: u64,
        /// Head branch
        head: String,
        /// Base branch
        base: String,
        /// Web URL
        url: String,
    },
    /// A promotion PR was merged
    Merged {
        /// Repository `owner/name`
        repository: String,
        /// PR number
        pr_number: u64,
        /// Head branch
        head: String,
        /// Base branch
        base: String,
        /// Merge commit
        sha: Option<String>,
    },
    /// A merge attempt failed
    MergeFailed {
        /// Repository `owner/name`
        repository: String,
        /// PR number
        pr_number: u64,
        /// Head branch
        head: String,
        /// Base branch
        base: String,
        /// Failure reason
        reason: String,
    },
    /// A configured target branch does not exist
    BranchMissing {
        /// Repository `owner/name`
        repository: String,
        /// Missing branch
        branch: String,
    },
}

impl Notification {
    /// One-line headline
    pub fn title(&self) -> String {
        match self {
            Self::PullRequestCreated { pr_number, .. } => {
                format!("Promotion PR #{pr_number} opened")
            }
            Self::Merged { pr_number, .. } => format!("Promotion PR #{pr_number} merged"),
            Self::MergeFailed { pr_number, .. } => {
                format!("Promotion PR #{pr_number} failed to merge")
            }
            Self::BranchMissing { branch, .. } => format!("Target branch `{branch}` not found"),
        }
    }

    /// Markdown body
    pub fn body(&self) -> String {
        match self {
            Self::PullRequestCreated {
                repository,
                head,
                base,
                url,
                ..
            } => format!("`{head}` → `{base}` in `{repository}`\n{url}"),
            Self::Merged {
                repository,
                head,
                base,
                sha,
                ..
            } => {
                let sha = sha.as_deref().unwrap_or("(no sha)");
                format!("`{head}` → `{base}` in `{repository}`\nMerge commit: `{sha}`")
            }
            Self::MergeFailed {
                repository,
                head,
                base,
                reason,
                ..
            } => format!("`{head}` → `{base}` in `{repository}`\n*Reason:* {reason}"),
            Self::BranchMissing { repository, branch } => {
                format!("`{branch}` is configured for auto-merge but does not exist in `{repository}`")
            }
        }
    }

    /// Whether the notification reports a problem
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::MergeFailed { .. } | Self::BranchMissing { .. })
    }
}

/// Chat channel that can deliver notifications
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Channel name for logs
    fn name(&self) -> &'static str;

    /// Deliver a notification
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Notifier used when no chat channel is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl ChatNotifier for DisabledNotifier {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        debug!(title = %notification.title(), "chat notifications disabled, not sending");
        Ok(())
    }
}

/// Build the notifier for the configured channel
pub fn create_notifier(config: Option<&SlackConfig>) -> Result<Box<dyn ChatNotifier>> {
    match config {
        Some(slack) => Ok(Box::new(SlackNotifier::new(slack.clone(), SLACK_API_URL)?)),
        None => Ok(Box::new(DisabledNotifier)),
    }
}

/// Send a notification, logging instead of propagating failures
pub async fn notify_best_effort(notifier: &dyn ChatNotifier, notification: &Notification) {
    if let Err(e) = notifier.send(notification).await {
        warn!(
            channel = notifier.name(),
            error = %e,
            "failed to send chat notification"
        );
    }
}
