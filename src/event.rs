//! Triggering event context
//!
//! The runner writes the webhook payload to a JSON file and names the event
//! in the environment. Only the fields the promotion logic reads are
//! modelled here; everything else in the payload is ignored.

use crate::error::{Error, Result};
use crate::types::RepoConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Kind of event that triggered the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Branch push
    Push,
    /// Pull request review submitted
    PullRequestReview,
    /// Check run created/completed
    CheckRun,
    /// Anything else (ignored)
    Other(String),
}

impl EventKind {
    /// Map a runner event name to a kind
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "push" => Self::Push,
            "pull_request_review" => Self::PullRequestReview,
            "check_run" => Self::CheckRun,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::PullRequestReview => write!(f, "pull_request_review"),
            Self::CheckRun => write!(f, "check_run"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A git ref inside a payload PR object
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// A label inside a payload PR object
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadLabel {
    /// Label name
    pub name: String,
}

/// Pull request sub-object of a webhook payload
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadPullRequest {
    /// PR number
    pub number: u64,
    /// Head branch
    pub head: PayloadRef,
    /// Base branch
    pub base: PayloadRef,
    /// Labels (absent in check-run PR objects)
    #[serde(default)]
    pub labels: Vec<PayloadLabel>,
}

impl PayloadPullRequest {
    /// Label names
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}

/// Review sub-object
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadReview {
    /// `approved`, `changes_requested`, `commented`, ...
    pub state: String,
}

/// Check-run sub-object
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadCheckRun {
    /// Check-run name
    #[serde(default)]
    pub name: Option<String>,
    /// `queued`, `in_progress` or `completed`
    pub status: String,
    /// Set once completed
    #[serde(default)]
    pub conclusion: Option<String>,
    /// PRs whose head matches the checked commit
    #[serde(default)]
    pub pull_requests: Vec<PayloadPullRequest>,
}

impl PayloadCheckRun {
    /// Completed with a `success` conclusion
    pub fn succeeded(&self) -> bool {
        self.status == "completed" && self.conclusion.as_deref() == Some("success")
    }
}

/// The parts of the webhook payload the bot reads
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EventPayload {
    /// Present on review events
    #[serde(default)]
    pub pull_request: Option<PayloadPullRequest>,
    /// Present on review events
    #[serde(default)]
    pub review: Option<PayloadReview>,
    /// Present on check-run events
    #[serde(default)]
    pub check_run: Option<PayloadCheckRun>,
}

/// Everything known about the triggering event
#[derive(Debug, Clone)]
pub struct EventContext {
    /// Event kind
    pub kind: EventKind,
    /// Git ref the event ran on (`refs/heads/main`)
    pub git_ref: String,
    /// Repository the event belongs to
    pub repo: RepoConfig,
    /// Parsed payload
    pub payload: EventPayload,
}

impl EventContext {
    /// Load the context from runner values and the payload file.
    ///
    /// A missing `payload_path` yields an empty payload; push handling
    /// only needs the ref.
    pub fn load(
        kind: EventKind,
        payload_path: Option<&Path>,
        repository: &str,
        git_ref: &str,
    ) -> Result<Self> {
        let repo = RepoConfig::parse(repository).ok_or_else(|| {
            Error::Event(format!(
                "repository must be 'owner/name', got '{repository}'"
            ))
        })?;

        let payload = match payload_path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::Event(format!("failed to read {}: {e}", path.display()))
                })?;
                let raw: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
                    Error::Event(format!("failed to parse {}: {e}", path.display()))
                })?;
                debug!(payload = %raw, "event payload");
                serde_json::from_value(raw).map_err(|e| {
                    Error::Event(format!("unexpected payload in {}: {e}", path.display()))
                })?
            }
            None => EventPayload::default(),
        };

        Ok(Self {
            kind,
            git_ref: git_ref.to_string(),
            repo,
            payload,
        })
    }

    /// Branch name of the ref (`refs/heads/` stripped)
    pub fn head_branch(&self) -> Result<&str> {
        self.git_ref
            .strip_prefix(BRANCH_REF_PREFIX)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| Error::Event(format!("'{}' is not a branch ref", self.git_ref)))
    }

    /// Whether the review in the payload is an approval
    pub fn review_approved(&self) -> bool {
        self.payload
            .review
            .as_ref()
            .is_some_and(|r| r.state.eq_ignore_ascii_case("approved"))
    }

    /// Whether the check run in the payload completed successfully
    pub fn check_run_succeeded(&self) -> bool {
        self.payload
            .check_run
            .as_ref()
            .is_some_and(PayloadCheckRun::succeeded)
    }
}
