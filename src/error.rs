//! Error types for automerge

use thiserror::Error;

/// Errors produced while promoting branches
#[derive(Debug, Error)]
pub enum Error {
    /// An action input is missing or malformed
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The event payload or runner context could not be understood
    #[error("invalid event: {0}")]
    Event(String),

    /// GitHub API call failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform failure (used by test doubles and wrappers)
    #[error("platform error: {0}")]
    Platform(String),

    /// A merge was attempted and did not succeed
    #[error("merge of PR #{pr_number} failed: {message}")]
    MergeFailed {
        /// PR that could not be merged
        pr_number: u64,
        /// Reason reported by the platform
        message: String,
    },

    /// The run ended with failed merges
    #[error("merge failed for {}", pr_list(.0))]
    MergesFailed(Vec<u64>),

    /// Chat notification failed
    #[error("notification failed: {0}")]
    Notify(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => Self::GitHubApi(source.message),
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Notify(err.to_string())
    }
}

fn pr_list(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| format!("#{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
