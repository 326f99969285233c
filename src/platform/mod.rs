//! Platform services
//!
//! Abstracts the remote repository API so the promotion logic can run
//! against GitHub or a test double.

mod github;

pub use github::{DEFAULT_API_URL, GitHubService};

use crate::error::Result;
use crate::types::{MergeMethod, MergeResult, PullRequest, RepoConfig};
use async_trait::async_trait;

/// Platform service trait for branch and PR operations
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List the names of all branches in the repository
    async fn list_branches(&self) -> Result<Vec<String>>;

    /// Find open PRs from `head` into `base`
    async fn find_open_prs(&self, head: &str, base: &str) -> Result<Vec<PullRequest>>;

    /// Fetch a single PR by number
    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest>;

    /// Create a new PR
    async fn create_pr(&self, head: &str, base: &str, title: &str) -> Result<PullRequest>;

    /// Add labels to a PR
    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Merge a PR with the specified method
    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult>;

    /// Repository this service talks to
    fn config(&self) -> &RepoConfig;
}
