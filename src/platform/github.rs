//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{MergeMethod, MergeResult, PrState, PullRequest, RepoConfig};
use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::debug;
use url::Url;

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PAGE_SIZE: u8 = 100;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: RepoConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_url` is the REST root (`https://api.github.com`, or
    /// `https://<host>/api/v3` for GitHub Enterprise).
    pub fn new(token: &str, config: RepoConfig, api_url: &str) -> Result<Self> {
        Url::parse(api_url)
            .map_err(|e| Error::Config(format!("invalid API URL '{api_url}': {e}")))?;

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_url.trim_end_matches('/'))
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client, config })
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
        state: if pr.merged_at.is_some() {
            PrState::Merged
        } else {
            match pr.state {
                Some(octocrab::models::IssueState::Closed) => PrState::Closed,
                _ => PrState::Open,
            }
        },
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_branches(&self) -> Result<Vec<String>> {
        debug!(repo = %self.config, "listing branches");
        let first_page = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .list_branches()
            .per_page(PAGE_SIZE)
            .send()
            .await?;

        let branches = self.client.all_pages(first_page).await?;
        let names: Vec<String> = branches.into_iter().map(|b| b.name).collect();
        debug!(count = names.len(), "listed branches");
        Ok(names)
    }

    async fn find_open_prs(&self, head: &str, base: &str) -> Result<Vec<PullRequest>> {
        debug!(head, base, "finding open PRs");
        let head_filter = format!("{}:{}", &self.config.owner, head);

        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .head(head_filter)
            .base(base)
            .state(octocrab::params::State::Open)
            .per_page(PAGE_SIZE)
            .send()
            .await?;

        let result: Vec<PullRequest> = prs.items.iter().map(pr_from_octocrab).collect();
        debug!(head, base, count = result.len(), "found open PRs");
        Ok(result)
    }

    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "getting PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;
        Ok(pr_from_octocrab(&pr))
    }

    async fn create_pr(&self, head: &str, base: &str, title: &str) -> Result<PullRequest> {
        debug!(head, base, "creating PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, head, base)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "adding labels");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_labels(pr_number, labels)
            .await?;
        debug!(pr_number, "added labels");
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        debug!(pr_number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab_method)
            .send()
            .await
            .map_err(|e| Error::MergeFailed {
                pr_number,
                message: Error::from(e).to_string(),
            })?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    fn config(&self) -> &RepoConfig {
        &self.config
    }
}
