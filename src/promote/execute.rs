//! Promotion execution - effectful operations
//!
//! Drives the platform API from the decisions in `plan`. Every remote call
//! is awaited in sequence; nothing is retried.

use crate::config::ActionConfig;
use crate::error::{Error, Result};
use crate::event::{EventContext, EventKind};
use crate::notify::{ChatNotifier, Notification, notify_best_effort};
use crate::platform::PlatformService;
use crate::promote::plan::{
    MergeDecision, TargetBranch, decide_merge, event_authorizes_merge, pr_title, resolve_targets,
};
use crate::types::{PrState, PullRequest};
use tracing::{error, info, warn};

/// Why a PR (or a would-be PR) was left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Decision from the label gate / authorization
    Decision(MergeDecision),
    /// Head and base are the same branch
    SameBranch,
    /// Dry run: the write was only logged
    DryRun,
    /// The PR was already closed or merged
    NotOpen(PrState),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decision(decision) => write!(f, "{decision}"),
            Self::SameBranch => write!(f, "head and base are the same branch"),
            Self::DryRun => write!(f, "dry run"),
            Self::NotOpen(state) => write!(f, "PR is already {state}"),
        }
    }
}

/// A promotion that did not end in a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPr {
    /// Head branch
    pub head: String,
    /// Base branch
    pub base: String,
    /// PR number, when one exists
    pub pr_number: Option<u64>,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Outcome of one run
#[derive(Debug, Clone, Default)]
pub struct PromotionReport {
    /// PRs opened this run
    pub created: Vec<u64>,
    /// Existing PRs that were reused
    pub reused: Vec<u64>,
    /// PRs merged this run
    pub merged: Vec<u64>,
    /// Promotions left alone
    pub skipped: Vec<SkippedPr>,
    /// Configured branches absent from the repository
    pub missing_branches: Vec<String>,
    /// PRs whose merge attempt failed
    pub failed_merges: Vec<u64>,
    /// Whether merge failures fail the run
    pub strict: bool,
}

impl PromotionReport {
    /// Whether the run should be reported as failed
    #[must_use]
    pub const fn run_failed(&self) -> bool {
        self.strict && !self.failed_merges.is_empty()
    }

    /// Error describing the failed run, if any
    pub fn failure(&self) -> Option<Error> {
        if !self.run_failed() {
            return None;
        }
        Some(Error::MergesFailed(self.failed_merges.clone()))
    }

    fn skip(&mut self, head: &str, base: &str, pr_number: Option<u64>, reason: SkipReason) {
        self.skipped.push(SkippedPr {
            head: head.to_string(),
            base: base.to_string(),
            pr_number,
            reason,
        });
    }
}

/// Runs the promotion flow for one event
pub struct Promoter<'a> {
    config: &'a ActionConfig,
    platform: &'a dyn PlatformService,
    notifier: &'a dyn ChatNotifier,
}

impl<'a> Promoter<'a> {
    /// Create a promoter over the given services
    pub fn new(
        config: &'a ActionConfig,
        platform: &'a dyn PlatformService,
        notifier: &'a dyn ChatNotifier,
    ) -> Self {
        Self {
            config,
            platform,
            notifier,
        }
    }

    /// Handle the triggering event
    ///
    /// Merge failures are recorded in the report rather than returned;
    /// check [`PromotionReport::run_failed`]. Any other error aborts the run.
    pub async fn run(&self, event: &EventContext) -> Result<PromotionReport> {
        let mut report = PromotionReport {
            strict: self.config.fail_on_merge_error,
            ..PromotionReport::default()
        };

        if !self.config.has_targets() {
            info!("no auto-merge branches configured, nothing to do");
            return Ok(report);
        }

        let authorized = event_authorizes_merge(event, &self.config.triggers);
        info!(event = %event.kind, repo = %event.repo, authorized, "handling event");

        match &event.kind {
            EventKind::Push => self.on_push(event, authorized, &mut report).await?,
            EventKind::PullRequestReview => {
                self.on_review(event, authorized, &mut report).await?;
            }
            EventKind::CheckRun => self.on_check_run(event, authorized, &mut report).await?,
            EventKind::Other(name) => {
                info!(event = %name, "event does not trigger promotion, skipping");
            }
        }

        Ok(report)
    }

    async fn on_push(
        &self,
        event: &EventContext,
        authorized: bool,
        report: &mut PromotionReport,
    ) -> Result<()> {
        let head = event.head_branch()?;
        info!(head, "promoting pushed branch");

        let branches = self.platform.list_branches().await?;
        info!(?branches, "repository branches");

        for target in resolve_targets(&self.config.target_branches, &branches) {
            match target {
                TargetBranch::Missing(branch) => {
                    error!(branch = %branch, "target branch does not exist, skipping");
                    notify_best_effort(
                        self.notifier,
                        &Notification::BranchMissing {
                            repository: event.repo.to_string(),
                            branch: branch.clone(),
                        },
                    )
                    .await;
                    report.missing_branches.push(branch);
                }
                TargetBranch::Present(base) if base == head => {
                    info!(branch = %base, "target is the pushed branch, skipping");
                    report.skip(head, &base, None, SkipReason::SameBranch);
                }
                TargetBranch::Present(base) => {
                    info!(head, base = %base, "target branch");
                    self.promote_branch(event, head, &base, authorized, report)
                        .await?;
                }
            }
        }

        Ok(())
    }

    /// Find-or-create the head -> base PR, then gate and merge it
    async fn promote_branch(
        &self,
        event: &EventContext,
        head: &str,
        base: &str,
        authorized: bool,
        report: &mut PromotionReport,
    ) -> Result<()> {
        let open = self.platform.find_open_prs(head, base).await?;

        let (pr, labels) = match open.as_slice() {
            [] => {
                let Some(pr) = self.open_labeled_pr(event, head, base, report).await? else {
                    return Ok(());
                };
                // The label was just applied; the returned PR predates it.
                let labels = vec![self.config.label.clone()];
                (pr, labels)
            }
            [pr, rest @ ..] => {
                if !rest.is_empty() {
                    warn!(
                        head,
                        base,
                        count = open.len(),
                        pr_number = pr.number,
                        "multiple open PRs for branch pair, using the first"
                    );
                }
                info!(pr_number = pr.number, head, base, "PR already exists, reusing it");
                info!(pr_number = pr.number, labels = ?pr.labels, "PR labels");
                report.reused.push(pr.number);
                (pr.clone(), pr.labels.clone())
            }
        };

        self.merge_if_allowed(event, &pr, &labels, authorized, report)
            .await
    }

    /// Open a PR and apply the auto-merge label. `None` in dry runs.
    async fn open_labeled_pr(
        &self,
        event: &EventContext,
        head: &str,
        base: &str,
        report: &mut PromotionReport,
    ) -> Result<Option<PullRequest>> {
        let title = pr_title(head, base);

        if self.config.dry_run {
            info!(
                head,
                base,
                title = %title,
                label = %self.config.label,
                "dry run: would create and label PR"
            );
            report.skip(head, base, None, SkipReason::DryRun);
            return Ok(None);
        }

        let pr = self.platform.create_pr(head, base, &title).await?;
        info!(pr_number = pr.number, head, base, "created promotion PR");
        report.created.push(pr.number);

        self.platform
            .add_labels(pr.number, std::slice::from_ref(&self.config.label))
            .await?;
        info!(pr_number = pr.number, label = %self.config.label, "labeled PR");

        notify_best_effort(
            self.notifier,
            &Notification::PullRequestCreated {
                repository: event.repo.to_string(),
                pr_number: pr.number,
                head: head.to_string(),
                base: base.to_string(),
                url: pr.html_url.clone(),
            },
        )
        .await;

        Ok(Some(pr))
    }

    async fn on_review(
        &self,
        event: &EventContext,
        authorized: bool,
        report: &mut PromotionReport,
    ) -> Result<()> {
        let payload_pr = event.payload.pull_request.as_ref().ok_or_else(|| {
            Error::Event("pull_request_review payload has no pull_request".to_string())
        })?;

        self.promote_existing(
            event,
            payload_pr.number,
            &payload_pr.base.ref_name,
            authorized,
            report,
        )
        .await
    }

    async fn on_check_run(
        &self,
        event: &EventContext,
        authorized: bool,
        report: &mut PromotionReport,
    ) -> Result<()> {
        let check_run = event
            .payload
            .check_run
            .as_ref()
            .ok_or_else(|| Error::Event("check_run payload has no check_run".to_string()))?;

        if check_run.pull_requests.is_empty() {
            info!(check = ?check_run.name, "check run has no associated PRs");
        }

        for payload_pr in &check_run.pull_requests {
            self.promote_existing(
                event,
                payload_pr.number,
                &payload_pr.base.ref_name,
                authorized,
                report,
            )
            .await?;
        }

        Ok(())
    }

    /// Gate and merge a PR named by the event. Never creates PRs.
    async fn promote_existing(
        &self,
        event: &EventContext,
        pr_number: u64,
        base: &str,
        authorized: bool,
        report: &mut PromotionReport,
    ) -> Result<()> {
        if !self.config.target_branches.iter().any(|b| b == base) {
            info!(pr_number, base, "PR does not target an auto-merge branch, skipping");
            return Ok(());
        }

        // Labels in event payloads can be stale or absent.
        let pr = self.platform.get_pr(pr_number).await?;
        if !pr.is_open() {
            info!(pr_number, state = %pr.state, "PR is no longer open, skipping");
            report.skip(
                &pr.head_ref,
                &pr.base_ref,
                Some(pr.number),
                SkipReason::NotOpen(pr.state),
            );
            return Ok(());
        }
        info!(pr_number, labels = ?pr.labels, "PR labels");
        report.reused.push(pr.number);

        let labels = pr.labels.clone();
        self.merge_if_allowed(event, &pr, &labels, authorized, report)
            .await
    }

    async fn merge_if_allowed(
        &self,
        event: &EventContext,
        pr: &PullRequest,
        labels: &[String],
        authorized: bool,
        report: &mut PromotionReport,
    ) -> Result<()> {
        match decide_merge(labels, &self.config.label, authorized) {
            MergeDecision::Merge => self.attempt_merge(event, pr, report).await,
            decision @ MergeDecision::SkipUnlabeled => {
                info!(
                    pr_number = pr.number,
                    label = %self.config.label,
                    "PR lacks the auto-merge label, skipping merge"
                );
                report.skip(
                    &pr.head_ref,
                    &pr.base_ref,
                    Some(pr.number),
                    SkipReason::Decision(decision),
                );
                Ok(())
            }
            decision @ MergeDecision::SkipUnauthorized => {
                info!(
                    pr_number = pr.number,
                    event = %event.kind,
                    "event is not allowed to merge, skipping merge"
                );
                report.skip(
                    &pr.head_ref,
                    &pr.base_ref,
                    Some(pr.number),
                    SkipReason::Decision(decision),
                );
                Ok(())
            }
        }
    }

    /// Single merge attempt; failures are recorded, never retried
    async fn attempt_merge(
        &self,
        event: &EventContext,
        pr: &PullRequest,
        report: &mut PromotionReport,
    ) -> Result<()> {
        if self.config.dry_run {
            info!(
                pr_number = pr.number,
                method = %self.config.merge_method,
                "dry run: would merge PR"
            );
            report.skip(&pr.head_ref, &pr.base_ref, Some(pr.number), SkipReason::DryRun);
            return Ok(());
        }

        let failure = match self
            .platform
            .merge_pr(pr.number, self.config.merge_method)
            .await
        {
            Ok(result) if result.merged => {
                info!(pr_number = pr.number, sha = ?result.sha, "merged PR");
                report.merged.push(pr.number);
                notify_best_effort(
                    self.notifier,
                    &Notification::Merged {
                        repository: event.repo.to_string(),
                        pr_number: pr.number,
                        head: pr.head_ref.clone(),
                        base: pr.base_ref.clone(),
                        sha: result.sha,
                    },
                )
                .await;
                return Ok(());
            }
            Ok(result) => result
                .message
                .unwrap_or_else(|| "merge was not performed".to_string()),
            Err(e) => e.to_string(),
        };

        if self.config.fail_on_merge_error {
            error!(pr_number = pr.number, reason = %failure, "merge failed");
        } else {
            warn!(pr_number = pr.number, reason = %failure, "merge failed, continuing");
        }
        report.failed_merges.push(pr.number);

        notify_best_effort(
            self.notifier,
            &Notification::MergeFailed {
                repository: event.repo.to_string(),
                pr_number: pr.number,
                head: pr.head_ref.clone(),
                base: pr.base_ref.clone(),
                reason: failure,
            },
        )
        .await;

        Ok(())
    }
}
