//! Action configuration
//!
//! Built once per run from the action inputs. See [`Inputs`] for how
//! inputs are looked up.

mod inputs;

pub use inputs::{EnvInputs, Inputs, MapInputs, input_env_name};

use crate::error::{Error, Result};
use crate::types::MergeMethod;

/// Label applied to PRs the bot may merge, when the `label` input is unset.
pub const DEFAULT_LABEL: &str = "자동머지";

/// Default chat channel for notifications
pub const DEFAULT_SLACK_CHANNEL: &str = "#ci-notifications";

/// Default display name for chat posts
pub const DEFAULT_SLACK_USERNAME: &str = "automerge";

/// Which trigger events are allowed to merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AutoMergeTriggers {
    /// Merge on `push`
    pub push: bool,
    /// Merge on an approved `pull_request_review`
    pub review: bool,
    /// Merge on a successful `check_run` completion
    pub check_run: bool,
}

impl Default for AutoMergeTriggers {
    fn default() -> Self {
        Self {
            push: true,
            review: false,
            check_run: false,
        }
    }
}

/// Chat notification settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackConfig {
    /// Bot token used for `chat.postMessage`
    pub token: String,
    /// Target channel
    pub channel: String,
    /// Display name for posts
    pub username: String,
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// GitHub API token
    pub token: String,
    /// Auto-merge label name
    pub label: String,
    /// Target branches, alias-resolved, in configured order
    pub target_branches: Vec<String>,
    /// Per-event merge enablement
    pub triggers: AutoMergeTriggers,
    /// Fail the run when a merge fails
    pub fail_on_merge_error: bool,
    /// Merge method passed to the merge API
    pub merge_method: MergeMethod,
    /// Chat notifications, if enabled
    pub slack: Option<SlackConfig>,
    /// Log writes instead of performing them
    pub dry_run: bool,
}

impl ActionConfig {
    /// Build the configuration from action inputs
    pub fn from_inputs(inputs: &dyn Inputs) -> Result<Self> {
        let token = inputs
            .get("github-token")
            .ok_or_else(|| Error::Config("input 'github-token' is required".to_string()))?;

        let label = inputs
            .get("label")
            .unwrap_or_else(|| DEFAULT_LABEL.to_string());

        let target_branches = inputs
            .get("auto-merge-branches")
            .map(|raw| parse_branch_list(&raw))
            .unwrap_or_default()
            .into_iter()
            .map(|branch| resolve_branch(inputs, &branch))
            .collect();

        let defaults = AutoMergeTriggers::default();
        let triggers = AutoMergeTriggers {
            push: flag_input(inputs, "merge-on-push", defaults.push)?,
            review: flag_input(inputs, "merge-on-review", defaults.review)?,
            check_run: flag_input(inputs, "merge-on-check-run", defaults.check_run)?,
        };

        let fail_on_merge_error = flag_input(inputs, "fail-on-merge-error", true)?;

        let merge_method = inputs
            .get("merge-method")
            .map(|raw| raw.parse::<MergeMethod>())
            .transpose()
            .map_err(|e| Error::Config(format!("input 'merge-method': {e}")))?
            .unwrap_or_default();

        let slack = inputs.get("slack-token").map(|token| SlackConfig {
            token,
            channel: inputs
                .get("slack-channel")
                .unwrap_or_else(|| DEFAULT_SLACK_CHANNEL.to_string()),
            username: inputs
                .get("slack-username")
                .unwrap_or_else(|| DEFAULT_SLACK_USERNAME.to_string()),
        });

        Ok(Self {
            token,
            label,
            target_branches,
            triggers,
            fail_on_merge_error,
            merge_method,
            slack,
            dry_run: false,
        })
    }

    /// Whether any target branch is configured
    pub fn has_targets(&self) -> bool {
        !self.target_branches.is_empty()
    }
}

/// Split a comma-separated branch list, trimming and dropping empty entries.
pub fn parse_branch_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Apply the branch alias lookup: an input named after the branch
/// overrides it, otherwise the name is used as-is.
pub fn resolve_branch(inputs: &dyn Inputs, branch: &str) -> String {
    inputs.get(branch).unwrap_or_else(|| branch.to_string())
}

/// Parse a boolean action input value.
pub fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(Error::Config(format!(
            "input '{name}' must be a boolean, got '{other}'"
        ))),
    }
}

fn flag_input(inputs: &dyn Inputs, name: &str, default: bool) -> Result<bool> {
    inputs
        .get(name)
        .map_or(Ok(default), |raw| parse_flag(name, &raw))
}
