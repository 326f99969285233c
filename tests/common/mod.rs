//! Shared test fixtures

#![allow(dead_code)]

mod mock_notifier;
mod mock_platform;

pub use mock_notifier::MockNotifier;
pub use mock_platform::{AddLabelsCall, CreatePrCall, MergePrCall, MockPlatformService};

use automerge::config::{ActionConfig, AutoMergeTriggers};
use automerge::event::{EventContext, EventKind, EventPayload};
use automerge::types::{MergeMethod, PrState, PullRequest, RepoConfig};

/// Label used throughout the tests
pub const LABEL: &str = "automerge";

pub fn repo_config() -> RepoConfig {
    RepoConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
    }
}

/// Config targeting `branches`, push merges on, strict merges
pub fn action_config(branches: &[&str]) -> ActionConfig {
    ActionConfig {
        token: "ghs_test".to_string(),
        label: LABEL.to_string(),
        target_branches: branches.iter().map(ToString::to_string).collect(),
        triggers: AutoMergeTriggers::default(),
        fail_on_merge_error: true,
        merge_method: MergeMethod::Merge,
        slack: None,
        dry_run: false,
    }
}

pub fn make_pr(number: u64, head: &str, base: &str, labels: &[&str]) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        base_ref: base.to_string(),
        head_ref: head.to_string(),
        title: format!("{head} -> {base}"),
        labels: labels.iter().map(ToString::to_string).collect(),
        state: PrState::Open,
    }
}

pub fn push_event(branch: &str) -> EventContext {
    EventContext {
        kind: EventKind::Push,
        git_ref: format!("refs/heads/{branch}"),
        repo: repo_config(),
        payload: EventPayload::default(),
    }
}

/// Build an event from a JSON payload
pub fn event_with_payload(kind: EventKind, payload: &serde_json::Value) -> EventContext {
    EventContext {
        kind,
        git_ref: "refs/heads/main".to_string(),
        repo: repo_config(),
        payload: serde_json::from_value(payload.clone()).expect("valid payload"),
    }
}
