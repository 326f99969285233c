//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use automerge::error::{Error, Result};
use automerge::platform::PlatformService;
use automerge::types::{MergeMethod, MergeResult, PrState, PullRequest, RepoConfig};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
}

/// Call record for `add_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLabelsCall {
    pub pr_number: u64,
    pub labels: Vec<String>,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub method: MergeMethod,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Auto-incrementing PR numbers (starting at 100)
/// - Call tracking for verification
/// - Configurable responses per branch pair / PR number
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: RepoConfig,
    next_pr_number: AtomicU64,
    branches: Mutex<Vec<String>>,
    open_prs: Mutex<HashMap<(String, String), Vec<PullRequest>>>,
    prs_by_number: Mutex<HashMap<u64, PullRequest>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Call tracking
    list_branches_calls: Mutex<usize>,
    find_pr_calls: Mutex<Vec<(String, String)>>,
    get_pr_calls: Mutex<Vec<u64>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    add_labels_calls: Mutex<Vec<AddLabelsCall>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    // Error injection
    error_on_list_branches: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: RepoConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(100),
            branches: Mutex::new(Vec::new()),
            open_prs: Mutex::new(HashMap::new()),
            prs_by_number: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            list_branches_calls: Mutex::new(0),
            find_pr_calls: Mutex::new(Vec::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            add_labels_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            error_on_list_branches: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
            error_on_merge_pr: Mutex::new(None),
        }
    }

    // === Response setup ===

    /// Set the repository's branches
    pub fn set_branches(&self, branches: &[&str]) {
        *self.branches.lock().unwrap() = branches.iter().map(ToString::to_string).collect();
    }

    /// Register an open PR; it is returned by `find_open_prs` and `get_pr`
    pub fn add_open_pr(&self, pr: PullRequest) {
        self.prs_by_number
            .lock()
            .unwrap()
            .insert(pr.number, pr.clone());
        self.open_prs
            .lock()
            .unwrap()
            .entry((pr.head_ref.clone(), pr.base_ref.clone()))
            .or_default()
            .push(pr);
    }

    /// Register a PR visible only through `get_pr` (closed or merged)
    pub fn add_pr(&self, pr: PullRequest) {
        self.prs_by_number
            .lock()
            .unwrap()
            .insert(pr.number, pr);
    }

    /// Set the response for `merge_pr` for a specific PR
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    // === Error injection methods ===

    /// Make `list_branches` return an error
    pub fn fail_list_branches(&self, msg: &str) {
        *self.error_on_list_branches.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    pub fn list_branches_call_count(&self) -> usize {
        *self.list_branches_calls.lock().unwrap()
    }

    pub fn get_find_pr_calls(&self) -> Vec<(String, String)> {
        self.find_pr_calls.lock().unwrap().clone()
    }

    pub fn get_get_pr_calls(&self) -> Vec<u64> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn get_add_labels_calls(&self) -> Vec<AddLabelsCall> {
        self.add_labels_calls.lock().unwrap().clone()
    }

    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Total number of remote calls of any kind
    pub fn total_calls(&self) -> usize {
        self.list_branches_call_count()
            + self.get_find_pr_calls().len()
            + self.get_get_pr_calls().len()
            + self.get_create_pr_calls().len()
            + self.get_add_labels_calls().len()
            + self.get_merge_pr_calls().len()
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was called for a specific PR
    pub fn assert_merge_called(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert!(
            calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pr({pr_number}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was NOT called for a specific PR
    pub fn assert_merge_not_called(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert!(
            !calls.iter().any(|c| c.pr_number == pr_number),
            "Expected merge_pr({pr_number}) NOT to be called but it was: {calls:?}"
        );
    }

    /// Get count of `merge_pr` calls
    pub fn merge_call_count(&self) -> usize {
        self.merge_pr_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_branches(&self) -> Result<Vec<String>> {
        *self.list_branches_calls.lock().unwrap() += 1;

        if let Some(msg) = self.error_on_list_branches.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        Ok(self.branches.lock().unwrap().clone())
    }

    async fn find_open_prs(&self, head: &str, base: &str) -> Result<Vec<PullRequest>> {
        let key = (head.to_string(), base.to_string());
        self.find_pr_calls.lock().unwrap().push(key.clone());

        let open = self.open_prs.lock().unwrap();
        Ok(open.get(&key).cloned().unwrap_or_default())
    }

    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest> {
        self.get_pr_calls.lock().unwrap().push(pr_number);

        let prs = self.prs_by_number.lock().unwrap();
        prs.get(&pr_number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("get_pr: no PR #{pr_number} configured")))
    }

    async fn create_pr(&self, head: &str, base: &str, title: &str) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
        });

        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/test/repo/pull/{number}"),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
            labels: vec![],
            state: PrState::Open,
        })
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.add_labels_calls.lock().unwrap().push(AddLabelsCall {
            pr_number,
            labels: labels.to_vec(),
        });
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        self.merge_pr_calls
            .lock()
            .unwrap()
            .push(MergePrCall { pr_number, method });

        if let Some(msg) = self.error_on_merge_pr.lock().unwrap().as_ref() {
            return Err(Error::MergeFailed {
                pr_number,
                message: msg.clone(),
            });
        }

        let responses = self.merge_responses.lock().unwrap();
        Ok(responses.get(&pr_number).cloned().unwrap_or_else(|| MergeResult {
            merged: true,
            sha: Some(format!("merged_sha_{pr_number}")),
            message: None,
        }))
    }

    fn config(&self) -> &RepoConfig {
        &self.config
    }
}
