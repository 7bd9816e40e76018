//! Mock GitHub API for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use backport::error::{Error, Result};
use backport::github::{
    CreatedPullRequest, GitHubApi, HistoryQuery, NewPullRequest, PullRequestSource,
};
use backport::types::{RepoId, SourceCommit};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `add_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLabelsCall {
    pub pull_number: u64,
    pub labels: Vec<String>,
}

/// Mock GitHub API with configurable responses
///
/// Features:
/// - Auto-incrementing pull request numbers
/// - Call tracking for verification
/// - Configurable responses per login / pull number / sha
/// - Error injection for failure path testing
pub struct MockGitHubApi {
    repo: RepoId,
    next_pr_number: AtomicU64,
    // Configurable responses
    default_branch: Mutex<String>,
    author_ids: Mutex<HashMap<String, String>>,
    history: Mutex<Vec<SourceCommit>>,
    source_branch_missing: Mutex<bool>,
    pulls: Mutex<HashMap<u64, PullRequestSource>>,
    commits_by_sha: Mutex<Vec<SourceCommit>>,
    // Call tracking
    resolve_author_calls: Mutex<Vec<String>>,
    history_calls: Mutex<Vec<HistoryQuery>>,
    create_pull_request_calls: Mutex<Vec<NewPullRequest>>,
    add_labels_calls: Mutex<Vec<AddLabelsCall>>,
    // Error injection
    error_on_resolve_author: Mutex<Option<String>>,
    error_on_create_pull_request: Mutex<Option<String>>,
}

impl MockGitHubApi {
    /// Create a new mock for `repo` with `master` as the default branch
    pub fn new(repo: RepoId) -> Self {
        Self {
            repo,
            next_pr_number: AtomicU64::new(1000),
            default_branch: Mutex::new("master".to_string()),
            author_ids: Mutex::new(HashMap::new()),
            history: Mutex::new(Vec::new()),
            source_branch_missing: Mutex::new(false),
            pulls: Mutex::new(HashMap::new()),
            commits_by_sha: Mutex::new(Vec::new()),
            resolve_author_calls: Mutex::new(Vec::new()),
            history_calls: Mutex::new(Vec::new()),
            create_pull_request_calls: Mutex::new(Vec::new()),
            add_labels_calls: Mutex::new(Vec::new()),
            error_on_resolve_author: Mutex::new(None),
            error_on_create_pull_request: Mutex::new(None),
        }
    }

    // === Response configuration ===

    /// Set the default branch reported for the repository
    pub fn set_default_branch(&self, branch: &str) {
        *self.default_branch.lock().unwrap() = branch.to_string();
    }

    /// Map a login to an author id
    pub fn set_author_id(&self, login: &str, id: &str) {
        self.author_ids
            .lock()
            .unwrap()
            .insert(login.to_string(), id.to_string());
    }

    /// Set the commits returned by `commit_history`, newest first
    pub fn set_history(&self, commits: Vec<SourceCommit>) {
        *self.history.lock().unwrap() = commits;
    }

    /// Make `commit_history` report the source branch as missing
    pub fn set_source_branch_missing(&self) {
        *self.source_branch_missing.lock().unwrap() = true;
    }

    /// Set the response for `commit_by_pull_number`
    pub fn set_pull(&self, pull_number: u64, source: PullRequestSource) {
        self.pulls.lock().unwrap().insert(pull_number, source);
    }

    /// Register a commit that `commit_by_sha` can find by sha prefix
    pub fn set_commit(&self, commit: SourceCommit) {
        self.commits_by_sha.lock().unwrap().push(commit);
    }

    // === Error injection methods ===

    /// Make `resolve_author_id` return an error
    pub fn fail_resolve_author(&self, msg: &str) {
        *self.error_on_resolve_author.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pull_request` return an error
    pub fn fail_create_pull_request(&self, msg: &str) {
        *self.error_on_create_pull_request.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Get all logins passed to `resolve_author_id`
    pub fn get_resolve_author_calls(&self) -> Vec<String> {
        self.resolve_author_calls.lock().unwrap().clone()
    }

    /// Get all `commit_history` calls
    pub fn get_history_calls(&self) -> Vec<HistoryQuery> {
        self.history_calls.lock().unwrap().clone()
    }

    /// Get all `create_pull_request` calls
    pub fn get_create_pull_request_calls(&self) -> Vec<NewPullRequest> {
        self.create_pull_request_calls.lock().unwrap().clone()
    }

    /// Get all `add_labels` calls
    pub fn get_add_labels_calls(&self) -> Vec<AddLabelsCall> {
        self.add_labels_calls.lock().unwrap().clone()
    }

    /// Assert that `create_pull_request` was called with specific head and base
    pub fn assert_create_pull_request_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pull_request_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pull_request({head}, {base}) but got: {calls:?}"
        );
    }
}

#[async_trait]
impl GitHubApi for MockGitHubApi {
    async fn resolve_author_id(&self, login: &str) -> Result<String> {
        self.resolve_author_calls
            .lock()
            .unwrap()
            .push(login.to_string());

        // Check for injected error
        if let Some(msg) = self.error_on_resolve_author.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let ids = self.author_ids.lock().unwrap();
        ids.get(login).cloned().ok_or_else(|| {
            Error::GitHubApi(format!(
                "resolve_author_id: no id configured for \"{login}\""
            ))
        })
    }

    async fn commit_history(&self, query: &HistoryQuery) -> Result<Vec<SourceCommit>> {
        self.history_calls.lock().unwrap().push(query.clone());

        if *self.source_branch_missing.lock().unwrap() {
            return Err(Error::SourceBranchNotFound {
                branch: query.source_branch.clone(),
                repo: self.repo.to_string(),
            });
        }

        let history = self.history.lock().unwrap();
        Ok(history
            .iter()
            .take(query.commits_count as usize)
            .cloned()
            .collect())
    }

    async fn commit_by_pull_number(&self, pull_number: u64) -> Result<PullRequestSource> {
        let pulls = self.pulls.lock().unwrap();
        pulls
            .get(&pull_number)
            .cloned()
            .ok_or_else(|| Error::PullRequestNotFound {
                number: pull_number,
                repo: self.repo.to_string(),
            })
    }

    async fn commit_by_sha(&self, sha: &str) -> Result<SourceCommit> {
        let commits = self.commits_by_sha.lock().unwrap();
        commits
            .iter()
            .find(|commit| commit.sha.starts_with(sha))
            .cloned()
            .ok_or_else(|| Error::CommitNotFound {
                sha: sha.to_string(),
                repo: self.repo.to_string(),
            })
    }

    async fn default_branch(&self) -> Result<String> {
        Ok(self.default_branch.lock().unwrap().clone())
    }

    async fn create_pull_request(&self, pull: &NewPullRequest) -> Result<CreatedPullRequest> {
        self.create_pull_request_calls
            .lock()
            .unwrap()
            .push(pull.clone());

        // Check for injected error
        if let Some(msg) = self.error_on_create_pull_request.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(CreatedPullRequest {
            number,
            html_url: format!("https://github.com/{}/pull/{number}", self.repo),
        })
    }

    async fn add_labels(&self, pull_number: u64, labels: &[String]) -> Result<()> {
        self.add_labels_calls.lock().unwrap().push(AddLabelsCall {
            pull_number,
            labels: labels.to_vec(),
        });
        Ok(())
    }

    fn repo(&self) -> &RepoId {
        &self.repo
    }
}
