//! Shared test fixtures
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

mod mock_github;

pub use mock_github::{AddLabelsCall, MockGitHubApi};

use backport::error::{Error, Result};
use backport::options::BackportOptions;
use backport::prompt::Prompt;
use backport::types::{
    BranchChoice, BranchLabelRule, CrossReference, PullRequestCandidate, PullRequestState,
    ReferencedPullRequest, RepoId, SourceCommit,
};
use std::sync::Mutex;

/// The upstream repository used throughout the tests
pub fn test_repo() -> RepoId {
    RepoId {
        owner: "elastic".to_string(),
        name: "kibana".to_string(),
    }
}

/// Resolved options pointing at [`test_repo`], with defaults
pub fn test_options() -> BackportOptions {
    BackportOptions {
        access_token: "ghp_test".to_string(),
        username: "sqren".to_string(),
        author: Some("sqren".to_string()),
        upstream: test_repo(),
        source_branch: None,
        commits_count: 10,
        path: None,
        pull_number: None,
        sha: None,
        target_branches: Vec::new(),
        target_branch_choices: Vec::new(),
        branch_label_rules: Vec::new(),
        multiple_commits: false,
        multiple_branches: true,
        fork: true,
        git_hostname: "github.com".to_string(),
        github_api_base_url_v3: "https://api.github.com".to_string(),
        github_api_base_url_v4: "https://api.github.com/graphql".to_string(),
        labels: Vec::new(),
        backport_created_labels: Vec::new(),
        pr_title: "[{targetBranch}] {commitMessages}".to_string(),
        pr_description: None,
        mainline: None,
        reset_author: false,
        dry_run: false,
        editor: None,
        verbose: false,
    }
}

/// A commit with no associated pull request
pub fn make_commit(sha: &str, message: &str) -> SourceCommit {
    SourceCommit {
        sha: sha.to_string(),
        message: message.to_string(),
        associated_pull_request: None,
    }
}

/// A commit whose pull request candidate passes the association check
pub fn make_commit_with_pr(
    sha: &str,
    message: &str,
    pull_number: u64,
    labels: &[&str],
) -> SourceCommit {
    SourceCommit {
        sha: sha.to_string(),
        message: message.to_string(),
        associated_pull_request: Some(PullRequestCandidate {
            number: pull_number,
            repo: test_repo(),
            merge_commit_sha: Some(sha.to_string()),
            labels: labels.iter().map(ToString::to_string).collect(),
            cross_references: Vec::new(),
        }),
    }
}

/// A cross-reference from another pull request
pub fn make_cross_reference(
    title: &str,
    state: PullRequestState,
    base_branch: &str,
    commit_messages: &[&str],
) -> CrossReference {
    CrossReference::PullRequest(ReferencedPullRequest {
        title: title.to_string(),
        state,
        base_branch: base_branch.to_string(),
        commit_messages: commit_messages.iter().map(ToString::to_string).collect(),
    })
}

/// An unchecked branch choice
pub fn make_branch_choice(name: &str) -> BranchChoice {
    BranchChoice {
        name: name.to_string(),
        checked: false,
    }
}

/// A label rule, panicking on an invalid pattern
pub fn make_label_rule(pattern: &str, target_branch: &str) -> BranchLabelRule {
    BranchLabelRule {
        pattern: regex::Regex::new(pattern).unwrap(),
        target_branch: target_branch.to_string(),
    }
}

/// Prompt that replays scripted answers and records what it was asked
///
/// Answers are consumed front to back; running out of answers is an error
/// so tests fail loudly instead of hanging.
#[derive(Default)]
pub struct ScriptedPrompt {
    select_one_answers: Mutex<Vec<usize>>,
    select_many_answers: Mutex<Vec<Vec<usize>>>,
    confirm_answers: Mutex<Vec<bool>>,
    // Recorded questions
    messages: Mutex<Vec<String>>,
    items: Mutex<Vec<Vec<String>>>,
    defaults: Mutex<Vec<Vec<bool>>>,
}

impl ScriptedPrompt {
    /// A prompt with no scripted answers
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next `select_one`
    pub fn will_select_one(self, index: usize) -> Self {
        self.select_one_answers.lock().unwrap().push(index);
        self
    }

    /// Queue an answer for the next `select_many`
    pub fn will_select_many(self, indexes: Vec<usize>) -> Self {
        self.select_many_answers.lock().unwrap().push(indexes);
        self
    }

    /// Queue an answer for the next `confirm`
    pub fn will_confirm(self, answer: bool) -> Self {
        self.confirm_answers.lock().unwrap().push(answer);
        self
    }

    /// All messages the prompt was asked with
    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// The item lists shown, in call order
    pub fn get_items(&self) -> Vec<Vec<String>> {
        self.items.lock().unwrap().clone()
    }

    /// The default (pre-checked) flags passed to `select_many`, in call order
    pub fn get_defaults(&self) -> Vec<Vec<bool>> {
        self.defaults.lock().unwrap().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn select_one(&self, message: &str, items: &[String]) -> Result<usize> {
        self.messages.lock().unwrap().push(message.to_string());
        self.items.lock().unwrap().push(items.to_vec());

        let mut answers = self.select_one_answers.lock().unwrap();
        if answers.is_empty() {
            return Err(Error::Prompt("no scripted select_one answer".to_string()));
        }
        Ok(answers.remove(0))
    }

    fn select_many(
        &self,
        message: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>> {
        self.messages.lock().unwrap().push(message.to_string());
        self.items.lock().unwrap().push(items.to_vec());
        self.defaults.lock().unwrap().push(defaults.to_vec());

        let mut answers = self.select_many_answers.lock().unwrap();
        if answers.is_empty() {
            return Err(Error::Prompt("no scripted select_many answer".to_string()));
        }
        Ok(answers.remove(0))
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        self.messages.lock().unwrap().push(message.to_string());

        let mut answers = self.confirm_answers.lock().unwrap();
        if answers.is_empty() {
            return Err(Error::Prompt("no scripted confirm answer".to_string()));
        }
        Ok(answers.remove(0))
    }
}
