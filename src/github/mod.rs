//! GitHub API access
//!
//! [`GitHubApi`] is the seam between the engine and the remote, so tests
//! can run against a mock. [`GitHubClient`] is the real implementation.

mod client;
mod graphql;

pub use client::GitHubClient;
pub use graphql::GraphqlClient;

use crate::error::Result;
use crate::git;
use crate::options::BackportOptions;
use crate::types::{CommitChoice, RepoId, SourceCommit};
use async_trait::async_trait;

/// Parameters for a commit history query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Branch whose history is listed
    pub source_branch: String,
    /// Maximum number of commits to return
    pub commits_count: u32,
    /// Only list commits by this author id (None lists all authors)
    pub author_id: Option<String>,
    /// Only list commits touching files under this path
    pub path: Option<String>,
}

/// A pull request's merge commit together with its base branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSource {
    /// Branch the pull request merged into
    pub base_branch: String,
    /// The merge commit, with association data
    pub commit: SourceCommit,
}

/// Payload for creating a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// Pull request title
    pub title: String,
    /// Pull request body
    pub body: String,
    /// Head in `owner:branch` form
    pub head: String,
    /// Base branch
    pub base: String,
}

/// A pull request created by this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPullRequest {
    /// Pull request number
    pub number: u64,
    /// Web URL
    pub html_url: String,
}

/// GitHub operations used by the backport flow
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Resolve a login to its GraphQL author id
    async fn resolve_author_id(&self, login: &str) -> Result<String>;

    /// List the newest commits on a branch, newest first
    ///
    /// A branch that does not exist is an error, distinct from an existing
    /// branch with no matching commits.
    async fn commit_history(&self, query: &HistoryQuery) -> Result<Vec<SourceCommit>>;

    /// Fetch the merge commit of a pull request
    async fn commit_by_pull_number(&self, pull_number: u64) -> Result<PullRequestSource>;

    /// Fetch a single commit by (possibly abbreviated) sha
    async fn commit_by_sha(&self, sha: &str) -> Result<SourceCommit>;

    /// Default branch of the upstream repository
    ///
    /// Doubles as the access check: a bad token or upstream surfaces here
    /// before anything else runs.
    async fn default_branch(&self) -> Result<String>;

    /// Create a pull request against the upstream repository
    async fn create_pull_request(&self, pull: &NewPullRequest) -> Result<CreatedPullRequest>;

    /// Add labels to a pull request
    async fn add_labels(&self, pull_number: u64, labels: &[String]) -> Result<()>;

    /// The upstream repository
    fn repo(&self) -> &RepoId;
}

/// Payload for the backport pull request of `commits` onto `target_branch`
///
/// `{targetBranch}` and `{commitMessages}` placeholders in the configured
/// title are substituted; the body lists the backported commits and appends
/// the configured description.
pub fn pull_request_payload(
    options: &BackportOptions,
    commits: &[CommitChoice],
    target_branch: &str,
    head_owner: &str,
) -> NewPullRequest {
    let commit_messages = commits
        .iter()
        .map(|commit| commit.formatted_message.clone())
        .collect::<Vec<_>>()
        .join(" | ");

    let title = options
        .pr_title
        .replace("{targetBranch}", target_branch)
        .replace("{commitMessages}", &commit_messages);

    let commit_list = commits
        .iter()
        .map(|commit| format!(" - {}", commit.formatted_message))
        .collect::<Vec<_>>()
        .join("\n");

    let mut body = format!("Backports the following commits to {target_branch}:\n{commit_list}");
    if let Some(ref description) = options.pr_description {
        body.push_str("\n\n");
        body.push_str(description);
    }

    NewPullRequest {
        title,
        body,
        head: format!(
            "{head_owner}:{}",
            git::feature_branch_name(target_branch, commits)
        ),
        base: target_branch.to_string(),
    }
}
