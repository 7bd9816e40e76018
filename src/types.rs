//! Core types for backport

use serde::{Deserialize, Serialize};

/// Owner and name of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Lifecycle state of a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestState {
    /// Open and active
    Open,
    /// Closed without merging
    Closed,
    /// Merged
    Merged,
}

impl std::fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// A commit fetched from the upstream repository, with association data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCommit {
    /// Full commit sha
    pub sha: String,
    /// Full commit message (first line is the summary)
    pub message: String,
    /// The pull request the remote reports for this commit, if any
    ///
    /// This is the raw candidate; whether it actually merged the commit is
    /// decided by the association check.
    pub associated_pull_request: Option<PullRequestCandidate>,
}

/// A pull request the remote associates with a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestCandidate {
    /// Pull request number
    pub number: u64,
    /// Repository the pull request belongs to (may be a fork)
    pub repo: RepoId,
    /// Sha of the merge commit, when the pull request has been merged
    pub merge_commit_sha: Option<String>,
    /// Label names on the pull request
    pub labels: Vec<String>,
    /// Recent cross-reference events, oldest first within the window
    pub cross_references: Vec<CrossReference>,
}

/// A timeline event where something referenced the pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossReference {
    /// The referencing source is a pull request
    PullRequest(ReferencedPullRequest),
    /// Issues and any other source kinds
    Other,
}

/// A pull request that referenced the original one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencedPullRequest {
    /// Title of the referencing pull request
    pub title: String,
    /// Its lifecycle state
    pub state: PullRequestState,
    /// Branch it targets
    pub base_branch: String,
    /// Messages of its commits, bounded by the query window
    pub commit_messages: Vec<String>,
}

/// A backport pull request that already exists for a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingBackport {
    /// Branch the backport targets
    pub branch: String,
    /// State of the backport pull request
    pub state: PullRequestState,
}

/// A commit enriched with everything the selection prompt needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitChoice {
    /// Branch the commit was fetched from
    pub source_branch: String,
    /// Target branches suggested by the merging pull request's labels
    pub target_branches: Vec<String>,
    /// Full commit sha
    pub sha: String,
    /// Display message, with the pull number or short sha appended
    pub formatted_message: String,
    /// Number of the pull request that merged the commit, if known
    pub pull_number: Option<u64>,
    /// Backport pull requests that already exist for this commit
    pub existing_backports: Vec<ExistingBackport>,
}

/// A branch offered in the target-branch prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchChoice {
    /// Branch name
    pub name: String,
    /// Whether the branch starts out checked
    pub checked: bool,
}

/// A rule mapping pull request labels to a target branch
///
/// The replacement may reference capture groups from the pattern, e.g.
/// pattern `^backport:(\d+\.\d+)$` with replacement `$1`.
#[derive(Debug, Clone)]
pub struct BranchLabelRule {
    /// Pattern matched against each label
    pub pattern: regex::Regex,
    /// Replacement producing the target branch name
    pub target_branch: String,
}
