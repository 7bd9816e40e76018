//! Error types for backport

use thiserror::Error;

/// Result alias using our [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a backport run
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid argument or option combination supplied by the user
    #[error("{0}")]
    InvalidArgument(String),

    /// Configuration file missing, malformed, or incomplete
    #[error("{0}")]
    Config(String),

    /// The branch commits are read from does not exist upstream
    #[error(
        "The upstream branch \"{branch}\" does not exist on {repo}. Try specifying a different branch with \"--source-branch <your-branch>\""
    )]
    SourceBranchNotFound {
        /// Branch that was queried
        branch: String,
        /// Upstream repository in `owner/repo` form
        repo: String,
    },

    /// A requested target branch does not exist upstream
    #[error("The target branch \"{branch}\" is invalid or doesn't exist")]
    TargetBranchNotFound {
        /// Branch the backport was aimed at
        branch: String,
    },

    /// The requested pull request does not exist
    #[error("Could not find pull request #{number} in {repo}")]
    PullRequestNotFound {
        /// Pull request number
        number: u64,
        /// Upstream repository in `owner/repo` form
        repo: String,
    },

    /// The requested commit does not exist
    #[error("Could not find commit \"{sha}\" in {repo}")]
    CommitNotFound {
        /// Sha that was looked up
        sha: String,
        /// Upstream repository in `owner/repo` form
        repo: String,
    },

    /// A GitHub API request failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// A local git operation failed
    #[error("git error: {0}")]
    Git(String),

    /// Reading input from the terminal failed
    #[error("{0}")]
    Prompt(String),

    /// The user aborted an interactive step
    #[error("Aborted")]
    Aborted,
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}
