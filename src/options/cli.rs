//! Command line arguments

use clap::Parser;

/// Backport GitHub commits to other branches
#[derive(Debug, Clone, Parser)]
#[command(
    name = "backport",
    version,
    about = "Backport GitHub commits to other branches with a single command"
)]
pub struct CliArgs {
    /// GitHub access token
    #[arg(long, alias = "accesstoken", value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// List commits by all authors
    #[arg(long)]
    pub all: bool,

    /// List commits by a specific author
    #[arg(long, value_name = "LOGIN")]
    pub author: Option<String>,

    /// Labels added to the source pull request once the backport is created
    #[arg(long, value_name = "LABEL")]
    pub backport_created_labels: Vec<String>,

    /// Branch to backport to (repeatable; skips the branch prompt)
    #[arg(
        long = "branch",
        short = 'b',
        alias = "target-branches",
        value_name = "BRANCH"
    )]
    pub target_branches: Vec<String>,

    /// Number of commits to choose from
    #[arg(long, alias = "count", value_name = "N")]
    pub commits_count: Option<u32>,

    /// Perform the backport without pushing or opening a pull request
    #[arg(long)]
    pub dry_run: bool,

    /// Editor opened during conflict resolution (e.g. "code")
    #[arg(long, value_name = "COMMAND")]
    pub editor: Option<String>,

    /// Push the backport branch to your fork (default) instead of upstream
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub fork: Option<bool>,

    /// Hostname for GitHub
    #[arg(long, value_name = "HOST")]
    pub git_hostname: Option<String>,

    /// Base url for GitHub's REST (v3) API
    #[arg(long, value_name = "URL")]
    pub github_api_base_url_v3: Option<String>,

    /// Base url for GitHub's GraphQL (v4) API
    #[arg(long, value_name = "URL")]
    pub github_api_base_url_v4: Option<String>,

    /// Labels added to the backport pull request
    #[arg(long, short = 'l', value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Parent id of a merge commit; defaults to 1 when given without a value
    #[arg(long, num_args = 0..=1, default_missing_value = "1", value_name = "PARENT")]
    pub mainline: Option<u32>,

    /// Select multiple commits and multiple target branches
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub multiple: Option<bool>,

    /// Select multiple commits
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub multiple_commits: Option<bool>,

    /// Select multiple target branches
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub multiple_branches: Option<bool>,

    /// Only list commits touching files under this path
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Pull request title; {targetBranch} and {commitMessages} are substituted
    #[arg(long, value_name = "TITLE")]
    pub pr_title: Option<String>,

    /// Text appended to the pull request description
    #[arg(long, alias = "description", value_name = "TEXT")]
    pub pr_description: Option<String>,

    /// Backport a pull request by number
    #[arg(long, alias = "pr", value_name = "NUMBER", conflicts_with = "sha")]
    pub pull_number: Option<u64>,

    /// Set yourself as the author of the backported commits
    #[arg(long)]
    pub reset_author: bool,

    /// Backport a commit by sha
    #[arg(long, alias = "commit", value_name = "SHA")]
    pub sha: Option<String>,

    /// Branch to list commits from (defaults to the repository default branch)
    #[arg(long, value_name = "BRANCH")]
    pub source_branch: Option<String>,

    /// Repository to backport from, in owner/repo form
    #[arg(long, value_name = "OWNER/REPO")]
    pub upstream: Option<String>,

    /// GitHub username
    #[arg(long, value_name = "LOGIN")]
    pub username: Option<String>,

    /// Show debug output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
