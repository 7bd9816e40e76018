//! Fetching candidate commits and enriching them into choices

use crate::commits::{association, backports, format, labels};
use crate::error::Result;
use crate::github::{GitHubApi, HistoryQuery};
use crate::options::BackportOptions;
use crate::types::{BranchLabelRule, CommitChoice, RepoId, SourceCommit};
use tracing::debug;

/// Fetch the newest commits on `source_branch` and enrich each one
///
/// A single bounded history query is issued; a missing branch is a
/// distinct error, while an existing branch with no commits yields an
/// empty list. Output order follows the remote's newest-first page order.
pub async fn fetch_commits_by_author(
    api: &dyn GitHubApi,
    options: &BackportOptions,
    source_branch: &str,
) -> Result<Vec<CommitChoice>> {
    let author_id = match &options.author {
        Some(login) => Some(api.resolve_author_id(login).await?),
        None => None,
    };

    let commits = api
        .commit_history(&HistoryQuery {
            source_branch: source_branch.to_string(),
            commits_count: options.commits_count,
            author_id,
            path: options.path.clone(),
        })
        .await?;

    debug!(count = commits.len(), source_branch, "fetched commits");

    Ok(commits
        .iter()
        .map(|commit| {
            build_commit_choice(commit, source_branch, api.repo(), &options.branch_label_rules)
        })
        .collect())
}

/// Fetch the merge commit of a specific pull request
///
/// The source branch is the pull request's base branch, not the configured
/// one. Asking for an unmerged pull request is an error.
pub async fn fetch_commit_by_pull_number(
    api: &dyn GitHubApi,
    options: &BackportOptions,
    pull_number: u64,
) -> Result<CommitChoice> {
    let pull = api.commit_by_pull_number(pull_number).await?;
    debug!(pull_number, base_branch = %pull.base_branch, "fetched pull request merge commit");
    Ok(build_commit_choice(
        &pull.commit,
        &pull.base_branch,
        api.repo(),
        &options.branch_label_rules,
    ))
}

/// Fetch a single commit by (possibly abbreviated) sha
pub async fn fetch_commit_by_sha(
    api: &dyn GitHubApi,
    options: &BackportOptions,
    source_branch: &str,
    sha: &str,
) -> Result<CommitChoice> {
    let commit = api.commit_by_sha(sha).await?;
    debug!(sha = %commit.sha, "fetched commit");
    Ok(build_commit_choice(
        &commit,
        source_branch,
        api.repo(),
        &options.branch_label_rules,
    ))
}

/// Enrich one commit into a [`CommitChoice`]
///
/// Pure and independent per commit: association decides the pull number
/// (with the textual marker as fallback), existing backports come from the
/// cross-reference window, and target branches from the labels of the
/// merging pull request.
pub fn build_commit_choice(
    commit: &SourceCommit,
    source_branch: &str,
    repo: &RepoId,
    rules: &[BranchLabelRule],
) -> CommitChoice {
    let associated = association::associated_pull_request(commit, repo);

    let existing_backports = backports::existing_backport_prs(&commit.message, associated);

    let pull_number = associated
        .map(|pull| pull.number)
        .or_else(|| association::pull_number_from_message(&commit.message));

    let formatted_message =
        format::formatted_commit_message(&commit.message, pull_number, &commit.sha);

    let target_branches = associated
        .map(|pull| labels::target_branches_from_labels(&pull.labels, rules))
        .unwrap_or_default();

    CommitChoice {
        source_branch: source_branch.to_string(),
        target_branches,
        sha: commit.sha.clone(),
        formatted_message,
        pull_number,
        existing_backports,
    }
}
