//! Associating commits with the pull request that merged them

use crate::commits::format::first_message_line;
use crate::types::{PullRequestCandidate, RepoId, SourceCommit};
use regex::Regex;
use std::sync::LazyLock;

static PULL_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)").expect("pull number pattern is valid"));

/// The pull request that merged this commit, if the candidate holds up
///
/// The remote reports at most one candidate per commit, but it may belong
/// to a fork or reference the commit without having merged it. The
/// candidate is accepted only when its repository name, repository owner,
/// and merge-commit sha all match; anything less means no association.
pub fn associated_pull_request<'a>(
    commit: &'a SourceCommit,
    repo: &RepoId,
) -> Option<&'a PullRequestCandidate> {
    commit.associated_pull_request.as_ref().filter(|candidate| {
        candidate.repo == *repo
            && candidate.merge_commit_sha.as_deref() == Some(commit.sha.as_str())
    })
}

/// Pull number extracted from a `(#123)` marker on the first message line
///
/// Fallback for squash merges where no association survives; only the
/// first match counts.
pub fn pull_number_from_message(message: &str) -> Option<u64> {
    PULL_NUMBER_RE
        .captures(first_message_line(message))
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
