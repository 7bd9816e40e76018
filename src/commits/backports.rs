//! Detecting backport pull requests that already exist for a commit

use crate::commits::format::first_message_line;
use crate::types::{CrossReference, ExistingBackport, PullRequestCandidate, PullRequestState};

/// Backport pull requests already open or merged for this commit
///
/// Scans the cross-reference window of the merging pull request. A
/// referencing pull request counts as a backport when one of its commits
/// carries the same first message line, or when its title contains both the
/// message line and the original pull number. Closed references and
/// non-pull-request sources never count. Window order is preserved.
pub fn existing_backport_prs(
    message: &str,
    associated: Option<&PullRequestCandidate>,
) -> Vec<ExistingBackport> {
    let Some(pull) = associated else {
        return Vec::new();
    };

    let first_line = first_message_line(message);
    let number_text = pull.number.to_string();

    pull.cross_references
        .iter()
        .filter_map(|reference| match reference {
            CrossReference::PullRequest(source) => Some(source),
            CrossReference::Other => None,
        })
        .filter(|source| {
            if !matches!(
                source.state,
                PullRequestState::Open | PullRequestState::Merged
            ) {
                return false;
            }

            let commit_match = source
                .commit_messages
                .iter()
                .any(|m| first_message_line(m) == first_line);
            let title_match =
                source.title.contains(first_line) && source.title.contains(&number_text);

            commit_match || title_match
        })
        .map(|source| ExistingBackport {
            branch: source.base_branch.clone(),
            state: source.state,
        })
        .collect()
}
