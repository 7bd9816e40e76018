//! Interactive prompts
//!
//! [`Prompt`] abstracts the terminal so the selection flows can be tested
//! with scripted answers. The flows themselves loop until they have a
//! non-empty selection; cancelling the prompt is the only way out.

mod terminal;

pub use terminal::TerminalPrompt;

use crate::error::Result;
use crate::types::{BranchChoice, CommitChoice, PullRequestState};
use anstream::eprintln;
use owo_colors::OwoColorize;

/// A source of answers to interactive questions
pub trait Prompt: Send + Sync {
    /// Pick a single item, returning its index
    fn select_one(&self, message: &str, items: &[String]) -> Result<usize>;

    /// Pick any number of items, returning their indexes in list order
    fn select_many(
        &self,
        message: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>>;

    /// Ask a yes/no question
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Let the user pick the commits to backport
///
/// Commits are listed newest first, exactly as fetched. When several are
/// picked they are returned oldest first so cherry-picking applies them in
/// their original order.
pub fn select_commits(
    prompt: &dyn Prompt,
    commits: &[CommitChoice],
    multiple: bool,
) -> Result<Vec<CommitChoice>> {
    let rows: Vec<String> = commits
        .iter()
        .enumerate()
        .map(|(i, commit)| commit_row(i, commit))
        .collect();

    loop {
        if multiple {
            let defaults = vec![false; rows.len()];
            let indexes = prompt.select_many("Select commit to backport", &rows, &defaults)?;
            if indexes.is_empty() {
                eprintln!("{}", "Select at least one commit".yellow());
                continue;
            }
            return Ok(indexes
                .into_iter()
                .rev()
                .map(|i| commits[i].clone())
                .collect());
        }

        let index = prompt.select_one("Select commit to backport", &rows)?;
        return Ok(vec![commits[index].clone()]);
    }
}

/// Let the user pick the branches to backport to
///
/// `suggested` branches (derived from the source PR's labels) start out
/// checked, as do choices marked `checked` in config. The returned branches
/// keep the order they had in `choices`.
pub fn select_target_branches(
    prompt: &dyn Prompt,
    choices: &[BranchChoice],
    suggested: &[String],
    multiple: bool,
) -> Result<Vec<String>> {
    let rows: Vec<String> = choices.iter().map(|choice| choice.name.clone()).collect();

    loop {
        if multiple {
            let defaults: Vec<bool> = choices
                .iter()
                .map(|choice| choice.checked || suggested.contains(&choice.name))
                .collect();
            let indexes = prompt.select_many("Select branch to backport to", &rows, &defaults)?;
            if indexes.is_empty() {
                eprintln!("{}", "Select at least one branch".yellow());
                continue;
            }
            return Ok(indexes.into_iter().map(|i| rows[i].clone()).collect());
        }

        let index = prompt.select_one("Select branch to backport to", &rows)?;
        return Ok(vec![rows[index].clone()]);
    }
}

/// One line in the commit prompt: position, message and backport tags
fn commit_row(index: usize, commit: &CommitChoice) -> String {
    let position = format!("{}.", index + 1);
    let tags: Vec<String> = commit
        .existing_backports
        .iter()
        .map(|backport| match backport.state {
            PullRequestState::Merged => backport.branch.green().to_string(),
            _ => backport.branch.dimmed().to_string(),
        })
        .collect();

    if tags.is_empty() {
        format!("{} {}", position.dimmed(), commit.formatted_message)
    } else {
        format!(
            "{} {} {}",
            position.dimmed(),
            commit.formatted_message,
            tags.join(", ")
        )
    }
}
