//! Turning raw commits into selectable backport choices
//!
//! The resolvers in this module are pure: given a commit and its remote
//! association data they derive the merging pull request, any existing
//! backports, and the suggested target branches. [`fetch`] drives the
//! remote queries and applies them per commit.

mod association;
mod backports;
mod fetch;
mod format;
mod labels;

pub use association::{associated_pull_request, pull_number_from_message};
pub use backports::existing_backport_prs;
pub use fetch::{
    build_commit_choice, fetch_commit_by_pull_number, fetch_commit_by_sha, fetch_commits_by_author,
};
pub use format::{first_message_line, formatted_commit_message, short_sha};
pub use labels::target_branches_from_labels;
