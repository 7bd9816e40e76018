//! Backport commits to other branches with a single command.
//!
//! The flow mirrors what you would do by hand: find the commit on the
//! source branch, pick the branches to backport to, cherry-pick onto a
//! fresh branch and open a pull request. GitHub is queried for the
//! commits, their pull requests and any backports that already exist;
//! the cherry-picking happens in a local clone kept under `~/.backport`.

pub mod commits;
pub mod error;
pub mod git;
pub mod github;
pub mod options;
pub mod prompt;
pub mod types;
