//! Local git operations
//!
//! Repositories are cloned once under
//! `~/.backport/repositories/{owner}/{repo}` and reused across runs. Every
//! operation shells out to `git` via [`tokio::process::Command`]; failures
//! carry git's stderr with the access token redacted.

use crate::error::{Error, Result};
use crate::options::BackportOptions;
use crate::types::CommitChoice;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Outcome of a cherry-pick attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CherryPickOutcome {
    /// The commit applied cleanly
    Clean,
    /// The cherry-pick stopped on conflicts in these files
    Conflicts(Vec<String>),
}

/// A local clone of the upstream repository
pub struct GitRepo {
    options: BackportOptions,
    repo_dir: PathBuf,
}

impl GitRepo {
    /// Locate (without touching) the local clone for `options.upstream`
    pub fn new(options: &BackportOptions) -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Git("Could not determine the home directory".to_string()))?;
        let repo_dir = home
            .join(".backport")
            .join("repositories")
            .join(&options.upstream.owner)
            .join(&options.upstream.name);

        Ok(Self {
            options: options.clone(),
            repo_dir,
        })
    }

    /// Directory of the local clone
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Whether the repository has been cloned before
    pub fn is_cloned(&self) -> bool {
        self.repo_dir.join(".git").exists()
    }

    /// Clone the upstream repository into [`Self::repo_dir`]
    pub async fn clone_repo(&self) -> Result<()> {
        if let Some(parent) = self.repo_dir.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Git(format!("failed to create {}: {e}", parent.display())))?;
        }

        let url = self.remote_url(&self.options.upstream.owner);
        debug!(dir = %self.repo_dir.display(), "cloning repository");

        let output = Command::new("git")
            .arg("clone")
            .arg(&url)
            .arg(&self.repo_dir)
            .output()
            .await
            .map_err(|e| Error::Git(format!("failed to run git: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::Git(
                self.scrub(&String::from_utf8_lossy(&output.stderr)),
            ))
        }
    }

    /// Add `owner` as a remote, replacing any previous definition
    pub async fn add_remote(&self, owner: &str) -> Result<()> {
        // The remote may not exist yet
        let _ = self.run_git(&["remote", "rm", owner]).await;
        let url = self.remote_url(owner);
        self.run_git(&["remote", "add", owner, &url]).await?;
        Ok(())
    }

    /// Make sure `branch` exists locally and matches the remote
    pub async fn fetch_source_branch(&self, branch: &str) -> Result<()> {
        let refspec = format!("{branch}:{branch}");
        self.run_git(&["fetch", &self.options.upstream.owner, &refspec, "--force"])
            .await?;
        Ok(())
    }

    /// Check out a fresh feature branch off the remote target branch
    ///
    /// Discards any local state left behind by a previous, interrupted run.
    pub async fn create_feature_branch(
        &self,
        target_branch: &str,
        feature_branch: &str,
    ) -> Result<()> {
        self.run_git(&["reset", "--hard"]).await?;
        self.run_git(&["clean", "-d", "--force"]).await?;

        let remote = &self.options.upstream.owner;
        if let Err(Error::Git(message)) = self.run_git(&["fetch", remote, target_branch]).await {
            if message.to_lowercase().contains("couldn't find remote ref") {
                return Err(Error::TargetBranchNotFound {
                    branch: target_branch.to_string(),
                });
            }
            return Err(Error::Git(message));
        }

        let start_point = format!("{remote}/{target_branch}");
        self.run_git(&["checkout", "-B", feature_branch, &start_point, "--no-track"])
            .await?;
        Ok(())
    }

    /// Cherry-pick `sha` onto the current branch
    pub async fn cherry_pick(&self, sha: &str) -> Result<CherryPickOutcome> {
        let mainline = self.options.mainline.map(|parent| parent.to_string());
        let mut args = vec!["cherry-pick"];
        if let Some(parent) = &mainline {
            args.push("--mainline");
            args.push(parent);
        }
        args.push(sha);

        match self.run_git(&args).await {
            Ok(_) => Ok(CherryPickOutcome::Clean),
            Err(err) => {
                let files = self.conflicting_files().await?;
                if files.is_empty() {
                    Err(err)
                } else {
                    Ok(CherryPickOutcome::Conflicts(files))
                }
            }
        }
    }

    /// Files currently in conflict
    pub async fn conflicting_files(&self) -> Result<Vec<String>> {
        let stdout = self
            .run_git(&["--no-pager", "diff", "--name-only", "--diff-filter=U"])
            .await?;
        Ok(stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(ToString::to_string)
            .collect())
    }

    /// Finish a cherry-pick after its conflicts were resolved
    ///
    /// Fails when the user already committed the resolution by hand, which
    /// is fine; the commit exists either way.
    pub async fn continue_cherry_pick(&self) {
        if let Err(err) = self
            .run_git(&["-c", "core.editor=true", "cherry-pick", "--continue"])
            .await
        {
            debug!(
                error = %err,
                "cherry-pick --continue failed, resolution was likely committed manually"
            );
        }
    }

    /// Abort an in-progress cherry-pick, if any
    pub async fn abort_cherry_pick(&self) {
        // There may be nothing to abort
        let _ = self.run_git(&["cherry-pick", "--abort"]).await;
    }

    /// Amend the head commit so `username` becomes its author
    pub async fn set_commit_author(&self, username: &str) -> Result<()> {
        let author = format!("{username} <{username}@users.noreply.github.com>");
        self.run_git(&["commit", "--amend", "--no-edit", "--author", &author])
            .await?;
        Ok(())
    }

    /// Force-push the feature branch to `remote_owner`'s repository
    pub async fn push_feature_branch(&self, remote_owner: &str, feature_branch: &str) -> Result<()> {
        let refspec = format!("{feature_branch}:{feature_branch}");
        self.run_git(&["push", remote_owner, &refspec, "--force"])
            .await?;
        Ok(())
    }

    /// Delete the local feature branch
    pub async fn delete_feature_branch(&self, feature_branch: &str) -> Result<()> {
        self.run_git(&["checkout", "--detach"]).await?;
        self.run_git(&["branch", "-D", feature_branch]).await?;
        Ok(())
    }

    /// Open the configured editor on the repository, if one is set
    pub fn open_editor(&self) -> Result<()> {
        let Some(editor) = &self.options.editor else {
            return Ok(());
        };
        let mut parts = editor.split_whitespace();
        let Some(program) = parts.next() else {
            return Ok(());
        };

        Command::new(program)
            .args(parts)
            .arg(&self.repo_dir)
            .spawn()
            .map_err(|e| Error::Git(format!("failed to open editor \"{editor}\": {e}")))?;
        Ok(())
    }

    async fn run_git(&self, args: &[&str]) -> Result<String> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .await
            .map_err(|e| Error::Git(format!("failed to run git: {e}")))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(Error::Git(
                self.scrub(&String::from_utf8_lossy(&output.stderr)),
            ))
        }
    }

    fn remote_url(&self, owner: &str) -> String {
        format!(
            "https://{}@{}/{owner}/{}.git",
            self.options.access_token, self.options.git_hostname, self.options.upstream.name
        )
    }

    /// git echoes remote urls on failure; keep the token out of error output
    fn scrub(&self, text: &str) -> String {
        text.replace(&self.options.access_token, "<REDACTED>")
            .trim()
            .to_string()
    }
}

/// Branch name for a backport, e.g. `backport/6.x/pr-123` or
/// `backport/6.x/commit-abcdef1`
pub fn feature_branch_name(target_branch: &str, commits: &[CommitChoice]) -> String {
    let mut refs = commits
        .iter()
        .map(|commit| match commit.pull_number {
            Some(number) => format!("pr-{number}"),
            None => format!("commit-{}", crate::commits::short_sha(&commit.sha)),
        })
        .collect::<Vec<_>>()
        .join("_");

    // Ref components are ASCII, so a byte truncation is safe
    if refs.len() > 200 {
        refs.truncate(200);
    }

    format!("backport/{target_branch}/{refs}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(sha: &str, pull_number: Option<u64>) -> CommitChoice {
        CommitChoice {
            source_branch: "master".to_string(),
            target_branches: Vec::new(),
            sha: sha.to_string(),
            formatted_message: String::new(),
            pull_number,
            existing_backports: Vec::new(),
        }
    }

    #[test]
    fn test_branch_name_from_pull_number() {
        let commits = vec![commit("f3b618b9421fdecdb36862f907afbdd6344b361d", Some(123))];
        assert_eq!(feature_branch_name("6.x", &commits), "backport/6.x/pr-123");
    }

    #[test]
    fn test_branch_name_from_sha() {
        let commits = vec![commit("f3b618b9421fdecdb36862f907afbdd6344b361d", None)];
        assert_eq!(
            feature_branch_name("6.x", &commits),
            "backport/6.x/commit-f3b618b"
        );
    }

    #[test]
    fn test_branch_name_joins_multiple_commits() {
        let commits = vec![
            commit("f3b618b9421fdecdb36862f907afbdd6344b361d", Some(123)),
            commit("99af6e7a2eea3e1f10a3b57cd0fd5b3b6ba35db7", None),
        ];
        assert_eq!(
            feature_branch_name("7.x", &commits),
            "backport/7.x/pr-123_commit-99af6e7"
        );
    }

    #[test]
    fn test_branch_name_is_truncated() {
        let commits: Vec<CommitChoice> = (0..50)
            .map(|i| commit("f3b618b9421fdecdb36862f907afbdd6344b361d", Some(10_000 + i)))
            .collect();
        let name = feature_branch_name("6.x", &commits);
        assert_eq!(name.len(), "backport/6.x/".len() + 200);
    }
}
