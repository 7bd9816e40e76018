//! The backport flow, from argument parsing to the opened pull request

use crate::cli::style;
use anstream::{eprintln, println};
use backport::commits;
use backport::error::{Error, Result};
use backport::git::{CherryPickOutcome, GitRepo, feature_branch_name};
use backport::github::{GitHubApi, GitHubClient, pull_request_payload};
use backport::options::{BackportOptions, CliArgs, resolve_options};
use backport::prompt::{self, Prompt, TerminalPrompt};
use backport::types::CommitChoice;
use owo_colors::OwoColorize;
use terminal_link::Link;
use tracing::debug;

/// Run a backport with the given command line arguments
pub async fn run(args: CliArgs) -> Result<()> {
    let working_dir = std::env::current_dir()
        .map_err(|e| Error::Config(format!("could not determine the working directory: {e}")))?;
    let options = resolve_options(args, &working_dir)?;
    let api = GitHubClient::new(&options)?;
    run_with(&options, &api, &TerminalPrompt).await
}

async fn run_with(
    options: &BackportOptions,
    api: &dyn GitHubApi,
    prompt: &dyn Prompt,
) -> Result<()> {
    // Also serves as the access check: a bad token fails here, before
    // any prompts are shown.
    let default_branch = api.default_branch().await?;
    let source_branch = options.source_branch.clone().unwrap_or(default_branch);
    debug!(source_branch, "resolved source branch");

    let selected = gather_commits(options, api, prompt, &source_branch).await?;
    let target_branches = gather_target_branches(options, prompt, &selected)?;

    let repo = GitRepo::new(options)?;
    setup_repo(options, &repo).await?;

    for target_branch in &target_branches {
        match backport_to_branch(options, api, prompt, &repo, &selected, target_branch).await {
            Ok(()) => {}
            // An abort cancels this branch only; remaining targets still run
            Err(Error::Aborted) => {
                eprintln!("{}", format!("Backport to {target_branch} aborted").yellow());
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

/// Figure out which commits to backport
///
/// `--pr` and `--sha` pin a single commit; otherwise the newest commits on
/// the source branch are listed for interactive selection.
async fn gather_commits(
    options: &BackportOptions,
    api: &dyn GitHubApi,
    prompt: &dyn Prompt,
    source_branch: &str,
) -> Result<Vec<CommitChoice>> {
    if let Some(pull_number) = options.pull_number {
        let bar = style::spinner(&format!("Loading merge commit for #{pull_number}"));
        let commit = commits::fetch_commit_by_pull_number(api, options, pull_number).await;
        bar.finish_and_clear();
        return Ok(vec![commit?]);
    }

    if let Some(sha) = &options.sha {
        let bar = style::spinner(&format!("Loading commit {}", commits::short_sha(sha)));
        let commit = commits::fetch_commit_by_sha(api, options, source_branch, sha).await;
        bar.finish_and_clear();
        return Ok(vec![commit?]);
    }

    let bar = style::spinner("Loading commits");
    let candidates = commits::fetch_commits_by_author(api, options, source_branch).await;
    bar.finish_and_clear();
    let candidates = candidates?;

    if candidates.is_empty() {
        let author = options.author.as_deref().unwrap_or(&options.username);
        return Err(Error::InvalidArgument(format!(
            "There are no commits by \"{author}\" in this repository. Try \"--all\" for commits \
             by all users or \"--author=<username>\" for commits from a specific user"
        )));
    }

    prompt::select_commits(prompt, &candidates, options.multiple_commits)
}

/// Figure out which branches to backport to
///
/// `--branch` skips the prompt. Branches suggested by the source pull
/// request's labels start out checked.
fn gather_target_branches(
    options: &BackportOptions,
    prompt: &dyn Prompt,
    selected: &[CommitChoice],
) -> Result<Vec<String>> {
    if !options.target_branches.is_empty() {
        return Ok(options.target_branches.clone());
    }

    if options.target_branch_choices.is_empty() {
        return Err(Error::Config(
            "Missing target branches. Add \"targetBranchChoices\" to .backportrc.json or pass \
             \"--branch <branch>\""
                .to_string(),
        ));
    }

    let mut suggested: Vec<String> = Vec::new();
    for commit in selected {
        for branch in &commit.target_branches {
            if !suggested.contains(branch) {
                suggested.push(branch.clone());
            }
        }
    }

    prompt::select_target_branches(
        prompt,
        &options.target_branch_choices,
        &suggested,
        options.multiple_branches,
    )
}

/// Make sure a local clone exists with the right remotes
async fn setup_repo(options: &BackportOptions, repo: &GitRepo) -> Result<()> {
    if !repo.is_cloned() {
        let bar = style::spinner(&format!(
            "Cloning repository from {} (one-time operation)",
            options.git_hostname
        ));
        let cloned = repo.clone_repo().await;
        bar.finish_and_clear();
        cloned?;
    }

    repo.add_remote(&options.upstream.owner).await?;
    if options.fork {
        repo.add_remote(&options.username).await?;
    }
    Ok(())
}

/// Cherry-pick the commits onto `target_branch` and open the pull request
async fn backport_to_branch(
    options: &BackportOptions,
    api: &dyn GitHubApi,
    prompt: &dyn Prompt,
    repo: &GitRepo,
    selected: &[CommitChoice],
    target_branch: &str,
) -> Result<()> {
    println!(
        "\n{}",
        format!("Backporting the following commits to {target_branch}:").bold()
    );
    for commit in selected {
        println!(" - {}", commit.formatted_message);
    }

    let feature_branch = feature_branch_name(target_branch, selected);
    repo.create_feature_branch(target_branch, &feature_branch)
        .await?;

    for commit in selected {
        repo.fetch_source_branch(&commit.source_branch).await?;
        match repo.cherry_pick(&commit.sha).await? {
            CherryPickOutcome::Clean => {}
            CherryPickOutcome::Conflicts(files) => {
                if let Err(err) = resolve_conflicts(prompt, repo, files).await {
                    // Leave the clone clean for the next target branch
                    repo.abort_cherry_pick().await;
                    repo.delete_feature_branch(&feature_branch).await?;
                    return Err(err);
                }
            }
        }
        if options.reset_author {
            repo.set_commit_author(&options.username).await?;
        }
    }

    if options.dry_run {
        repo.delete_feature_branch(&feature_branch).await?;
        style::success(format!("Dry run complete for {target_branch}"));
        return Ok(());
    }

    let head_owner = if options.fork {
        options.username.as_str()
    } else {
        options.upstream.owner.as_str()
    };
    repo.push_feature_branch(head_owner, &feature_branch).await?;
    repo.delete_feature_branch(&feature_branch).await?;

    let bar = style::spinner("Creating pull request");
    let payload = pull_request_payload(options, selected, target_branch, head_owner);
    let created = api.create_pull_request(&payload).await;
    bar.finish_and_clear();
    let created = created?;

    if !options.labels.is_empty() {
        api.add_labels(created.number, &options.labels).await?;
    }
    if !options.backport_created_labels.is_empty() {
        for commit in selected {
            if let Some(number) = commit.pull_number {
                api.add_labels(number, &options.backport_created_labels)
                    .await?;
            }
        }
    }

    if supports_hyperlinks::supports_hyperlinks() {
        let link = Link::new("View pull request", &created.html_url);
        style::success(format!("Backport to {target_branch} created: {link}"));
    } else {
        style::success(format!(
            "Backport to {target_branch} created: {}",
            created.html_url
        ));
    }

    Ok(())
}

/// Wait for the user to fix cherry-pick conflicts, then finish the pick
async fn resolve_conflicts(
    prompt: &dyn Prompt,
    repo: &GitRepo,
    mut files: Vec<String>,
) -> Result<()> {
    repo.open_editor()?;

    loop {
        eprintln!("\n{}", "The following files have conflicts:".bold());
        for file in &files {
            eprintln!(" - {}", repo.repo_dir().join(file).display());
        }
        eprintln!(
            "{}",
            "You do not need to `git add` or `git commit` the files. Simply fix the conflicts."
                .dimmed()
        );

        if !prompt.confirm("Press ENTER when the conflicts are resolved")? {
            return Err(Error::Aborted);
        }

        files = repo.conflicting_files().await?;
        if files.is_empty() {
            break;
        }
    }

    repo.continue_cherry_pick().await;
    Ok(())
}
