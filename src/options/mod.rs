//! Option resolution
//!
//! Options come from four places, in order of precedence: command line
//! arguments, the project config (`.backportrc.json`), the global config
//! (`~/.backport/config.json`), and finally the environment
//! (`GITHUB_TOKEN`). [`resolve_options`] merges them into a single
//! [`BackportOptions`] used everywhere else.

mod cli;
mod config;

pub use cli::CliArgs;
pub use config::{BranchChoiceConfig, ConfigFile, global_config_path};

use crate::error::{Error, Result};
use crate::types::{BranchChoice, BranchLabelRule, RepoId};
use std::path::Path;
use tracing::debug;

/// Number of commits listed when `--count` is not given
pub const DEFAULT_COMMITS_COUNT: u32 = 10;
/// Default base url for GitHub's REST (v3) API
pub const DEFAULT_API_BASE_URL_V3: &str = "https://api.github.com";
/// Default base url for GitHub's GraphQL (v4) API
pub const DEFAULT_API_BASE_URL_V4: &str = "https://api.github.com/graphql";
/// Default hostname used for git remotes
pub const DEFAULT_GIT_HOSTNAME: &str = "github.com";
/// Default pull request title template
pub const DEFAULT_PR_TITLE: &str = "[{targetBranch}] {commitMessages}";

/// Fully resolved options
#[derive(Debug, Clone)]
pub struct BackportOptions {
    /// GitHub access token
    pub access_token: String,
    /// GitHub username of the person running the tool
    pub username: String,
    /// Author to list commits for, `None` lists commits by all authors
    pub author: Option<String>,
    /// Repository to backport from
    pub upstream: RepoId,
    /// Branch to list commits from, `None` means the default branch
    pub source_branch: Option<String>,
    /// Number of commits to choose from
    pub commits_count: u32,
    /// Only list commits touching files under this path
    pub path: Option<String>,
    /// Backport the merge commit of this pull request, skipping the commit prompt
    pub pull_number: Option<u64>,
    /// Backport this commit, skipping the commit prompt
    pub sha: Option<String>,
    /// Target branches, skipping the branch prompt
    pub target_branches: Vec<String>,
    /// Branches offered in the target-branch prompt
    pub target_branch_choices: Vec<BranchChoice>,
    /// Compiled label-to-branch rules, in declaration order
    pub branch_label_rules: Vec<BranchLabelRule>,
    /// Allow selecting multiple commits
    pub multiple_commits: bool,
    /// Allow selecting multiple target branches
    pub multiple_branches: bool,
    /// Push the backport branch to a fork instead of upstream
    pub fork: bool,
    /// Hostname used for git remotes
    pub git_hostname: String,
    /// Base url for GitHub's REST (v3) API
    pub github_api_base_url_v3: String,
    /// Base url for GitHub's GraphQL (v4) API
    pub github_api_base_url_v4: String,
    /// Labels added to the backport pull request
    pub labels: Vec<String>,
    /// Labels added to the source pull request once the backport is created
    pub backport_created_labels: Vec<String>,
    /// Pull request title template
    pub pr_title: String,
    /// Text appended to the pull request description
    pub pr_description: Option<String>,
    /// Parent number passed to `git cherry-pick --mainline`
    pub mainline: Option<u32>,
    /// Set yourself as the author of the backported commits
    pub reset_author: bool,
    /// Skip pushing and opening the pull request
    pub dry_run: bool,
    /// Editor opened during conflict resolution
    pub editor: Option<String>,
    /// Verbose logging
    pub verbose: bool,
}

/// Resolve options from CLI arguments, config files and the environment
pub fn resolve_options(args: CliArgs, working_dir: &Path) -> Result<BackportOptions> {
    let global = config::load_global_config()?;
    let project = config::load_project_config(working_dir)?;
    let env_token = std::env::var("GITHUB_TOKEN").ok();
    resolve_from_parts(args, global, project, env_token)
}

/// Merge the option sources; CLI wins over project, project over global
pub fn resolve_from_parts(
    args: CliArgs,
    global: ConfigFile,
    project: ConfigFile,
    env_token: Option<String>,
) -> Result<BackportOptions> {
    let access_token = args
        .access_token
        .or(project.access_token)
        .or(global.access_token)
        .or(env_token)
        .ok_or_else(|| {
            Error::Config(
                "Missing access token. Add \"accessToken\" to ~/.backport/config.json \
                 or set the GITHUB_TOKEN environment variable"
                    .to_string(),
            )
        })?;

    let username = args
        .username
        .or(project.username)
        .or(global.username)
        .ok_or_else(|| {
            Error::Config(
                "Missing username. Add \"username\" to ~/.backport/config.json".to_string(),
            )
        })?;

    let upstream_raw = args
        .upstream
        .or(project.upstream)
        .or(global.upstream)
        .ok_or_else(|| {
            Error::Config(
                "Missing upstream repository. Add \"upstream\" to .backportrc.json".to_string(),
            )
        })?;
    let upstream = parse_upstream(&upstream_raw)?;

    // `--all` lists commits by everyone; otherwise a specific author wins
    // over the username fallback.
    let all = args.all || project.all.or(global.all).unwrap_or(false);
    let author = if all {
        None
    } else {
        Some(
            args.author
                .or(project.author)
                .or(global.author)
                .unwrap_or_else(|| username.clone()),
        )
    };

    let branch_label_rules = compile_branch_label_rules(
        project
            .branch_label_mapping
            .or(global.branch_label_mapping)
            .unwrap_or_default(),
    )?;

    let target_branch_choices = project
        .target_branch_choices
        .or(global.target_branch_choices)
        .unwrap_or_default()
        .into_iter()
        .map(BranchChoice::from)
        .collect();

    let commits_count = args
        .commits_count
        .or(project.commits_count)
        .or(global.commits_count)
        .unwrap_or(DEFAULT_COMMITS_COUNT);
    if commits_count == 0 {
        return Err(Error::InvalidArgument(
            "\"--commits-count\" must be at least 1".to_string(),
        ));
    }

    let multiple = args
        .multiple
        .or(project.multiple)
        .or(global.multiple);
    let multiple_commits = args
        .multiple_commits
        .or(project.multiple_commits)
        .or(global.multiple_commits)
        .or(multiple)
        .unwrap_or(false);
    let multiple_branches = args
        .multiple_branches
        .or(project.multiple_branches)
        .or(global.multiple_branches)
        .or(multiple)
        .unwrap_or(true);

    let options = BackportOptions {
        access_token,
        author,
        upstream,
        source_branch: args
            .source_branch
            .or(project.source_branch)
            .or(global.source_branch),
        commits_count,
        path: args.path.or(project.path).or(global.path),
        pull_number: args.pull_number,
        sha: args.sha,
        target_branches: if args.target_branches.is_empty() {
            project
                .target_branches
                .or(global.target_branches)
                .unwrap_or_default()
        } else {
            args.target_branches
        },
        target_branch_choices,
        branch_label_rules,
        multiple_commits,
        multiple_branches,
        fork: args
            .fork
            .or(project.fork)
            .or(global.fork)
            .unwrap_or(true),
        git_hostname: args
            .git_hostname
            .or(project.git_hostname)
            .or(global.git_hostname)
            .unwrap_or_else(|| DEFAULT_GIT_HOSTNAME.to_string()),
        github_api_base_url_v3: args
            .github_api_base_url_v3
            .or(project.github_api_base_url_v3)
            .or(global.github_api_base_url_v3)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL_V3.to_string()),
        github_api_base_url_v4: args
            .github_api_base_url_v4
            .or(project.github_api_base_url_v4)
            .or(global.github_api_base_url_v4)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL_V4.to_string()),
        labels: if args.labels.is_empty() {
            project.labels.or(global.labels).unwrap_or_default()
        } else {
            args.labels
        },
        backport_created_labels: if args.backport_created_labels.is_empty() {
            project
                .backport_created_labels
                .or(global.backport_created_labels)
                .unwrap_or_default()
        } else {
            args.backport_created_labels
        },
        pr_title: args
            .pr_title
            .or(project.pr_title)
            .or(global.pr_title)
            .unwrap_or_else(|| DEFAULT_PR_TITLE.to_string()),
        pr_description: args
            .pr_description
            .or(project.pr_description)
            .or(global.pr_description),
        mainline: args.mainline,
        reset_author: args.reset_author
            || project.reset_author.or(global.reset_author).unwrap_or(false),
        dry_run: args.dry_run,
        editor: args.editor.or(project.editor).or(global.editor),
        verbose: args.verbose,
        username,
    };

    debug!(
        upstream = %options.upstream,
        author = ?options.author,
        commits_count = options.commits_count,
        "resolved options"
    );

    Ok(options)
}

/// Parse `owner/repo` into a [`RepoId`]
fn parse_upstream(upstream: &str) -> Result<RepoId> {
    let invalid = || {
        Error::InvalidArgument(format!(
            "Invalid upstream repository \"{upstream}\". Must be in the form \"owner/repo\""
        ))
    };

    let (owner, name) = upstream.split_once('/').ok_or_else(invalid)?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return Err(invalid());
    }

    Ok(RepoId {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// Compile the `branchLabelMapping` config entries, keeping declaration order
fn compile_branch_label_rules(
    mapping: serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<BranchLabelRule>> {
    mapping
        .into_iter()
        .map(|(pattern, target)| {
            let target_branch = target
                .as_str()
                .ok_or_else(|| {
                    Error::Config(format!(
                        "Invalid branchLabelMapping value for \"{pattern}\": expected a string"
                    ))
                })?
                .to_string();

            let pattern = regex::Regex::new(&pattern).map_err(|e| {
                Error::Config(format!("Invalid branchLabelMapping pattern \"{pattern}\": {e}"))
            })?;

            Ok(BranchLabelRule {
                pattern,
                target_branch,
            })
        })
        .collect()
}
