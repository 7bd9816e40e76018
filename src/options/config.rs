//! Configuration files
//!
//! The global config lives at `~/.backport/config.json` and usually holds
//! the access token and username. Project settings live in
//! `.backportrc.json`, found by walking up from the working directory.

use crate::error::{Error, Result};
use crate::types::BranchChoice;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename of the per-project config
const PROJECT_CONFIG_FILE: &str = ".backportrc.json";

/// Raw contents of a config file (global or project; both share one schema)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// GitHub access token
    pub access_token: Option<String>,
    /// List commits by all authors
    pub all: Option<bool>,
    /// List commits by a specific author
    pub author: Option<String>,
    /// Labels added to the source pull request once the backport is created
    pub backport_created_labels: Option<Vec<String>>,
    /// Mapping from label pattern to target branch, in declaration order
    pub branch_label_mapping: Option<serde_json::Map<String, serde_json::Value>>,
    /// Number of commits to choose from
    pub commits_count: Option<u32>,
    /// Editor opened during conflict resolution
    pub editor: Option<String>,
    /// Push the backport branch to a fork instead of upstream
    pub fork: Option<bool>,
    /// Hostname for GitHub
    pub git_hostname: Option<String>,
    /// Base url for GitHub's REST (v3) API
    pub github_api_base_url_v3: Option<String>,
    /// Base url for GitHub's GraphQL (v4) API
    pub github_api_base_url_v4: Option<String>,
    /// Labels added to the backport pull request
    pub labels: Option<Vec<String>>,
    /// Select multiple commits and multiple target branches
    pub multiple: Option<bool>,
    /// Select multiple commits
    pub multiple_commits: Option<bool>,
    /// Select multiple target branches
    pub multiple_branches: Option<bool>,
    /// Only list commits touching files under this path
    pub path: Option<String>,
    /// Text appended to the pull request description
    pub pr_description: Option<String>,
    /// Pull request title template
    pub pr_title: Option<String>,
    /// Set yourself as the author of the backported commits
    pub reset_author: Option<bool>,
    /// Branch to list commits from
    pub source_branch: Option<String>,
    /// Branches offered in the target-branch prompt
    pub target_branch_choices: Option<Vec<BranchChoiceConfig>>,
    /// Target branches, skipping the branch prompt
    pub target_branches: Option<Vec<String>>,
    /// Repository to backport from, in `owner/repo` form
    pub upstream: Option<String>,
    /// GitHub username
    pub username: Option<String>,
}

/// A target-branch choice as written in config
///
/// Accepts both the shorthand `"6.1"` and the full
/// `{ "name": "6.1", "checked": true }` form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BranchChoiceConfig {
    /// Just the branch name
    Name(String),
    /// Branch name plus whether it starts out checked
    Full {
        /// Branch name
        name: String,
        /// Pre-checked in the prompt
        #[serde(default)]
        checked: bool,
    },
}

impl From<BranchChoiceConfig> for BranchChoice {
    fn from(config: BranchChoiceConfig) -> Self {
        match config {
            BranchChoiceConfig::Name(name) => Self {
                name,
                checked: false,
            },
            BranchChoiceConfig::Full { name, checked } => Self { name, checked },
        }
    }
}

/// Path of the global configuration file
pub fn global_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("Could not determine the home directory".to_string()))?;
    Ok(home.join(".backport").join("config.json"))
}

/// Load the global config, returning defaults when the file does not exist
pub fn load_global_config() -> Result<ConfigFile> {
    load_config_file(&global_config_path()?)
}

/// Load the project config, walking up from `dir` to find `.backportrc.json`
///
/// Returns defaults when no config file exists in `dir` or any ancestor.
pub fn load_project_config(dir: &Path) -> Result<ConfigFile> {
    match find_project_config(dir) {
        Some(path) => load_config_file(&path),
        None => Ok(ConfigFile::default()),
    }
}

fn find_project_config(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(PROJECT_CONFIG_FILE))
        .find(|candidate| candidate.exists())
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_project_config(temp.path()).unwrap();
        assert!(config.access_token.is_none());
        assert!(config.target_branch_choices.is_none());
    }

    #[test]
    fn test_parse_project_config() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            r#"{
                "upstream": "elastic/kibana",
                "targetBranchChoices": ["6.0", { "name": "6.1", "checked": true }],
                "branchLabelMapping": { "^backport:(.+)$": "$1" }
            }"#,
        )
        .unwrap();

        let config = load_project_config(temp.path()).unwrap();
        assert_eq!(config.upstream.as_deref(), Some("elastic/kibana"));

        let choices = config.target_branch_choices.unwrap();
        assert_eq!(
            choices,
            vec![
                BranchChoiceConfig::Name("6.0".to_string()),
                BranchChoiceConfig::Full {
                    name: "6.1".to_string(),
                    checked: true
                },
            ]
        );

        let mapping = config.branch_label_mapping.unwrap();
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_project_config_found_in_ancestor() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            r#"{ "upstream": "elastic/kibana" }"#,
        )
        .unwrap();

        let nested = temp.path().join("packages").join("core");
        fs::create_dir_all(&nested).unwrap();

        let config = load_project_config(&nested).unwrap();
        assert_eq!(config.upstream.as_deref(), Some("elastic/kibana"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROJECT_CONFIG_FILE), "{ not json").unwrap();

        let err = load_project_config(temp.path()).unwrap_err();
        assert!(
            err.to_string().contains(".backportrc.json"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_mapping_preserves_declaration_order() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            r#"{ "branchLabelMapping": { "zzz": "1", "aaa": "2", "mmm": "3" } }"#,
        )
        .unwrap();

        let config = load_project_config(temp.path()).unwrap();
        let keys: Vec<_> = config
            .branch_label_mapping
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["zzz", "aaa", "mmm"]);
    }
}
