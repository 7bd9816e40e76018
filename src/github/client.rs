//! GitHub client backed by octocrab (v3) and raw GraphQL (v4)

use crate::error::{Error, Result};
use crate::github::{
    CreatedPullRequest, GitHubApi, GraphqlClient, HistoryQuery, NewPullRequest, PullRequestSource,
};
use crate::options::BackportOptions;
use crate::types::{
    CrossReference, PullRequestCandidate, PullRequestState, ReferencedPullRequest, RepoId,
    SourceCommit,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

/// Selection set shared by every query that returns commits
///
/// Window sizes: one associated pull request per commit, 50 labels, the
/// last 20 cross-reference events, and 20 commits per referencing pull
/// request.
const COMMIT_FRAGMENT: &str = r"
    fragment CommitFields on Commit {
        oid
        message
        associatedPullRequests(first: 1) {
            edges {
                node {
                    repository {
                        owner {
                            login
                        }
                        name
                    }
                    number
                    mergeCommit {
                        oid
                    }
                    labels(first: 50) {
                        nodes {
                            name
                        }
                    }
                    timelineItems(last: 20, itemTypes: CROSS_REFERENCED_EVENT) {
                        edges {
                            node {
                                ... on CrossReferencedEvent {
                                    source {
                                        __typename
                                        ... on PullRequest {
                                            title
                                            state
                                            baseRefName
                                            commits(first: 20) {
                                                edges {
                                                    node {
                                                        commit {
                                                            message
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
";

const AUTHOR_ID_QUERY: &str = r"
    query AuthorId($login: String!) {
        user(login: $login) {
            id
        }
    }
";

const COMMIT_HISTORY_QUERY: &str = r"
    query CommitsOnBranch(
        $repoOwner: String!
        $repoName: String!
        $commitsCount: Int!
        $sourceBranch: String!
        $authorId: ID
        $historyPath: String
    ) {
        repository(owner: $repoOwner, name: $repoName) {
            ref(qualifiedName: $sourceBranch) {
                target {
                    ... on Commit {
                        history(
                            first: $commitsCount
                            author: { id: $authorId }
                            path: $historyPath
                        ) {
                            edges {
                                node {
                                    ...CommitFields
                                }
                            }
                        }
                    }
                }
            }
        }
    }
";

const PULL_REQUEST_QUERY: &str = r"
    query PullRequestMergeCommit($repoOwner: String!, $repoName: String!, $pullNumber: Int!) {
        repository(owner: $repoOwner, name: $repoName) {
            pullRequest(number: $pullNumber) {
                baseRefName
                mergeCommit {
                    ...CommitFields
                }
            }
        }
    }
";

const COMMIT_BY_SHA_QUERY: &str = r"
    query CommitBySha($repoOwner: String!, $repoName: String!, $sha: String!) {
        repository(owner: $repoOwner, name: $repoName) {
            object(expression: $sha) {
                ... on Commit {
                    ...CommitFields
                }
            }
        }
    }
";

// Wire types shaped after the remote's JSON

#[derive(Deserialize)]
struct AuthorIdData {
    user: Option<AuthorIdUser>,
}

#[derive(Deserialize)]
struct AuthorIdUser {
    id: String,
}

#[derive(Deserialize)]
struct HistoryData {
    repository: HistoryRepository,
}

#[derive(Deserialize)]
struct HistoryRepository {
    #[serde(rename = "ref")]
    branch_ref: Option<BranchRef>,
}

#[derive(Deserialize)]
struct BranchRef {
    target: BranchTarget,
}

#[derive(Deserialize)]
struct BranchTarget {
    history: CommitHistory,
}

#[derive(Deserialize)]
struct CommitHistory {
    edges: Vec<CommitEdge>,
}

#[derive(Deserialize)]
struct CommitEdge {
    node: CommitNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    oid: String,
    message: String,
    associated_pull_requests: PullRequestConnection,
}

#[derive(Deserialize)]
struct PullRequestConnection {
    edges: Vec<PullRequestEdge>,
}

#[derive(Deserialize)]
struct PullRequestEdge {
    node: PullRequestNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    number: u64,
    repository: RepositoryNode,
    merge_commit: Option<MergeCommitNode>,
    labels: LabelConnection,
    timeline_items: TimelineConnection,
}

#[derive(Deserialize)]
struct RepositoryNode {
    owner: OwnerNode,
    name: String,
}

#[derive(Deserialize)]
struct OwnerNode {
    login: String,
}

#[derive(Deserialize)]
struct MergeCommitNode {
    oid: String,
}

#[derive(Deserialize)]
struct LabelConnection {
    nodes: Vec<LabelNode>,
}

#[derive(Deserialize)]
struct LabelNode {
    name: String,
}

#[derive(Deserialize)]
struct TimelineConnection {
    edges: Vec<Option<TimelineEdge>>,
}

#[derive(Deserialize)]
struct TimelineEdge {
    node: TimelineNode,
}

#[derive(Deserialize)]
struct TimelineNode {
    source: CrossReferenceSource,
}

/// Source of a cross-reference event
///
/// The pull request fields come from an inline fragment, so they are
/// absent for issues and any other source kinds.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrossReferenceSource {
    #[serde(rename = "__typename")]
    typename: String,
    title: Option<String>,
    state: Option<PullRequestState>,
    base_ref_name: Option<String>,
    commits: Option<ReferencedCommitConnection>,
}

#[derive(Deserialize)]
struct ReferencedCommitConnection {
    edges: Vec<ReferencedCommitEdge>,
}

#[derive(Deserialize)]
struct ReferencedCommitEdge {
    node: ReferencedCommitNode,
}

#[derive(Deserialize)]
struct ReferencedCommitNode {
    commit: ReferencedCommit,
}

#[derive(Deserialize)]
struct ReferencedCommit {
    message: String,
}

#[derive(Deserialize)]
struct PullRequestData {
    repository: PullRequestRepository,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestRepository {
    pull_request: Option<PullRequestDetail>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestDetail {
    base_ref_name: String,
    merge_commit: Option<CommitNode>,
}

#[derive(Deserialize)]
struct CommitObjectData {
    repository: CommitObjectRepository,
}

#[derive(Deserialize)]
struct CommitObjectRepository {
    object: Option<CommitNode>,
}

impl From<CrossReferenceSource> for CrossReference {
    fn from(source: CrossReferenceSource) -> Self {
        match (
            source.typename.as_str(),
            source.title,
            source.state,
            source.base_ref_name,
            source.commits,
        ) {
            ("PullRequest", Some(title), Some(state), Some(base_branch), Some(commits)) => {
                Self::PullRequest(ReferencedPullRequest {
                    title,
                    state,
                    base_branch,
                    commit_messages: commits
                        .edges
                        .into_iter()
                        .map(|edge| edge.node.commit.message)
                        .collect(),
                })
            }
            _ => Self::Other,
        }
    }
}

impl From<PullRequestNode> for PullRequestCandidate {
    fn from(node: PullRequestNode) -> Self {
        Self {
            number: node.number,
            repo: RepoId {
                owner: node.repository.owner.login,
                name: node.repository.name,
            },
            merge_commit_sha: node.merge_commit.map(|commit| commit.oid),
            labels: node.labels.nodes.into_iter().map(|label| label.name).collect(),
            cross_references: node
                .timeline_items
                .edges
                .into_iter()
                .flatten()
                .map(|edge| edge.node.source.into())
                .collect(),
        }
    }
}

impl From<CommitNode> for SourceCommit {
    fn from(node: CommitNode) -> Self {
        Self {
            sha: node.oid,
            message: node.message,
            associated_pull_request: node
                .associated_pull_requests
                .edges
                .into_iter()
                .next()
                .map(|edge| edge.node.into()),
        }
    }
}

/// GitHub client for the backport flow
///
/// REST calls (pull request creation, labels, repository metadata) go
/// through octocrab against the configured v3 URL; commit queries go
/// through [`GraphqlClient`] against the configured v4 URL.
pub struct GitHubClient {
    octocrab: Octocrab,
    graphql: GraphqlClient,
    repo: RepoId,
}

impl GitHubClient {
    /// Create a client from resolved options
    pub fn new(options: &BackportOptions) -> Result<Self> {
        let octocrab = Octocrab::builder()
            .personal_token(options.access_token.clone())
            .base_uri(&options.github_api_base_url_v3)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let graphql = GraphqlClient::new(&options.github_api_base_url_v4, &options.access_token)?;

        Ok(Self {
            octocrab,
            graphql,
            repo: options.upstream.clone(),
        })
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn resolve_author_id(&self, login: &str) -> Result<String> {
        debug!(login, "resolving author id");
        let data: AuthorIdData = self
            .graphql
            .query(AUTHOR_ID_QUERY, serde_json::json!({ "login": login }))
            .await?;

        data.user.map(|user| user.id).ok_or_else(|| {
            Error::GitHubApi(format!("Could not resolve the author id for \"{login}\""))
        })
    }

    async fn commit_history(&self, query: &HistoryQuery) -> Result<Vec<SourceCommit>> {
        debug!(
            source_branch = %query.source_branch,
            commits_count = query.commits_count,
            "fetching commit history"
        );
        let graphql_query = format!("{COMMIT_HISTORY_QUERY}{COMMIT_FRAGMENT}");
        let data: HistoryData = self
            .graphql
            .query(
                &graphql_query,
                serde_json::json!({
                    "repoOwner": self.repo.owner,
                    "repoName": self.repo.name,
                    "sourceBranch": query.source_branch,
                    "commitsCount": query.commits_count,
                    "authorId": query.author_id,
                    "historyPath": query.path,
                }),
            )
            .await?;

        // A null ref means the branch itself is missing; an empty history
        // is a valid result.
        let branch_ref =
            data.repository
                .branch_ref
                .ok_or_else(|| Error::SourceBranchNotFound {
                    branch: query.source_branch.clone(),
                    repo: self.repo.to_string(),
                })?;

        Ok(branch_ref
            .target
            .history
            .edges
            .into_iter()
            .map(|edge| edge.node.into())
            .collect())
    }

    async fn commit_by_pull_number(&self, pull_number: u64) -> Result<PullRequestSource> {
        debug!(pull_number, "fetching pull request merge commit");
        let graphql_query = format!("{PULL_REQUEST_QUERY}{COMMIT_FRAGMENT}");
        let data: PullRequestData = self
            .graphql
            .query(
                &graphql_query,
                serde_json::json!({
                    "repoOwner": self.repo.owner,
                    "repoName": self.repo.name,
                    "pullNumber": pull_number,
                }),
            )
            .await?;

        let pull = data
            .repository
            .pull_request
            .ok_or_else(|| Error::PullRequestNotFound {
                number: pull_number,
                repo: self.repo.to_string(),
            })?;

        let commit = pull.merge_commit.ok_or_else(|| {
            Error::InvalidArgument(format!("The PR #{pull_number} is not merged"))
        })?;

        Ok(PullRequestSource {
            base_branch: pull.base_ref_name,
            commit: commit.into(),
        })
    }

    async fn commit_by_sha(&self, sha: &str) -> Result<SourceCommit> {
        debug!(sha, "fetching commit by sha");
        let graphql_query = format!("{COMMIT_BY_SHA_QUERY}{COMMIT_FRAGMENT}");
        let data: CommitObjectData = self
            .graphql
            .query(
                &graphql_query,
                serde_json::json!({
                    "repoOwner": self.repo.owner,
                    "repoName": self.repo.name,
                    "sha": sha,
                }),
            )
            .await?;

        data.repository
            .object
            .map(Into::into)
            .ok_or_else(|| Error::CommitNotFound {
                sha: sha.to_string(),
                repo: self.repo.to_string(),
            })
    }

    async fn default_branch(&self) -> Result<String> {
        debug!("fetching repository default branch");
        let repository = self
            .octocrab
            .repos(&self.repo.owner, &self.repo.name)
            .get()
            .await?;

        repository.default_branch.ok_or_else(|| {
            Error::GitHubApi("Repository response did not include a default branch".to_string())
        })
    }

    async fn create_pull_request(&self, pull: &NewPullRequest) -> Result<CreatedPullRequest> {
        debug!(head = %pull.head, base = %pull.base, "creating pull request");
        let created = self
            .octocrab
            .pulls(&self.repo.owner, &self.repo.name)
            .create(&pull.title, &pull.head, &pull.base)
            .body(&pull.body)
            .send()
            .await?;

        let result = CreatedPullRequest {
            number: created.number,
            html_url: created
                .html_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        };
        debug!(pull_number = result.number, "created pull request");
        Ok(result)
    }

    async fn add_labels(&self, pull_number: u64, labels: &[String]) -> Result<()> {
        debug!(pull_number, count = labels.len(), "adding labels");
        self.octocrab
            .issues(&self.repo.owner, &self.repo.name)
            .add_labels(pull_number, labels)
            .await?;
        Ok(())
    }

    fn repo(&self) -> &RepoId {
        &self.repo
    }
}
