//! Minimal transport for the GitHub GraphQL (v4) API

use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// Client posting queries to a configurable v4 endpoint
///
/// octocrab's GraphQL helper is tied to its REST base URI, which is not
/// the v4 URL on GitHub Enterprise. This client posts to the configured
/// endpoint directly.
pub struct GraphqlClient {
    http_client: Client,
    api_url: String,
    token: String,
}

impl GraphqlClient {
    /// Create a client for `api_url` (e.g. `https://api.github.com/graphql`)
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent("backport")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            api_url: api_url.to_string(),
            token: token.to_string(),
        })
    }

    /// Execute a query and decode the `data` payload
    ///
    /// Errors reported in the response envelope are joined into a single
    /// [`Error::GitHubApi`].
    pub async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        debug!(url = %self.api_url, "posting GraphQL query");

        let response = self
            .http_client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("GraphQL request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "GraphQL request failed with {status}: {body}"
            )));
        }

        let envelope: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse GraphQL response: {e}")))?;

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        envelope
            .data
            .ok_or_else(|| Error::GitHubApi("No data in GraphQL response".to_string()))
    }
}
