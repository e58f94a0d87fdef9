use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::config::Token;
use crate::contract::{DiscussionRecord, DiscussionSource, FetchOutcome};

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

const CLIENT_USER_AGENT: &str = concat!("discussion-archive/", env!("CARGO_PKG_VERSION"));

/// Newest first, 100 per page.
pub const DISCUSSIONS_QUERY: &str = r#"
query($owner: String!, $name: String!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    discussions(first: 100, after: $cursor, orderBy: {field: CREATED_AT, direction: DESC}) {
      pageInfo { hasNextPage endCursor }
      nodes {
        title
        url
        body
        createdAt
        category { name }
      }
    }
  }
}
"#;

/// Which repository to read and how to reach the API.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub endpoint: String,
    pub owner: String,
    pub name: String,
    pub token: Option<Token>,
}

/// Reads every discussion of one repository through the GraphQL API.
pub struct GraphQlDownloader {
    config: DownloadConfig,
}

impl GraphQlDownloader {
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    async fn fetch_page(
        &self,
        client: &Client,
        cursor: Option<&str>,
    ) -> Result<GraphQlResponse, String> {
        let body = json!({
            "query": DISCUSSIONS_QUERY,
            "variables": {
                "owner": self.config.owner,
                "name": self.config.name,
                "cursor": cursor,
            },
        });

        let mut request = client
            .post(&self.config.endpoint)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .json(&body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token.expose());
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {e}", self.config.endpoint))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("failed to read response body: {e}"))?;
        debug!(status = %status, bytes = text.len(), "Received GraphQL response");

        // The body decides, not the status: error payloads arrive with 4xx codes too.
        serde_json::from_str(&text)
            .map_err(|e| format!("response (status {status}) could not be decoded as a GraphQL payload: {e}"))
    }
}

#[async_trait::async_trait]
impl DiscussionSource for GraphQlDownloader {
    async fn fetch_all(&self) -> FetchOutcome {
        let owner = &self.config.owner;
        let name = &self.config.name;
        info!(%owner, %name, endpoint = %self.config.endpoint, "Fetching discussions");

        let client = match Client::builder().build() {
            Ok(client) => client,
            Err(e) => {
                error!(error = ?e, "Failed to construct HTTP client");
                return FetchOutcome::Failed {
                    reason: format!("failed to construct HTTP client: {e}"),
                };
            }
        };

        let mut records: Vec<DiscussionRecord> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0usize;

        loop {
            page += 1;
            let response = match self.fetch_page(&client, cursor.as_deref()).await {
                Ok(response) => response,
                Err(reason) => {
                    error!(page, %reason, discarded = records.len(), "Fetch failed, archiving nothing");
                    return FetchOutcome::Failed { reason };
                }
            };

            let connection = match response.into_connection() {
                Ok(connection) => connection,
                Err(errors) => {
                    error!(
                        page,
                        ?errors,
                        kept = records.len(),
                        "API reported an error, stopping pagination"
                    );
                    return FetchOutcome::Partial { records, errors };
                }
            };

            let DiscussionConnection { page_info, nodes } = connection;
            debug!(page, nodes = nodes.len(), "Fetched discussion page");
            records.extend(usable_records(page, nodes));

            if !page_info.has_next_page {
                break;
            }
            match page_info.end_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    error!(page, "hasNextPage without endCursor, stopping pagination");
                    return FetchOutcome::Partial {
                        records,
                        errors: vec!["hasNextPage was true but endCursor was missing".into()],
                    };
                }
            }
        }

        info!(pages = page, records = records.len(), "Fetched all discussions");
        FetchOutcome::Complete(records)
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
    /// REST-style error body, e.g. `{"message": "Bad credentials"}`.
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    discussions: DiscussionConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscussionConnection {
    page_info: PageInfo,
    /// Kept raw so one null or incomplete node does not sink the page.
    nodes: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl GraphQlResponse {
    fn into_connection(self) -> Result<DiscussionConnection, Vec<String>> {
        let GraphQlResponse {
            data,
            errors,
            message,
        } = self;

        if let Some(errors) = errors.filter(|errors| !errors.is_empty()) {
            return Err(errors.into_iter().map(|e| e.message).collect());
        }
        match data.and_then(|d| d.repository) {
            Some(repository) => Ok(repository.discussions),
            None => Err(vec![
                message.unwrap_or_else(|| "response carried no repository data".to_string())
            ]),
        }
    }
}

/// Decodes each node on its own, skipping nulls and nodes missing required fields.
fn usable_records(page: usize, nodes: Vec<Value>) -> Vec<DiscussionRecord> {
    nodes
        .into_iter()
        .enumerate()
        .filter_map(|(index, node)| {
            if node.is_null() {
                warn!(page, index, "Skipping null discussion node");
                return None;
            }
            match serde_json::from_value::<DiscussionRecord>(node) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(page, index, error = %e, "Skipping discussion node with missing fields");
                    None
                }
            }
        })
        .collect()
}
