//! # contract: shared data model and the fetch seam
//!
//! - [`DiscussionRecord`] is the wire shape of one discussion node.
//! - [`FetchOutcome`] carries the swallow-and-continue fetch policy as a type, so
//!   callers can tell "no discussions" apart from "the fetch broke".
//! - [`DiscussionSource`] is the trait the pipeline fetches through. The real
//!   implementation is [`crate::download::GraphQlDownloader`]; tests use the
//!   generated `MockDiscussionSource`.

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Deserialize;

/// A category label attached to a discussion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub name: String,
}

/// One discussion as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionRecord {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: String,
    pub category: Category,
}

impl DiscussionRecord {
    /// Date portion of `created_at` (everything before the first `T`).
    pub fn date(&self) -> &str {
        self.created_at
            .split_once('T')
            .map_or(self.created_at.as_str(), |(date, _)| date)
    }

    pub fn body_or_empty(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    pub fn category_name(&self) -> &str {
        &self.category.name
    }
}

/// Result of fetching every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// All pages were fetched.
    Complete(Vec<DiscussionRecord>),
    /// The API reported an error; `records` holds the pages fetched before it.
    Partial {
        records: Vec<DiscussionRecord>,
        errors: Vec<String>,
    },
    /// Transport or decoding failure. Nothing is kept.
    Failed { reason: String },
}

impl FetchOutcome {
    pub fn records(&self) -> &[DiscussionRecord] {
        match self {
            FetchOutcome::Complete(records) | FetchOutcome::Partial { records, .. } => records,
            FetchOutcome::Failed { .. } => &[],
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, FetchOutcome::Complete(_))
    }

    pub fn status(&self) -> FetchStatus {
        match self {
            FetchOutcome::Complete(_) => FetchStatus::Complete,
            FetchOutcome::Partial { .. } => FetchStatus::Partial,
            FetchOutcome::Failed { .. } => FetchStatus::Failed,
        }
    }

    /// Human-readable problems, empty for a complete fetch.
    pub fn warnings(&self) -> Vec<String> {
        match self {
            FetchOutcome::Complete(_) => Vec::new(),
            FetchOutcome::Partial { errors, .. } => errors
                .iter()
                .map(|e| format!("API error: {e}"))
                .collect(),
            FetchOutcome::Failed { reason } => vec![format!("fetch failed: {reason}")],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Complete,
    Partial,
    Failed,
}

/// Anything that can produce the full discussion list for one repository.
///
/// Implementations never fail: problems are folded into the [`FetchOutcome`].
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DiscussionSource: Send + Sync {
    async fn fetch_all(&self) -> FetchOutcome;
}
