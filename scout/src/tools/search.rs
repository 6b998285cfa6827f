//! DuckDuckGo web search tool.
//!
//! The tool is total: provider failures and empty results are rendered as
//! descriptive text returned to the model, never as tool faults. Structured
//! errors exist only at the [`SearchProvider`] transport boundary and are
//! logged before conversion.

use crate::error::ToolError;
use crate::tool::Tool;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::warn;

/// DuckDuckGo Lite query endpoint.
pub(crate) const DUCKDUCKGO_LITE_URL: &str = "https://lite.duckduckgo.com/lite/";

/// User agent sent with search requests.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default maximum number of records returned per search.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Default search request timeout in seconds.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;

// Pre-compiled patterns for the DuckDuckGo Lite result markup.
static RESULT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="result-link"[^>]*href="([^"]+)"[^>]*>([^<]+)</a>"#).expect("valid regex")
});
static RESULT_SNIPPET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="result-snippet"[^>]*>([^<]+)"#).expect("valid regex"));

/// Error type at the search transport boundary.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SearchError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP status {code}")]
    Status {
        /// The status code returned by the provider.
        code: u16,
    },

    /// Request timed out.
    #[error("Request timed out after {seconds}s")]
    Timeout {
        /// The configured timeout in seconds.
        seconds: u64,
    },
}

/// A single search result record.
///
/// Missing fields are carried as `None` and replaced by placeholder text at
/// format time, never treated as failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Title of the result.
    pub title: Option<String>,
    /// Description/snippet of the result.
    pub snippet: Option<String>,
    /// URL of the result.
    pub url: Option<String>,
}

/// Transport boundary for web search backends.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Retrieve up to `max_results` records for the query, in provider
    /// relevance order.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchRecord>, SearchError>;
}

/// Search provider backed by the DuckDuckGo Lite HTML interface.
#[derive(Debug, Clone)]
pub struct DuckDuckGo {
    http_client: reqwest::Client,
    timeout_secs: u64,
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_TIMEOUT_SECS)
    }
}

impl DuckDuckGo {
    /// Create a new provider with the given request timeout in seconds.
    #[must_use]
    pub fn new(timeout_secs: u64) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            timeout_secs,
        }
    }

    /// Parse the DuckDuckGo Lite HTML response.
    fn parse_html(html: &str) -> Vec<SearchRecord> {
        let links: Vec<_> = RESULT_LINK_RE.captures_iter(html).collect();
        let snippets: Vec<_> = RESULT_SNIPPET_RE.captures_iter(html).collect();

        links
            .iter()
            .enumerate()
            .map(|(i, link_cap)| {
                let url = link_cap.get(1).map(|m| m.as_str().to_string());
                let title = link_cap.get(2).map(|m| m.as_str().trim().to_string());
                let snippet = snippets
                    .get(i)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().trim().to_string());

                SearchRecord {
                    title,
                    snippet,
                    url,
                }
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGo {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchRecord>, SearchError> {
        let url = format!("{DUCKDUCKGO_LITE_URL}?q={}", urlencoding::encode(query));

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout {
                    seconds: self.timeout_secs,
                }
            } else {
                SearchError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                code: status.as_u16(),
            });
        }

        let html = response.text().await?;
        let records = Self::parse_html(&html);

        Ok(records.into_iter().take(max_results).collect())
    }
}

/// Arguments for the search tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchArgs {
    /// The search query string.
    pub query: String,
}

/// Web search tool exposed to the model as `duckduckgo_search`.
#[derive(Clone)]
pub struct SearchTool {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl Default for SearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SearchTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchTool")
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl SearchTool {
    /// Create a new search tool backed by [`DuckDuckGo`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_provider(Arc::new(DuckDuckGo::default()))
    }

    /// Create a search tool with a custom provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set the maximum number of records per search.
    #[must_use]
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Render records as the numbered summary returned to the model.
    fn format_results(query: &str, records: &[SearchRecord]) -> String {
        if records.is_empty() {
            return format!("No search results found for '{query}'.");
        }

        let entries: Vec<String> = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let title = record.title.as_deref().unwrap_or("No title");
                let snippet = record
                    .snippet
                    .as_deref()
                    .unwrap_or("No description available");
                let url = record.url.as_deref().unwrap_or("");
                format!("{}. **{title}**\n   {snippet}\n   URL: {url}\n", i + 1)
            })
            .collect();

        format!(
            "DuckDuckGo search results for '{query}':\n\n{}",
            entries.join("\n")
        )
    }
}

#[async_trait]
impl Tool for SearchTool {
    const NAME: &'static str = "duckduckgo_search";
    type Args = SearchArgs;
    type Output = String;
    type Error = ToolError;

    fn description(&self) -> String {
        "Search the web using DuckDuckGo and return a summary of results.".to_string()
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query string."
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let query = args.query;

        match self.provider.search(&query, self.max_results).await {
            Ok(records) => Ok(Self::format_results(&query, &records)),
            Err(err) => {
                warn!(error = %err, query = %query, "search provider failed");
                Ok(format!("Error searching DuckDuckGo for '{query}': {err}"))
            }
        }
    }
}
