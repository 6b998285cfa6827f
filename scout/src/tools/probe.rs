//! Connectivity probe for the search endpoint.
//!
//! Issues the same request as the search tool but reports only the HTTP
//! status and response size, useful for diagnosing blocked or degraded
//! access without parsing results.

use crate::error::ToolError;
use crate::tool::Tool;
use crate::tools::search::{
    DEFAULT_SEARCH_TIMEOUT_SECS, DUCKDUCKGO_LITE_URL, SearchError, USER_AGENT,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Arguments for the probe tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeArgs {
    /// The search query string.
    pub query: String,
}

/// Endpoint probe exposed to the model as `search_probe`.
#[derive(Debug, Clone)]
pub struct SearchProbeTool {
    http_client: reqwest::Client,
    timeout_secs: u64,
}

impl Default for SearchProbeTool {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_TIMEOUT_SECS)
    }
}

impl SearchProbeTool {
    /// Create a new probe with the given request timeout in seconds.
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

    // Reports the status for any completed exchange, including non-2xx.
    async fn fetch(&self, query: &str) -> Result<String, SearchError> {
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

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(format!(
            "Probe for '{query}': HTTP {status}, {} bytes",
            body.len()
        ))
    }
}

#[async_trait]
impl Tool for SearchProbeTool {
    const NAME: &'static str = "search_probe";
    type Args = ProbeArgs;
    type Output = String;
    type Error = ToolError;

    fn description(&self) -> String {
        "Check whether the DuckDuckGo search endpoint is reachable and report the HTTP status and response size.".to_string()
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
        match self.fetch(&args.query).await {
            Ok(report) => Ok(report),
            Err(err) => {
                warn!(error = %err, query = %args.query, "search probe failed");
                Ok(format!(
                    "Error probing DuckDuckGo for '{}': {err}",
                    args.query
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_search_timeout() {
        let probe = SearchProbeTool::default();
        assert_eq!(probe.timeout_secs, DEFAULT_SEARCH_TIMEOUT_SECS);
    }

    #[test]
    fn wire_definition() {
        let probe = SearchProbeTool::default();
        let def = Tool::definition(&probe);

        assert_eq!(def.name, "search_probe");
        assert_eq!(def.parameters["required"][0], "query");
    }
}
