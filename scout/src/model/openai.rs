//! OpenAI-compatible chat completions client for GitHub Models.

use super::{GenerateOptions, Model, ModelResponse, TokenUsage};
use crate::error::{ModelError, Result};
use crate::message::{ChatMessage, ChatMessageToolCall, MessageRole};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default GitHub Models inference base URL.
pub const GITHUB_MODELS_BASE_URL: &str = "https://models.github.ai/inference";

/// Default model identifier.
pub const DEFAULT_MODEL_ID: &str = "openai/gpt-4.1-nano";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the GitHub Models inference endpoint.
///
/// Speaks the OpenAI chat-completions protocol. The endpoint accepts a
/// GitHub token as the bearer credential.
///
/// # Example
///
/// ```rust,ignore
/// use scout::model::GithubModelsClient;
///
/// // With explicit token
/// let client = GithubModelsClient::new("ghp_...");
///
/// // With a custom base URL (any OpenAI-compatible host)
/// let client = GithubModelsClient::builder()
///     .api_key("ghp_...")
///     .base_url("https://my-proxy.example/v1")
///     .build();
/// ```
#[derive(Clone)]
pub struct GithubModelsClient {
    pub(crate) http_client: reqwest::Client,
    pub(crate) api_key: Arc<str>,
    pub(crate) base_url: Arc<str>,
}

impl std::fmt::Debug for GithubModelsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubModelsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GithubModelsClient {
    /// Create a new client with the given API key.
    ///
    /// Uses the default GitHub Models base URL.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> GithubModelsClientBuilder {
        GithubModelsClientBuilder::default()
    }

    /// Create a completion model with the specified model ID.
    #[must_use]
    pub fn completion_model(&self, model_id: impl Into<String>) -> CompletionModel {
        CompletionModel::new(self.clone(), model_id)
    }

    /// Get the base URL for API requests.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the authorization headers for API requests.
    pub(crate) fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .expect("Invalid API key format"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

/// Builder for [`GithubModelsClient`].
#[derive(Debug, Default)]
pub struct GithubModelsClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl GithubModelsClientBuilder {
    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom base URL.
    ///
    /// Useful for other OpenAI-compatible hosts or proxies.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the per-request timeout in seconds (default 30).
    #[must_use]
    pub const fn timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Panics
    ///
    /// Panics if the API key is not set.
    #[must_use]
    pub fn build(self) -> GithubModelsClient {
        let api_key = self.api_key.expect("API key is required");
        let base_url = self
            .base_url
            .unwrap_or_else(|| GITHUB_MODELS_BASE_URL.to_string());
        let timeout = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout))
            .build()
            .expect("Failed to build HTTP client");

        GithubModelsClient {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

/// Chat completion model bound to a [`GithubModelsClient`].
#[derive(Clone)]
pub struct CompletionModel {
    client: GithubModelsClient,
    model_id: String,
}

impl std::fmt::Debug for CompletionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionModel")
            .field("model_id", &self.model_id)
            .finish()
    }
}

impl CompletionModel {
    /// Create a new completion model.
    pub(crate) fn new(client: GithubModelsClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    /// Build the request body for the API.
    fn build_request_body(&self, messages: &[ChatMessage], options: &GenerateOptions) -> Value {
        let mut body = serde_json::json!({
            "model": self.model_id,
            "messages": Self::convert_messages(messages),
        });

        if let Some(temp) = options.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(max) = options.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }

        if let Some(tools) = &options.tools
            && !tools.is_empty()
        {
            body["tools"] = serde_json::json!(tools);
        }

        body
    }

    /// Convert [`ChatMessage`]s to the chat-completions wire format.
    fn convert_messages(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                let mut obj = serde_json::json!({ "role": msg.role.as_str() });

                if let Some(text) = msg.text_content() {
                    obj["content"] = serde_json::json!(text);
                }

                if let Some(tool_calls) = &msg.tool_calls {
                    let tc_json: Vec<Value> = tool_calls
                        .iter()
                        .map(|tc| {
                            serde_json::json!({
                                "id": tc.id,
                                "type": "function",
                                "function": {
                                    "name": tc.function.name,
                                    "arguments": tc.arguments_string()
                                }
                            })
                        })
                        .collect();
                    obj["tool_calls"] = serde_json::json!(tc_json);
                }

                if let Some(tool_call_id) = &msg.tool_call_id {
                    obj["tool_call_id"] = serde_json::json!(tool_call_id);
                }

                obj
            })
            .collect()
    }

    /// Parse the API response into a [`ModelResponse`].
    fn parse_response(json: &Value) -> std::result::Result<ModelResponse, ModelError> {
        let choice = json["choices"]
            .get(0)
            .ok_or_else(|| ModelError::response_format("choices array", "empty response"))?;

        let message_json = &choice["message"];
        let content = message_json["content"].as_str().map(String::from);

        let tool_calls = message_json["tool_calls"].as_array().map(|tc_array| {
            tc_array
                .iter()
                .map(|tc| {
                    let id = tc["id"].as_str().unwrap_or_default().to_string();
                    let name = tc["function"]["name"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string();
                    // Arguments usually arrive as a JSON-encoded string.
                    let arguments = if let Some(args_str) = tc["function"]["arguments"].as_str() {
                        serde_json::from_str(args_str)
                            .unwrap_or_else(|_| Value::String(args_str.to_owned()))
                    } else {
                        tc["function"]["arguments"].clone()
                    };
                    ChatMessageToolCall::new(id, name, arguments)
                })
                .collect::<Vec<_>>()
        });

        let message = ChatMessage {
            role: MessageRole::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
        };

        let token_usage = json.get("usage").map(|usage| TokenUsage {
            input_tokens: saturating_u32(usage["prompt_tokens"].as_u64().unwrap_or(0)),
            output_tokens: saturating_u32(usage["completion_tokens"].as_u64().unwrap_or(0)),
        });

        Ok(ModelResponse {
            message,
            token_usage,
        })
    }
}

#[async_trait]
impl Model for CompletionModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    #[instrument(skip(self, messages, options), fields(model = %self.model_id))]
    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<ModelResponse> {
        let body = self.build_request_body(messages, options);

        debug!("Sending request to model host");

        let response = self
            .client
            .http_client
            .post(format!("{}/chat/completions", self.client.base_url))
            .headers(self.client.auth_headers())
            .json(&body)
            .send()
            .await
            .map_err(ModelError::from)?;

        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();
            let err = match code {
                401 | 403 => ModelError::auth(format!("HTTP {code}: {error_text}")),
                _ => ModelError::http_status(code, error_text),
            };
            return Err(err.into());
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ModelError::response_format("JSON body", e.to_string()))?;
        Ok(Self::parse_response(&json)?)
    }
}

fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod client {
        use super::*;

        #[test]
        fn builder_sets_base_url() {
            let client = GithubModelsClient::builder()
                .api_key("test-key")
                .base_url("https://custom.api.example/v1")
                .timeout_secs(5)
                .build();

            assert_eq!(client.base_url(), "https://custom.api.example/v1");
        }

        #[test]
        fn default_base_url() {
            let client = GithubModelsClient::new("test-key");
            assert_eq!(client.base_url(), GITHUB_MODELS_BASE_URL);
        }

        #[test]
        fn debug_redacts_api_key() {
            let client = GithubModelsClient::new("super-secret");
            let debug = format!("{client:?}");
            assert!(debug.contains("[REDACTED]"));
            assert!(!debug.contains("super-secret"));
        }

        #[test]
        fn auth_headers_carry_bearer() {
            let client = GithubModelsClient::new("tok");
            let headers = client.auth_headers();
            let auth = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
            assert_eq!(auth, "Bearer tok");
            assert_eq!(
                headers.get(CONTENT_TYPE).unwrap().to_str().unwrap(),
                "application/json"
            );
        }
    }

    mod completion {
        use super::*;
        use crate::tool::ToolDefinition;

        fn model() -> CompletionModel {
            GithubModelsClient::new("test-key").completion_model(DEFAULT_MODEL_ID)
        }

        #[test]
        fn model_id_is_set() {
            assert_eq!(model().model_id(), "openai/gpt-4.1-nano");
        }

        #[test]
        fn request_body_includes_options() {
            let messages = vec![ChatMessage::user("hi")];
            let options = GenerateOptions::new()
                .with_temperature(0.1)
                .with_max_tokens(128)
                .with_tools(vec![ToolDefinition::new(
                    "duckduckgo_search",
                    "Search the web",
                    serde_json::json!({"type": "object"}),
                )]);

            let body = model().build_request_body(&messages, &options);

            assert_eq!(body["model"], "openai/gpt-4.1-nano");
            assert_eq!(body["temperature"], 0.1);
            assert_eq!(body["max_tokens"], 128);
            assert_eq!(body["tools"][0]["type"], "function");
            assert_eq!(body["tools"][0]["function"]["name"], "duckduckgo_search");
        }

        #[test]
        fn request_body_omits_unset_options() {
            let messages = vec![ChatMessage::user("hi")];
            let body = model().build_request_body(&messages, &GenerateOptions::new());

            assert!(body.get("temperature").is_none());
            assert!(body.get("max_tokens").is_none());
            assert!(body.get("tools").is_none());
        }

        #[test]
        fn convert_messages_maps_roles() {
            let messages = vec![
                ChatMessage::system("instructions"),
                ChatMessage::user("question"),
                ChatMessage::assistant("answer"),
                ChatMessage::tool_response("call_1", "result"),
            ];

            let converted = CompletionModel::convert_messages(&messages);

            assert_eq!(converted[0]["role"], "system");
            assert_eq!(converted[1]["role"], "user");
            assert_eq!(converted[2]["role"], "assistant");
            assert_eq!(converted[3]["role"], "tool");
            assert_eq!(converted[3]["tool_call_id"], "call_1");
            assert_eq!(converted[3]["content"], "result");
        }

        #[test]
        fn convert_messages_serializes_tool_call_arguments_as_string() {
            let call = ChatMessageToolCall::new(
                "call_1",
                "duckduckgo_search",
                serde_json::json!({"query": "churches in Vilnius"}),
            );
            let messages = vec![ChatMessage::assistant_with_tool_calls(vec![call])];

            let converted = CompletionModel::convert_messages(&messages);
            let args = &converted[0]["tool_calls"][0]["function"]["arguments"];

            assert!(args.is_string());
            assert!(args.as_str().unwrap().contains("churches in Vilnius"));
        }

        #[test]
        fn parse_response_extracts_content_and_usage() {
            let json = serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "Vilnius has many churches."
                    }
                }],
                "usage": {
                    "prompt_tokens": 12,
                    "completion_tokens": 7
                }
            });

            let response = CompletionModel::parse_response(&json).unwrap();
            assert_eq!(response.text(), Some("Vilnius has many churches."));
            assert_eq!(response.token_usage, Some(TokenUsage::new(12, 7)));
        }

        #[test]
        fn parse_response_extracts_tool_calls() {
            let json = serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_abc",
                            "type": "function",
                            "function": {
                                "name": "duckduckgo_search",
                                "arguments": "{\"query\": \"test\"}"
                            }
                        }]
                    }
                }]
            });

            let response = CompletionModel::parse_response(&json).unwrap();
            let calls = response.tool_calls().unwrap();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].name(), "duckduckgo_search");
            assert_eq!(calls[0].arguments()["query"], "test");
        }

        #[test]
        fn parse_response_rejects_missing_choices() {
            let json = serde_json::json!({"choices": []});
            let err = CompletionModel::parse_response(&json).unwrap_err();
            assert_eq!(err.kind, crate::error::ModelErrorKind::ResponseFormat);
        }
    }
}
