//! Integration tests for the scout agent loop.

#![allow(clippy::unwrap_used, clippy::panic, clippy::clone_on_ref_ptr)]

use async_trait::async_trait;
use scout::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Search provider with canned records, counting calls.
struct StaticProvider {
    records: Vec<SearchRecord>,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticProvider {
    fn with_records(records: Vec<SearchRecord>) -> Self {
        Self {
            records,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SearchProvider for StaticProvider {
    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> std::result::Result<Vec<SearchRecord>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::Status { code: 500 });
        }
        Ok(self.records.iter().take(max_results).cloned().collect())
    }
}

fn churches_records() -> Vec<SearchRecord> {
    vec![
        SearchRecord {
            title: Some("Churches of Vilnius".to_string()),
            snippet: Some("Vilnius has about 65 churches.".to_string()),
            url: Some("https://en.wikipedia.org/wiki/Vilnius".to_string()),
        },
        SearchRecord {
            title: Some("Vilnius Old Town".to_string()),
            snippet: Some("The old town is known for its baroque churches.".to_string()),
            url: Some("https://example.org/old-town".to_string()),
        },
    ]
}

/// Assistant message requesting one `duckduckgo_search` call with the
/// arguments JSON-encoded as a string, the shape the wire delivers.
fn search_call_message(query: &str) -> ChatMessage {
    let arguments = Value::String(format!(r#"{{"query":"{query}"}}"#));
    ChatMessage::assistant_with_tool_calls(vec![ChatMessageToolCall::new(
        "call_search_1",
        "duckduckgo_search",
        arguments,
    )])
}

#[tokio::test]
async fn test_search_flow_end_to_end() {
    let provider = Arc::new(StaticProvider::with_records(churches_records()));
    let agent = Agent::builder()
        .model(MockModel::new(vec![
            search_call_message("churches in Vilnius"),
            ChatMessage::assistant("Vilnius has about 65 churches."),
        ]))
        .tool(SearchTool::with_provider(provider.clone()))
        .instructions(instructions::SEARCH_BIASED)
        .try_build()
        .unwrap();

    let result = agent
        .run("How many churches in Vilnius? Please search DuckDuckGo.")
        .await
        .unwrap();

    assert_eq!(result.output, "Vilnius has about 65 churches.");
    assert_eq!(result.steps, 2);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    assert_eq!(result.tool_invocations.len(), 1);
    let invocation = &result.tool_invocations[0];
    assert_eq!(invocation.name, "duckduckgo_search");
    assert!(
        invocation
            .result
            .starts_with("DuckDuckGo search results for 'churches in Vilnius':")
    );
    assert!(invocation.result.contains("1. **Churches of Vilnius**"));
    assert!(invocation.result.contains("2. **Vilnius Old Town**"));
}

#[tokio::test]
async fn test_direct_answer_skips_search() {
    let provider = Arc::new(StaticProvider::with_records(churches_records()));
    let agent = Agent::builder()
        .model(MockModel::new(vec![ChatMessage::assistant("2 + 2 = 4")]))
        .tool(SearchTool::with_provider(provider.clone()))
        .try_build()
        .unwrap();

    let result = agent.run("What is 2 + 2?").await.unwrap();

    assert_eq!(result.output, "2 + 2 = 4");
    assert!(!result.used_tools());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_failure_feeds_back_as_text() {
    let provider = Arc::new(StaticProvider::failing());
    let agent = Agent::builder()
        .model(MockModel::new(vec![
            search_call_message("weather"),
            ChatMessage::assistant("I could not reach the search service."),
        ]))
        .tool(SearchTool::with_provider(provider.clone()))
        .try_build()
        .unwrap();

    let result = agent.run("What is the weather?").await.unwrap();

    // The failure stays inside the tool message; the run still completes.
    assert_eq!(result.output, "I could not reach the search service.");
    let text = &result.tool_invocations[0].result;
    assert!(text.starts_with("Error searching DuckDuckGo for 'weather':"));
    assert!(text.contains("HTTP status 500"));
}

#[tokio::test]
async fn test_max_steps_reported_in_error() {
    let agent = Agent::builder()
        .model(MockModel::new(vec![search_call_message("again")]))
        .tool(SearchTool::with_provider(Arc::new(
            StaticProvider::with_records(Vec::new()),
        )))
        .max_steps(2)
        .try_build()
        .unwrap();

    let err = agent.run("loop").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Maximum steps (2) reached without final answer"
    );
}

#[tokio::test]
async fn test_multi_turn_chat_session() {
    let agent = Agent::builder()
        .model(MockModel::new(vec![
            ChatMessage::assistant("Vilnius is the capital of Lithuania."),
            ChatMessage::assistant("It has about 65 churches."),
        ]))
        .try_build()
        .unwrap();

    let mut transcript = Transcript::new();

    let first = agent
        .run_with_history("What is the capital of Lithuania?", &transcript)
        .await
        .unwrap();
    transcript.push_user("What is the capital of Lithuania?");
    transcript.push_assistant(&first.output);

    let second = agent
        .run_with_history("How many churches does it have?", &transcript)
        .await
        .unwrap();
    transcript.push_user("How many churches does it have?");
    transcript.push_assistant(&second.output);

    assert_eq!(first.output, "Vilnius is the capital of Lithuania.");
    assert_eq!(second.output, "It has about 65 churches.");
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript.entries()[0].role, EntryRole::User);
    assert_eq!(transcript.entries()[3].role, EntryRole::Assistant);
}

#[tokio::test]
async fn test_string_tool_arguments_parse() {
    // Arguments arriving as a JSON-encoded string must reach the tool intact.
    let tool = SearchTool::with_provider(Arc::new(StaticProvider::with_records(Vec::new())));
    let args = Value::String(r#"{"query":"vilnius"}"#.to_string());

    let result = Tool::call_json(&tool, args).await.unwrap();
    assert_eq!(
        result,
        Value::String("No search results found for 'vilnius'.".to_string())
    );
}
