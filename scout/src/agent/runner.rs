//! Agent run loop.
//!
//! The [`Agent`] drives a two-state reasoning loop:
//!
//! 1. Build messages from instructions, prior transcript, and the query
//! 2. Call the model with the registered tool definitions
//! 3. A response carrying tool calls executes each call in order, appends
//!    the assistant message plus one tool message per call, and loops
//! 4. A response without tool calls is the final answer
//!
//! The loop terminates when the model produces a final text output, an
//! error occurs, the step limit is reached, or the run deadline expires.
//! Tool failures never terminate the loop; they are converted to text and
//! handed back to the model as the tool message content.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::error::{Error, Result};
use crate::message::{ChatMessage, ChatMessageToolCall};
use crate::model::{GenerateOptions, SharedModel, TokenUsage};
use crate::session::Transcript;
use crate::tool::ToolSet;

use super::builder::AgentBuilder;
use super::result::{RunResult, ToolInvocation};

// ---------------------------------------------------------------------------
// StepOutcome
// ---------------------------------------------------------------------------

/// The outcome of a single reasoning step after the model response has been
/// classified and tool calls (if any) have been executed.
enum StepOutcome {
    /// The model produced a final answer, the run is complete.
    Done(RunResult),
    /// Tool calls were executed; continue to the next step.
    Continue,
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// A query agent that answers with optional web-search assistance.
///
/// The agent owns its model handle and tool set, so it is `Send + Sync` and
/// can serve concurrent runs without shared mutable state. Construct one via
/// [`Agent::builder`].
pub struct Agent {
    pub(crate) model: SharedModel,
    pub(crate) tools: ToolSet,
    pub(crate) instructions: String,
    pub(crate) name: String,
    pub(crate) max_steps: usize,
    pub(crate) timeout_secs: u64,
    pub(crate) temperature: Option<f32>,
    pub(crate) max_tokens: Option<u32>,
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model.model_id())
            .field("tools", &self.tools.names())
            .field("max_steps", &self.max_steps)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Default maximum number of model turns per run.
    pub const DEFAULT_MAX_STEPS: usize = 4;

    /// Default total run deadline in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Default agent name used in logging.
    pub const DEFAULT_NAME: &'static str = "SearchAgent";

    /// Create a builder for configuring an agent.
    #[must_use]
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// The agent's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the underlying model.
    #[must_use]
    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Run a single query to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MaxSteps`] if the model keeps requesting tools past
    /// the step limit, [`Error::Timeout`] if the run deadline expires, or a
    /// model error from the host.
    pub async fn run(&self, query: impl Into<String>) -> Result<RunResult> {
        self.run_with_history(query, &Transcript::new()).await
    }

    /// Run a query with prior conversation turns replayed ahead of it.
    ///
    /// The transcript entries are mapped to user/assistant messages between
    /// the system instructions and the new query, so the model can resolve
    /// references to earlier turns.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Agent::run`].
    pub async fn run_with_history(
        &self,
        query: impl Into<String>,
        history: &Transcript,
    ) -> Result<RunResult> {
        let query = query.into();
        let span = info_span!(
            "agent",
            agent.name = %self.name,
            agent.model = %self.model.model_id(),
            agent.max_steps = self.max_steps,
            agent.tools = tracing::field::Empty,
            agent.result_steps = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        let deadline = Duration::from_secs(self.timeout_secs);
        match tokio::time::timeout(deadline, self.run_inner(&query, history).instrument(span))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                let err = Error::timeout(self.timeout_secs);
                error!(error = %err, agent = %self.name, "Run deadline exceeded");
                Err(err)
            }
        }
    }

    /// Inner loop shared by both entry points.
    async fn run_inner(&self, query: &str, history: &Transcript) -> Result<RunResult> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if !self.instructions.is_empty() {
            messages.push(ChatMessage::system(&self.instructions));
        }
        messages.extend(history.to_messages());
        messages.push(ChatMessage::user(query));

        let definitions = self.tools.definitions();
        let tool_names: Vec<&str> = self.tools.names();
        tracing::Span::current().record("agent.tools", tracing::field::debug(&tool_names));

        let mut options = GenerateOptions::new();
        if !definitions.is_empty() {
            options = options.with_tools(definitions);
        }
        if let Some(temperature) = self.temperature {
            options = options.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }

        let mut usage = TokenUsage::default();
        let mut invocations: Vec<ToolInvocation> = Vec::new();

        for step in 1..=self.max_steps {
            debug!(agent = %self.name, step, "Starting step");

            let response = self.model.generate(&messages, &options).await.map_err(|e| {
                error!(error = %e, agent = %self.name, step, "Model call failed");
                tracing::Span::current().record("error", tracing::field::display(&e));
                e
            })?;

            if let Some(step_usage) = response.token_usage {
                usage += step_usage;
            }

            match self
                .process_step(step, response.message, &mut messages, &mut invocations, usage)
                .await
            {
                StepOutcome::Done(result) => return Ok(result),
                StepOutcome::Continue => {}
            }
        }

        let err = Error::max_steps(self.max_steps);
        error!(error = %err, agent = %self.name, max_steps = self.max_steps, "Max steps exceeded");
        tracing::Span::current().record("error", tracing::field::display(&err));
        Err(err)
    }

    /// Classify one model response and execute its tool calls, if any.
    ///
    /// A message without tool calls is the final answer; its text (empty
    /// when the model returned none) becomes [`RunResult::output`].
    async fn process_step(
        &self,
        step: usize,
        message: ChatMessage,
        messages: &mut Vec<ChatMessage>,
        invocations: &mut Vec<ToolInvocation>,
        usage: TokenUsage,
    ) -> StepOutcome {
        if message.has_tool_calls() {
            let calls = message.tool_calls.clone().unwrap_or_default();
            messages.push(message);

            // Sequential execution; tool messages appended in call order.
            for call in &calls {
                let result_text = self.dispatch_tool(call).await;
                invocations.push(ToolInvocation {
                    name: call.name().to_string(),
                    arguments: call.arguments().clone(),
                    result: result_text.clone(),
                });
                messages.push(ChatMessage::tool_response(&call.id, result_text));
            }

            return StepOutcome::Continue;
        }

        let output = message.text_content().unwrap_or_default().to_string();

        tracing::Span::current().record("agent.result_steps", step);
        info!(
            agent = %self.name,
            steps = step,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Agent run completed",
        );

        StepOutcome::Done(RunResult {
            output,
            steps: step,
            usage,
            tool_invocations: std::mem::take(invocations),
        })
    }

    /// Dispatch a single tool call and render its outcome as text.
    ///
    /// Unknown tools and tool failures become descriptive text for the
    /// model rather than faults.
    async fn dispatch_tool(&self, call: &ChatMessageToolCall) -> String {
        let tool_span = info_span!(
            "tool",
            tool.name = %call.name(),
            tool.id = %call.id,
            tool.output = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        async {
            let name = call.name();
            let Some(tool) = self.tools.get(name) else {
                warn!(tool = %name, "Tool not found");
                let text = format!("Tool '{name}' not found");
                tracing::Span::current().record("error", text.as_str());
                return text;
            };

            let text = match tool.call_json(call.arguments().clone()).await {
                // String outputs go back as plain text, everything else as JSON.
                Ok(Value::String(text)) => text,
                Ok(value) => serde_json::to_string(&value).unwrap_or_else(|_| value.to_string()),
                Err(e) => {
                    warn!(tool = %name, error = %e, "Tool execution failed");
                    let text = format!("Tool error: {e}");
                    tracing::Span::current().record("error", text.as_str());
                    text
                }
            };
            tracing::Span::current().record("tool.output", text.as_str());
            text
        }
        .instrument(tool_span)
        .await
    }
}
