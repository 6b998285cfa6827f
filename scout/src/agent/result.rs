//! Agent run result types.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::TokenUsage;

/// Record of a single tool invocation made during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Name of the tool.
    pub name: String,
    /// Arguments passed to the tool.
    pub arguments: Value,
    /// Text returned to the model, including converted failures.
    pub result: String,
}

/// Result of a completed agent run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The final answer text.
    pub output: String,
    /// Number of model turns taken.
    pub steps: usize,
    /// Total token usage during the run.
    pub usage: TokenUsage,
    /// Tool invocations in execution order.
    pub tool_invocations: Vec<ToolInvocation>,
}

impl RunResult {
    /// Whether any tool was invoked during the run.
    #[must_use]
    pub fn used_tools(&self) -> bool {
        !self.tool_invocations.is_empty()
    }

    /// Generate a short summary of the run.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = String::with_capacity(128);
        let _ = writeln!(summary, "Steps: {}", self.steps);
        let _ = writeln!(
            summary,
            "Tokens: {} (in: {}, out: {})",
            self.usage.total(),
            self.usage.input_tokens,
            self.usage.output_tokens
        );
        let names: Vec<&str> = self
            .tool_invocations
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        let _ = writeln!(summary, "Tools: {names:?}");
        summary
    }
}
