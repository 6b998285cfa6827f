//! Agent builder with a fluent API.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{Model, SharedModel};
use crate::tool::{BoxedTool, Tool, ToolSet};

use super::instructions;
use super::runner::Agent;

/// Builder for [`Agent`].
///
/// # Example
///
/// ```rust,ignore
/// let agent = Agent::builder()
///     .model(client.completion_model())
///     .tool(SearchTool::new())
///     .max_steps(4)
///     .try_build()?;
/// ```
#[derive(Default)]
pub struct AgentBuilder {
    model: Option<SharedModel>,
    tools: ToolSet,
    instructions: Option<String>,
    name: Option<String>,
    max_steps: Option<usize>,
    timeout_secs: Option<u64>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl fmt::Debug for AgentBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentBuilder")
            .field("has_model", &self.model.is_some())
            .field("tools", &self.tools.len())
            .finish_non_exhaustive()
    }
}

impl AgentBuilder {
    /// Create a new builder with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language model.
    #[must_use]
    pub fn model(mut self, model: impl Model + 'static) -> Self {
        self.model = Some(Arc::new(model));
        self
    }

    /// Set an already-shared language model.
    #[must_use]
    pub fn shared_model(mut self, model: SharedModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Add a tool to the agent.
    #[must_use]
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self
    where
        T::Output: 'static,
    {
        self.tools.add(tool);
        self
    }

    /// Add an already-boxed tool to the agent.
    #[must_use]
    pub fn boxed_tool(mut self, tool: BoxedTool) -> Self {
        self.tools.add_boxed(tool);
        self
    }

    /// Set the system instructions.
    ///
    /// Defaults to [`instructions::SEARCH_BIASED`].
    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Set the agent's name, used in logging.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the maximum number of model turns per run.
    #[must_use]
    pub const fn max_steps(mut self, max: usize) -> Self {
        self.max_steps = Some(max);
        self
    }

    /// Set the total run deadline in seconds.
    #[must_use]
    pub const fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the sampling temperature passed to the model.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens the model may generate per turn.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build the agent.
    ///
    /// # Panics
    ///
    /// Panics if no model is provided or `max_steps` is zero. Use
    /// [`try_build`](Self::try_build) for a fallible alternative.
    #[must_use]
    pub fn build(self) -> Agent {
        self.try_build().expect("Model is required")
    }

    /// Try to build the agent, returning an error if configuration is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Agent`] when no model has been set or `max_steps`
    /// is zero.
    pub fn try_build(self) -> Result<Agent> {
        let model = self.model.ok_or_else(|| Error::agent("Model is required"))?;
        if self.max_steps == Some(0) {
            return Err(Error::agent("max_steps must be at least 1"));
        }

        Ok(Agent {
            model,
            tools: self.tools,
            instructions: self
                .instructions
                .unwrap_or_else(|| instructions::SEARCH_BIASED.to_string()),
            name: self.name.unwrap_or_else(|| Agent::DEFAULT_NAME.to_string()),
            max_steps: self.max_steps.unwrap_or(Agent::DEFAULT_MAX_STEPS),
            timeout_secs: self.timeout_secs.unwrap_or(Agent::DEFAULT_TIMEOUT_SECS),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
    }
}
