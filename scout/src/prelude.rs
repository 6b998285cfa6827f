//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits for easy access.
//!
//! # Usage
//!
//! ```rust,ignore
//! use scout::prelude::*;
//! ```

pub use crate::agent::{Agent, AgentBuilder, RunResult, ToolInvocation, instructions};
pub use crate::error::{Error, ModelError, Result, ToolError};
pub use crate::message::{ChatMessage, ChatMessageToolCall, MessageRole};
pub use crate::model::{
    CompletionModel, GenerateOptions, GithubModelsClient, MockModel, Model, ModelResponse,
    SharedModel, TokenUsage,
};
pub use crate::session::{EntryRole, Transcript, TranscriptEntry};
pub use crate::tool::{BoxedTool, DynTool, Tool, ToolDefinition, ToolResult, ToolSet};
pub use crate::tools::{
    DuckDuckGo, SearchError, SearchProbeTool, SearchProvider, SearchRecord, SearchTool,
};
