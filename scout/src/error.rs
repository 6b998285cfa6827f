//! Unified error types for the scout library.
//!
//! This module provides the error hierarchy covering:
//! - Model host errors (authentication, network, protocol)
//! - Tool execution errors
//! - Agent runtime errors (step and deadline bounds)

use std::fmt;

/// Result type alias for scout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the scout library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Model host error.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Tool execution error.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Agent runtime error.
    #[error("Agent error: {0}")]
    Agent(String),

    /// Maximum steps reached during agent execution.
    #[error("Maximum steps ({max_steps}) reached without final answer")]
    MaxSteps {
        /// The maximum number of steps configured.
        max_steps: usize,
    },

    /// Run deadline exceeded during agent execution.
    #[error("Run timed out after {seconds}s")]
    Timeout {
        /// The configured deadline in seconds.
        seconds: u64,
    },
}

impl Error {
    /// Create an agent error with a message.
    #[must_use]
    pub fn agent(msg: impl Into<String>) -> Self {
        Self::Agent(msg.into())
    }

    /// Create a max steps error.
    #[must_use]
    pub const fn max_steps(max_steps: usize) -> Self {
        Self::MaxSteps { max_steps }
    }

    /// Create a run deadline error.
    #[must_use]
    pub const fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }
}

/// Error type for model host operations.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ModelError {
    /// The error kind.
    pub kind: ModelErrorKind,
    /// Additional error message.
    pub message: String,
    /// Optional HTTP status code from the host.
    pub status: Option<u16>,
}

/// Categories of model host errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelErrorKind {
    /// Authentication or authorization failure.
    Auth,
    /// Network or connection error.
    Network,
    /// Request timed out.
    Timeout,
    /// Non-success HTTP status.
    HttpStatus,
    /// Response format error.
    ResponseFormat,
    /// Host-specific error.
    Provider,
}

impl ModelError {
    /// Create an authentication error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            kind: ModelErrorKind::Auth,
            message: message.into(),
            status: None,
        }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ModelErrorKind::Network,
            message: message.into(),
            status: None,
        }
    }

    /// Create a request timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: ModelErrorKind::Timeout,
            message: message.into(),
            status: None,
        }
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            kind: ModelErrorKind::HttpStatus,
            message: format!("HTTP {status}: {}", body.into()),
            status: Some(status),
        }
    }

    /// Create a response format error.
    #[must_use]
    pub fn response_format(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self {
            kind: ModelErrorKind::ResponseFormat,
            message: format!("Expected {}, got {}", expected.into(), got.into()),
            status: None,
        }
    }

    /// Create a host-specific error.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self {
            kind: ModelErrorKind::Provider,
            message: message.into(),
            status: None,
        }
    }

    /// Check if this is an authentication failure.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self.kind, ModelErrorKind::Auth)
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status: {status})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ModelError {}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Error type for tool execution failures.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    /// Error during tool execution.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Invalid arguments provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Tool not found.
    #[error("Tool not found: {0}")]
    NotFound(String),
}

impl ToolError {
    /// Create an execution error.
    #[must_use]
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create an invalid arguments error.
    #[must_use]
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}
