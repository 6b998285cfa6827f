//! Scout - a web-search-augmented query agent
//!
//! This crate provides a small agent that answers queries against a hosted
//! chat-completion model and can consult DuckDuckGo web search along the way.
//! The model alone decides when to search; tool failures are fed back to it
//! as text instead of aborting the run.

pub mod agent;
pub mod error;
pub mod message;
pub mod model;
pub mod prelude;
pub mod session;
pub mod tool;
pub mod tools;

pub use error::{Error, ModelError, Result, ToolError};
