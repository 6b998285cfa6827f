//! Agent module, the query dispatch loop and its configuration.
//!
//! An [`Agent`] owns a model handle and a tool set and drives a two-state
//! reasoning loop: a model response carrying tool calls executes them and
//! loops, a response without tool calls is the final answer. The model alone
//! decides whether to search; the agent only supplies the tool interface and
//! the instruction text.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use scout::agent::Agent;
//! use scout::model::GithubModelsClient;
//! use scout::tools::SearchTool;
//!
//! let client = GithubModelsClient::builder().api_key(token).build();
//! let agent = Agent::builder()
//!     .model(client.completion_model("openai/gpt-4.1-nano"))
//!     .tool(SearchTool::new())
//!     .try_build()?;
//!
//! let result = agent.run("How many churches in Vilnius?").await?;
//! println!("{}", result.output);
//! ```

mod builder;
pub mod instructions;
mod result;
mod runner;

pub use builder::AgentBuilder;
pub use result::{RunResult, ToolInvocation};
pub use runner::Agent;
