//! Built-in tools for web-search-augmented agents.
//!
//! [`SearchTool`] queries DuckDuckGo and summarizes results for the model.
//! [`SearchProbeTool`] reports endpoint reachability without parsing results.

pub mod probe;
pub mod search;

pub use probe::SearchProbeTool;
pub use search::{DuckDuckGo, SearchError, SearchProvider, SearchRecord, SearchTool};
