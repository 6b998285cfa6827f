//! Built-in instruction presets.
//!
//! The preset only sets the register; the model alone decides whether and
//! how often to invoke the search tool on a given query.

/// Bare preset. Names the capability and nothing else, which in practice
/// makes the model skip the tool for anything it half-remembers.
pub const MINIMAL: &str = "You are a helpful assistant that can search the web using DuckDuckGo.";

/// Default preset. Conditions tool use on uncertainty and recency so the
/// model reaches for the web instead of guessing.
pub const SEARCH_BIASED: &str = "You are a helpful assistant that can search the web using DuckDuckGo. \
Use the duckduckgo_search tool whenever the question involves current events, counts, prices, \
or specific facts you are not certain about. Prefer searching over guessing. \
Base your answer on the search results and mention the source when one is available.";
