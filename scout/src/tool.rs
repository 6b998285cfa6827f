//! Tool trait and utilities for defining agent tools.
//!
//! Tools are the way the agent interacts with the world. Each tool
//! represents a capability the model host can invoke mid-turn.
//!
//! # OpenAI API Alignment
//!
//! This module aligns with OpenAI's Function Calling API:
//! - `ToolDefinition` serializes to `{"type": "function", "function": {...}}` format
//! - Tool-call arguments arrive either as a JSON object or as a
//!   JSON-encoded string; both are accepted

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::ToolError;

/// A type alias for `Result<T, ToolError>`.
pub type ToolResult<T> = Result<T, ToolError>;

/// Definition of a tool for model function calling.
///
/// Serializes to OpenAI's function calling format:
/// ```json
/// {
///     "type": "function",
///     "function": {
///         "name": "tool_name",
///         "description": "Tool description",
///         "parameters": { ... }
///     }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct ToolDefinition {
    /// Name of the tool (e.g., "duckduckgo_search").
    /// Should be descriptive and use snake_case.
    pub name: String,

    /// Description of what the tool does.
    /// This helps the model decide when to use the tool.
    pub description: String,

    /// JSON schema for the tool's parameters.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a new tool definition.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Returns the tool name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Custom serialization to OpenAI function calling format.
impl Serialize for ToolDefinition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut function = serde_json::Map::new();
        function.insert("name".to_owned(), Value::String(self.name.clone()));
        function.insert(
            "description".to_owned(),
            Value::String(self.description.clone()),
        );
        function.insert("parameters".to_owned(), self.parameters.clone());

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "function")?;
        map.serialize_entry("function", &function)?;
        map.end()
    }
}

/// The core trait for all tools the agent can use.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Static name of the tool.
    const NAME: &'static str;

    /// Arguments type for the tool.
    type Args: for<'de> Deserialize<'de> + Send;

    /// Output type of the tool.
    type Output: Serialize + Send;

    /// Error type for tool execution.
    type Error: Into<ToolError> + Send;

    /// Get the name of the tool.
    fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Get the description of the tool.
    fn description(&self) -> String;

    /// Get the JSON schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error>;

    /// Get the tool definition for model function calling.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_owned(),
            description: self.description(),
            parameters: self.parameters_schema(),
        }
    }

    /// Call the tool with JSON arguments and return JSON output.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be deserialized or the
    /// tool execution fails.
    async fn call_json(&self, args: Value) -> Result<Value, ToolError>
    where
        Self::Output: 'static,
    {
        // Hosts deliver arguments either as a JSON string or as an object.
        let typed_args: Self::Args = match &args {
            Value::String(s) => {
                serde_json::from_str(s).map_err(|e| ToolError::InvalidArguments(e.to_string()))?
            }
            _ => serde_json::from_value(args)
                .map_err(|e| ToolError::InvalidArguments(e.to_string()))?,
        };

        let result = self.call(typed_args).await.map_err(Into::into)?;
        serde_json::to_value(result).map_err(|e| ToolError::Execution(e.to_string()))
    }
}

/// A boxed dynamic tool that can be used in collections.
pub type BoxedTool = Box<dyn DynTool>;

/// Object-safe version of the Tool trait for dynamic dispatch.
#[async_trait]
pub trait DynTool: Send + Sync {
    /// Get the name of the tool.
    fn name(&self) -> &str;

    /// Get the description of the tool.
    fn description(&self) -> String;

    /// Get the tool definition.
    fn definition(&self) -> ToolDefinition;

    /// Call the tool with JSON arguments.
    async fn call_json(&self, args: Value) -> Result<Value, ToolError>;
}

#[async_trait]
impl<T: Tool + 'static> DynTool for T
where
    T::Output: 'static,
{
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn description(&self) -> String {
        Tool::description(self)
    }

    fn definition(&self) -> ToolDefinition {
        Tool::definition(self)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        Tool::call_json(self, args).await
    }
}

/// A collection of tools available to an agent.
///
/// Tools are kept in insertion order so that the definitions sent to the
/// model host are deterministic.
#[derive(Default)]
pub struct ToolSet {
    tools: Vec<BoxedTool>,
}

impl ToolSet {
    /// Create a new empty tool set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool to the set, replacing any tool with the same name.
    pub fn add<T: Tool + 'static>(&mut self, tool: T)
    where
        T::Output: 'static,
    {
        self.add_boxed(Box::new(tool));
    }

    /// Add a boxed tool to the set, replacing any tool with the same name.
    pub fn add_boxed(&mut self, tool: BoxedTool) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    /// Get a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoxedTool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Get all tool definitions, in insertion order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Get the names of all tools, in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Check if the set contains a tool with the given name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// Get the number of tools in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Call a tool by name with JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] if no tool has the given name, or
    /// the tool's own error if execution fails.
    pub async fn call(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_owned()))?;
        tool.call_json(args).await
    }
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod tool_definition {
        use super::*;

        fn sample_parameters() -> Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string"}
                },
                "required": ["query"]
            })
        }

        #[test]
        fn new_creates_definition() {
            let def = ToolDefinition::new("duckduckgo_search", "Search the web", sample_parameters());
            assert_eq!(def.name, "duckduckgo_search");
            assert_eq!(def.description, "Search the web");
        }

        #[test]
        fn name_returns_name() {
            let def = ToolDefinition::new("my_tool", "Desc", sample_parameters());
            assert_eq!(def.name(), "my_tool");
        }

        #[test]
        fn description_returns_description() {
            let def = ToolDefinition::new("tool", "My description", sample_parameters());
            assert_eq!(def.description(), "My description");
        }

        #[test]
        fn serialize_to_openai_format() {
            let def = ToolDefinition::new("duckduckgo_search", "Search the web", sample_parameters());
            let json = serde_json::to_value(&def).unwrap();

            assert_eq!(
                json.get("type"),
                Some(&Value::String("function".to_owned()))
            );
            let function = json.get("function").unwrap();
            assert_eq!(
                function.get("name"),
                Some(&Value::String("duckduckgo_search".to_owned()))
            );
            assert_eq!(
                function.get("description"),
                Some(&Value::String("Search the web".to_owned()))
            );
            assert!(function.get("parameters").is_some());
        }

        #[test]
        fn deserialize_from_simple_format() {
            let json = r#"{
                "name": "test_tool",
                "description": "A test tool",
                "parameters": {"type": "object"}
            }"#;
            let def: ToolDefinition = serde_json::from_str(json).unwrap();
            assert_eq!(def.name, "test_tool");
            assert_eq!(def.description, "A test tool");
        }

        #[test]
        fn clone_trait() {
            let def = ToolDefinition::new("test", "Test", sample_parameters());
            let cloned = def.clone();
            assert_eq!(cloned.name, def.name);
            assert_eq!(cloned.description, def.description);
        }
    }

    mod tool_set {
        use super::*;

        struct MockTool {
            name: &'static str,
        }

        #[async_trait]
        impl Tool for MockTool {
            const NAME: &'static str = "mock_tool";
            type Args = Value;
            type Output = Value;
            type Error = ToolError;

            fn name(&self) -> &'static str {
                self.name
            }

            fn description(&self) -> String {
                format!("Mock tool: {}", self.name)
            }

            fn parameters_schema(&self) -> Value {
                serde_json::json!({"type": "object"})
            }

            async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
                Ok(serde_json::json!({"received": args}))
            }
        }

        #[test]
        fn new_creates_empty_set() {
            let tools = ToolSet::new();
            assert!(tools.is_empty());
            assert_eq!(tools.len(), 0);
        }

        #[test]
        fn add_inserts_tool() {
            let mut tools = ToolSet::new();
            tools.add(MockTool { name: "test_tool" });
            assert!(!tools.is_empty());
            assert_eq!(tools.len(), 1);
            assert!(tools.contains("test_tool"));
        }

        #[test]
        fn add_replaces_same_name() {
            let mut tools = ToolSet::new();
            tools.add(MockTool { name: "dup" });
            tools.add(MockTool { name: "dup" });
            assert_eq!(tools.len(), 1);
        }

        #[test]
        fn get_returns_tool() {
            let mut tools = ToolSet::new();
            tools.add(MockTool { name: "my_tool" });
            let tool = tools.get("my_tool");
            assert!(tool.is_some());
            assert_eq!(tool.unwrap().name(), "my_tool");
        }

        #[test]
        fn get_returns_none_for_missing() {
            let tools = ToolSet::new();
            assert!(tools.get("nonexistent").is_none());
        }

        #[test]
        fn definitions_preserve_insertion_order() {
            let mut tools = ToolSet::new();
            tools.add(MockTool { name: "alpha" });
            tools.add(MockTool { name: "beta" });
            let defs = tools.definitions();
            assert_eq!(defs.len(), 2);
            assert_eq!(defs[0].name, "alpha");
            assert_eq!(defs[1].name, "beta");
        }

        #[test]
        fn names_returns_all_names() {
            let mut tools = ToolSet::new();
            tools.add(MockTool { name: "alpha" });
            tools.add(MockTool { name: "beta" });
            assert_eq!(tools.names(), vec!["alpha", "beta"]);
        }

        #[tokio::test]
        async fn call_executes_tool() {
            let mut tools = ToolSet::new();
            tools.add(MockTool { name: "echo" });

            let result = tools
                .call("echo", serde_json::json!({"input": "hello"}))
                .await;
            assert!(result.is_ok());
            let value = result.unwrap();
            assert!(value.get("received").is_some());
        }

        #[tokio::test]
        async fn call_returns_error_for_missing_tool() {
            let tools = ToolSet::new();
            let result = tools.call("nonexistent", serde_json::json!({})).await;
            assert!(result.is_err());
            assert!(matches!(result.unwrap_err(), ToolError::NotFound(_)));
        }

        #[test]
        fn debug_format() {
            let mut tools = ToolSet::new();
            tools.add(MockTool { name: "test" });
            let debug = format!("{tools:?}");
            assert!(debug.contains("ToolSet"));
            assert!(debug.contains("test"));
        }
    }

    mod integration {
        use super::*;

        struct EchoTool;

        #[derive(Deserialize)]
        struct EchoArgs {
            message: String,
        }

        #[async_trait]
        impl Tool for EchoTool {
            const NAME: &'static str = "echo";
            type Args = EchoArgs;
            type Output = String;
            type Error = ToolError;

            fn description(&self) -> String {
                "Echo the message back".to_owned()
            }

            fn parameters_schema(&self) -> Value {
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "message": {"type": "string"}
                    },
                    "required": ["message"]
                })
            }

            async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
                Ok(format!("Echo: {}", args.message))
            }
        }

        #[test]
        fn tool_definition_generation() {
            let tool = EchoTool;
            let def = Tool::definition(&tool);
            assert_eq!(def.name, "echo");
            assert_eq!(def.description, "Echo the message back");
            assert!(def.parameters.get("properties").is_some());
        }

        #[tokio::test]
        async fn call_json_with_object_args() {
            let tool = EchoTool;
            let args = serde_json::json!({"message": "hello"});
            let result = Tool::call_json(&tool, args).await.unwrap();
            assert_eq!(result, serde_json::json!("Echo: hello"));
        }

        #[tokio::test]
        async fn call_json_with_string_args() {
            let tool = EchoTool;
            let args = Value::String(r#"{"message": "hello"}"#.to_owned());
            let result = Tool::call_json(&tool, args).await.unwrap();
            assert_eq!(result, serde_json::json!("Echo: hello"));
        }

        #[tokio::test]
        async fn call_json_rejects_bad_args() {
            let tool = EchoTool;
            let args = serde_json::json!({"wrong_field": 1});
            let result = Tool::call_json(&tool, args).await;
            assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
        }

        #[test]
        fn openai_format_serialization() {
            let tool = EchoTool;
            let def = Tool::definition(&tool);
            let json = serde_json::to_value(&def).unwrap();

            assert_eq!(json["type"], "function");
            assert!(json["function"].is_object());
            assert_eq!(json["function"]["name"], "echo");
            assert!(json["function"]["parameters"].is_object());
        }

        #[tokio::test]
        async fn dyn_tool_dispatch() {
            let tool: BoxedTool = Box::new(EchoTool);
            assert_eq!(tool.name(), "echo");
            let result = tool
                .call_json(serde_json::json!({"message": "dyn"}))
                .await
                .unwrap();
            assert_eq!(result, serde_json::json!("Echo: dyn"));
        }
    }
}
