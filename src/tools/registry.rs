//! Tool registry for managing MCP tool handlers.
//!
//! Provides a `ToolHandler` trait for implementing tools and a `ToolRegistry`
//! that validates arguments and routes invocations to them.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use rmcp::model::{CallToolResult, JsonObject, Tool as McpTool};
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use super::error::{DispatchError, ToolError};
use super::schema::ArgsValidator;

/// Boxed future returned by [`ToolHandler::execute`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = Result<CallToolResult, ToolError>> + Send + 'a>>;

/// Context passed to tool handlers during execution.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Correlates log lines for one invocation.
    pub invocation_id: Uuid,
}

impl ToolContext {
    pub fn new() -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
        }
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for handling MCP tool invocations.
///
/// `input_schema` is normally `schema_for::<Args>()` for the same record the
/// handler decodes with [`parse_args`], so the advertised contract and the
/// decoded type cannot disagree. `execute` only ever receives arguments that
/// passed the schema.
pub trait ToolHandler: Send + Sync {
    /// Returns the tool's name (e.g., "github_issues").
    fn name(&self) -> &str;

    /// Returns the tool's human-readable title.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Returns the tool's description.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's arguments.
    fn input_schema(&self) -> JsonObject;

    /// Executes the tool with validated arguments.
    fn execute(&self, args: JsonObject, ctx: &ToolContext) -> ToolFuture<'_>;

    /// Converts this handler to an `McpTool` for use in `list_tools`.
    fn to_mcp_tool(&self) -> McpTool {
        use std::borrow::Cow;

        McpTool {
            name: Cow::Owned(self.name().to_string()),
            title: self.title().map(|s| s.to_string()),
            description: Some(Cow::Owned(self.description().to_string())),
            input_schema: Arc::new(self.input_schema()),
            output_schema: None,
            annotations: None,
            icons: None,
            meta: None,
        }
    }
}

/// Decode validated arguments into a handler's typed record.
///
/// Serde defaults fill omitted optional fields and unknown fields are ignored.
pub fn parse_args<T: DeserializeOwned>(args: JsonObject) -> Result<T, ToolError> {
    serde_json::from_value(serde_json::Value::Object(args))
        .map_err(|e| ToolError::Internal(format!("argument decoding failed: {}", e)))
}

/// Why a handler could not be registered.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterError {
    /// A handler with this name is already registered.
    Duplicate(String),
    /// The handler's input schema does not compile.
    InvalidSchema { tool: String, message: String },
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(name) => write!(f, "tool `{}` is already registered", name),
            Self::InvalidSchema { tool, message } => {
                write!(f, "tool `{}` has an invalid input schema: {}", tool, message)
            }
        }
    }
}

impl std::error::Error for RegisterError {}

#[derive(Clone)]
struct RegisteredTool {
    handler: Arc<dyn ToolHandler>,
    validator: Arc<ArgsValidator>,
}

/// Registry for managing tool handlers.
///
/// Built once at startup and shared read-only (usually behind an `Arc`).
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool handler.
    ///
    /// # Panics
    ///
    /// Panics if the name is taken or the input schema does not compile.
    pub fn register(self, handler: Arc<dyn ToolHandler>) -> Self {
        match self.try_register(handler) {
            Ok(registry) => registry,
            Err(e) => panic!("{}", e),
        }
    }

    /// Register a tool handler, compiling its input schema.
    pub fn try_register(mut self, handler: Arc<dyn ToolHandler>) -> Result<Self, RegisterError> {
        let name = handler.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegisterError::Duplicate(name));
        }

        let validator = ArgsValidator::compile(&handler.input_schema()).map_err(|message| {
            RegisterError::InvalidSchema {
                tool: name.clone(),
                message,
            }
        })?;

        self.tools.insert(
            name,
            RegisteredTool {
                handler,
                validator: Arc::new(validator),
            },
        );
        Ok(self)
    }

    /// Register a tool handler from a type that implements `ToolHandler`.
    ///
    /// # Panics
    ///
    /// Panics if the name is taken or the input schema does not compile.
    pub fn register_handler<T: ToolHandler + 'static>(self, handler: T) -> Self {
        self.register(Arc::new(handler))
    }

    /// Like [`register_handler`](Self::register_handler), but returns an
    /// error instead of panicking.
    pub fn try_register_handler<T: ToolHandler + 'static>(
        self,
        handler: T,
    ) -> Result<Self, RegisterError> {
        self.try_register(Arc::new(handler))
    }

    /// Get a tool handler by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).map(|tool| tool.handler.clone())
    }

    /// List all registered tool names, sorted.
    pub fn list_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Get all registered tools as `McpTool` instances for `list_tools`.
    pub fn list_tools(&self) -> Vec<McpTool> {
        self.tools
            .values()
            .map(|tool| tool.handler.to_mcp_tool())
            .collect()
    }

    /// Validate `args` against the named tool's input schema and run it.
    ///
    /// Unknown tools and invalid arguments are returned as `DispatchError`
    /// without running any handler code. Handler failures are folded into a
    /// `CallToolResult` with `is_error` set.
    pub async fn dispatch(
        &self,
        name: &str,
        args: JsonObject,
        ctx: &ToolContext,
    ) -> Result<CallToolResult, DispatchError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| DispatchError::NotFound(name.to_string()))?;

        let span = info_span!("tool_call", tool = %name, invocation_id = %ctx.invocation_id);

        async move {
            let resolved = tool.validator.validate(&args).map_err(|e| {
                warn!(error = %e, "rejected tool arguments");
                DispatchError::Validation(e)
            })?;

            let started = Instant::now();
            let result = match tool.handler.execute(resolved, ctx).await {
                Ok(result) => {
                    debug_assert!(!result.content.is_empty(), "tool returned no content");
                    result
                }
                Err(e) => {
                    warn!(error = %e, "tool call failed");
                    e.into_call_tool_result()
                }
            };
            debug!(elapsed_ms = started.elapsed().as_millis() as u64, "tool call finished");

            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Check if a tool with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Return the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Return `true` if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema::schema_for;
    use rmcp::model::Content;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;

    fn one() -> usize {
        1
    }

    #[derive(Deserialize, JsonSchema)]
    struct EchoArgs {
        /// Text to echo.
        message: String,
        /// Repeat count.
        #[serde(default = "one")]
        times: usize,
    }

    struct EchoHandler;

    impl ToolHandler for EchoHandler {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the message back."
        }

        fn input_schema(&self) -> JsonObject {
            schema_for::<EchoArgs>()
        }

        fn execute(&self, args: JsonObject, _ctx: &ToolContext) -> ToolFuture<'_> {
            Box::pin(async move {
                let EchoArgs { message, times } = parse_args(args)?;
                Ok(CallToolResult::success(vec![Content::text(message.repeat(times))]))
            })
        }
    }

    struct FailingHandler;

    impl ToolHandler for FailingHandler {
        fn name(&self) -> &str {
            "fail"
        }

        fn description(&self) -> &str {
            "Always fails."
        }

        fn input_schema(&self) -> JsonObject {
            json!({ "type": "object", "properties": {} })
                .as_object()
                .cloned()
                .unwrap()
        }

        fn execute(&self, _args: JsonObject, _ctx: &ToolContext) -> ToolFuture<'_> {
            Box::pin(async { Err(ToolError::Domain("boom".to_string())) })
        }
    }

    struct BrokenSchemaHandler;

    impl ToolHandler for BrokenSchemaHandler {
        fn name(&self) -> &str {
            "broken"
        }

        fn description(&self) -> &str {
            "Declares a schema that does not compile."
        }

        fn input_schema(&self) -> JsonObject {
            json!({ "type": "object", "properties": { "n": { "type": "string", "pattern": "(" } } })
                .as_object()
                .cloned()
                .unwrap()
        }

        fn execute(&self, _args: JsonObject, _ctx: &ToolContext) -> ToolFuture<'_> {
            Box::pin(async { Err(ToolError::Domain("unreachable".to_string())) })
        }
    }

    fn text(result: &CallToolResult) -> &str {
        result.content[0]
            .as_text()
            .map(|t| t.text.as_str())
            .unwrap_or_default()
    }

    #[test]
    fn test_registry_empty() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_register_and_list() {
        let registry = ToolRegistry::new()
            .register_handler(FailingHandler)
            .register_handler(EchoHandler);

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("echo"));
        assert_eq!(registry.list_names(), vec!["echo", "fail"]);

        let tools = registry.list_tools();
        assert_eq!(tools[0].name, "echo");
        assert_eq!(
            tools[0].input_schema.get("required"),
            Some(&json!(["message"]))
        );
        assert_eq!(tools[0].input_schema["properties"]["times"]["default"], 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_registry_duplicate_panics() {
        let _ = ToolRegistry::new()
            .register_handler(EchoHandler)
            .register_handler(EchoHandler);
    }

    #[test]
    fn test_registry_try_register_duplicate() {
        let registry = ToolRegistry::new().register_handler(EchoHandler);
        let err = registry.clone().try_register(Arc::new(EchoHandler)).err();
        assert_eq!(err, Some(RegisterError::Duplicate("echo".to_string())));

        let registry = registry.try_register_handler(FailingHandler).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_rejects_uncompilable_schema() {
        let err = ToolRegistry::new()
            .try_register_handler(BrokenSchemaHandler)
            .err();
        assert!(matches!(err, Some(RegisterError::InvalidSchema { ref tool, .. }) if tool == "broken"));
    }

    #[tokio::test]
    async fn test_dispatch_applies_defaults() {
        let registry = ToolRegistry::new().register_handler(EchoHandler);
        let args = json!({ "message": "hi" }).as_object().cloned().unwrap();

        let result = registry
            .dispatch("echo", args, &ToolContext::new())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(text(&result), "hi");
    }

    #[tokio::test]
    async fn test_dispatch_ignores_unknown_fields() {
        let registry = ToolRegistry::new().register_handler(EchoHandler);
        let args = json!({ "message": "ab", "times": 2, "loud": true })
            .as_object()
            .cloned()
            .unwrap();

        let result = registry
            .dispatch("echo", args, &ToolContext::new())
            .await
            .unwrap();
        assert_eq!(text(&result), "abab");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .dispatch("missing", JsonObject::new(), &ToolContext::new())
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_validation_error() {
        let registry = ToolRegistry::new().register_handler(EchoHandler);
        let args = json!({ "times": "many" }).as_object().cloned().unwrap();

        let err = registry
            .dispatch("echo", args, &ToolContext::new())
            .await
            .unwrap_err();

        match err {
            DispatchError::Validation(e) => {
                assert!(e.has_field("message"));
                assert!(e.has_field("times"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_handler_error_becomes_error_result() {
        let registry = ToolRegistry::new().register_handler(FailingHandler);

        let result = registry
            .dispatch("fail", JsonObject::new(), &ToolContext::new())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(text(&result), "boom");
    }

    #[test]
    fn test_parse_args_mismatch_is_internal() {
        let args = json!({ "message": 5 }).as_object().cloned().unwrap();
        let err = parse_args::<EchoArgs>(args).err().unwrap();
        assert!(matches!(err, ToolError::Internal(_)));
    }
}
