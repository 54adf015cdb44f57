use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Describes a tool's interface for model consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name (e.g., "create_workflow")
    pub name: String,
    /// Human-readable description for the model
    pub description: String,
    /// JSON Schema describing the expected arguments
    pub input_schema: Value,
}

/// A named capability with an external side effect, invoked only under
/// permission. Tools are object-safe, Send + Sync, and async.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's definition (name, description, JSON Schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute with the given arguments. The return value is opaque to the
    /// runtime and passed through to the caller unmodified.
    async fn execute(&self, arguments: Value) -> Result<Value, ToolError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
