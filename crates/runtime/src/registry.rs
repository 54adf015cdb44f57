use crate::tool::{Tool, ToolDefinition, ToolError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Name → tool table. The registry treats tools opaquely: its only job is
/// lookup and invocation forwarding. Thread-safe via Arc wrapping of
/// individual tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Returns error if name already registered.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        let def = tool.definition();
        if self.tools.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        self.tools.insert(def.name, Arc::new(tool));
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all registered tool definitions.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Resolve `name` and forward `arguments` to it. The tool's return
    /// value is passed through verbatim.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> Result<Value, DispatchError> {
        let tool = self
            .get(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        debug!(tool = name, "dispatching");
        tool.execute(arguments)
            .await
            .map_err(|source| DispatchError::Execution {
                tool: name.to_string(),
                source,
            })
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("tool with name '{0}' is already registered")]
    DuplicateName(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no tool registered under '{0}'")]
    UnknownTool(String),
    #[error("tool '{tool}' failed")]
    Execution {
        tool: String,
        #[source]
        source: ToolError,
    },
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Echoes its arguments back and counts executions.
    pub struct EchoTool {
        pub executions: Arc<AtomicUsize>,
    }

    impl EchoTool {
        pub fn new() -> Self {
            Self {
                executions: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "echo".to_string(),
                description: "Echoes back the arguments. For testing.".to_string(),
                input_schema: serde_json::json!({"type": "object"}),
            }
        }

        async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            Ok(arguments)
        }
    }

    /// Always fails with an execution error.
    pub struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "failing".to_string(),
                description: "Always fails. For testing.".to_string(),
                input_schema: serde_json::json!({"type": "object"}),
            }
        }

        async fn execute(&self, _arguments: Value) -> Result<Value, ToolError> {
            Err(ToolError::ExecutionFailed("boom".to_string()))
        }
    }
}
