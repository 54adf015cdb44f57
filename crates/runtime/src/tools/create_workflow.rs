//! Workflow materialization tool.

use crate::contract::workflow_schema;
use crate::tool::{Tool, ToolDefinition, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::debug;

/// Persists a validated workflow definition as a JSON document under a
/// configured directory.
pub struct CreateWorkflowTool {
    workflows_dir: PathBuf,
}

impl CreateWorkflowTool {
    pub fn new(workflows_dir: impl Into<PathBuf>) -> Self {
        Self {
            workflows_dir: workflows_dir.into(),
        }
    }

    /// Derive a filesystem-safe file stem from the workflow name.
    fn slug(name: &str) -> String {
        let mut slug = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_matches('-').to_string()
    }
}

#[async_trait]
impl Tool for CreateWorkflowTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "create_workflow".to_string(),
            description: "Create a workflow definition: a named, triggered sequence of \
                          entity-update steps."
                .to_string(),
            input_schema: workflow_schema(),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let name = arguments
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments("missing 'name' field".to_string()))?;
        let steps = arguments
            .get("steps")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ToolError::InvalidArguments("missing 'steps' field".to_string()))?;

        let slug = Self::slug(name);
        if slug.is_empty() {
            return Err(ToolError::InvalidArguments(
                "workflow name has no usable characters".to_string(),
            ));
        }
        let path = self.workflows_dir.join(format!("{slug}.json"));

        tokio::fs::create_dir_all(&self.workflows_dir)
            .await
            .map_err(|e| {
                ToolError::ExecutionFailed(format!(
                    "failed to create '{}': {e}",
                    self.workflows_dir.display()
                ))
            })?;

        let document = serde_json::to_string_pretty(&arguments)
            .map_err(|e| ToolError::ExecutionFailed(format!("failed to encode workflow: {e}")))?;
        tokio::fs::write(&path, document).await.map_err(|e| {
            ToolError::ExecutionFailed(format!("failed to write '{}': {e}", path.display()))
        })?;

        debug!(workflow = name, path = %path.display(), "workflow created");

        Ok(json!({
            "status": "created",
            "name": name,
            "steps": steps.len(),
            "path": path.display().to_string(),
        }))
    }
}
