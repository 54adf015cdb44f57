use crate::contract::ContractViolation;
use crate::permission::PermissionDenied;
use crate::provider::ProviderError;
use crate::registry::DispatchError;
use crate::tool::ToolError;
use thiserror::Error;

/// Everything that can abort a single runtime invocation. Every variant is
/// fatal to the run; none are retried internally.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// No provider is registered for the requested model id. Raised before
    /// any prompt is sent.
    #[error("unsupported model: '{0}'")]
    UnsupportedModel(String),

    /// The provider itself failed; surfaced verbatim, never retried.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The proposal's arguments did not satisfy the contract schema.
    #[error(transparent)]
    ContractViolation(#[from] ContractViolation),

    /// The proposed tool is absent from the agent's allow-list.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// The tool name is permitted but has no registered implementation.
    #[error("no tool registered under '{0}'")]
    UnknownTool(String),

    /// The tool's own side effect failed.
    #[error("tool '{tool}' failed")]
    ToolExecution {
        tool: String,
        #[source]
        source: ToolError,
    },

    /// A mode string other than "discussion" or "execution".
    #[error("unknown mode: '{0}' (expected 'discussion' or 'execution')")]
    InvalidMode(String),
}

impl From<DispatchError> for RuntimeError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::UnknownTool(name) => RuntimeError::UnknownTool(name),
            DispatchError::Execution { tool, source } => {
                RuntimeError::ToolExecution { tool, source }
            }
        }
    }
}
