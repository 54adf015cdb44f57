pub mod audit;
pub mod config;
pub mod contract;
pub mod error;
pub mod permission;
pub mod proposal;
pub mod provider;
pub mod registry;
pub mod runtime;
pub mod tool;
pub mod tools;

pub use audit::{AuditRecord, AuditSink, JsonlAuditSink, MemoryAuditSink};
pub use config::{workflow_agent, AgentConfig};
pub use contract::{validate, workflow_schema, ContractViolation};
pub use error::RuntimeError;
pub use permission::{PermissionDenied, PermissionPolicy};
pub use proposal::StructuredProposal;
pub use provider::{ProviderCapability, ProviderError, ProviderRegistry};
pub use registry::{DispatchError, RegistryError, ToolRegistry};
pub use runtime::{AgentRuntime, ExecutionMode, RunOutcome};
pub use tool::{Tool, ToolDefinition, ToolError};
pub use tools::CreateWorkflowTool;
