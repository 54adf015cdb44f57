//! Concrete tool implementations.

mod create_workflow;

pub use create_workflow::CreateWorkflowTool;
