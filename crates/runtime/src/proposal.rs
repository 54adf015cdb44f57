use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A model-generated description of an action: the tool the model wants
/// invoked and the arguments to invoke it with.
///
/// Produced by a provider, never constructed by the runtime. Must pass
/// contract validation before it is trusted in either mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredProposal {
    pub tool_name: String,
    pub arguments: Value,
}
