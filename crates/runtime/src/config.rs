use std::collections::HashSet;

/// Configuration governing one runtime invocation: which model to call,
/// the system instructions, and the tool allow-list.
///
/// Immutable per invocation. `allowed_tools` is the single source of truth
/// for tool authorization; nothing else grants access.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model identifier, resolved against the provider registry.
    pub model: String,
    /// System prompt sent to the provider.
    pub instructions: String,
    /// Tool names this agent may execute.
    pub allowed_tools: HashSet<String>,
}

impl AgentConfig {
    pub fn new(
        model: impl Into<String>,
        instructions: impl Into<String>,
        allowed_tools: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            model: model.into(),
            instructions: instructions.into(),
            allowed_tools: allowed_tools.into_iter().map(Into::into).collect(),
        }
    }

    /// Override the model id before passing the config into the runtime.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// The stock workflow-automation agent.
pub fn workflow_agent() -> AgentConfig {
    AgentConfig::new(
        "gpt-5.2",
        "You are a workflow automation agent. Given a single instruction, \
         propose exactly one workflow definition: a name, the event that \
         triggers it, and the steps it performs. Each step updates one \
         entity. Respond only with the structured proposal.",
        ["create_workflow"],
    )
}
