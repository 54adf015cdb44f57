//! The orchestrator: provider resolution, contract enforcement, permission
//! gating, and tool dispatch, composed into a single sequential pipeline.

use crate::audit::AuditSink;
use crate::config::AgentConfig;
use crate::contract;
use crate::error::RuntimeError;
use crate::permission::PermissionPolicy;
use crate::proposal::StructuredProposal;
use crate::provider::ProviderRegistry;
use crate::registry::ToolRegistry;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Discussion proposes only; Execution additionally authorizes and performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Discussion,
    Execution,
}

impl FromStr for ExecutionMode {
    type Err = RuntimeError;

    /// Exactly "discussion" or "execution"; anything else is rejected
    /// rather than silently treated as discussion.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discussion" => Ok(Self::Discussion),
            "execution" => Ok(Self::Execution),
            other => Err(RuntimeError::InvalidMode(other.to_string())),
        }
    }
}

/// What a successful run produced.
#[derive(Debug)]
pub enum RunOutcome {
    /// Discussion mode: the validated proposal, surfaced as-is.
    Proposal(StructuredProposal),
    /// Execution mode: the tool's return value, passed through verbatim.
    ToolOutput(Value),
}

/// Turns one natural-language instruction into either a displayed proposal
/// or a permission-checked, executed side effect.
///
/// Holds no mutable state between calls; registries, policy, and sink are
/// read-only collaborators, so concurrent `run` invocations are safe.
pub struct AgentRuntime {
    providers: Arc<ProviderRegistry>,
    tools: Arc<ToolRegistry>,
    policy: PermissionPolicy,
    audit: Arc<dyn AuditSink>,
    contract: Value,
}

impl AgentRuntime {
    pub fn new(
        providers: Arc<ProviderRegistry>,
        tools: Arc<ToolRegistry>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            providers,
            tools,
            policy: PermissionPolicy,
            audit,
            contract: contract::workflow_schema(),
        }
    }

    /// Run one invocation. Any failed step aborts the run; there is no
    /// retry and no partial result.
    pub async fn run(
        &self,
        config: &AgentConfig,
        input: &str,
        mode: ExecutionMode,
    ) -> Result<RunOutcome, RuntimeError> {
        // Resolve before any prompt is sent, so unsupported models never
        // incur a provider call.
        let provider = self
            .providers
            .resolve(&config.model)
            .ok_or_else(|| RuntimeError::UnsupportedModel(config.model.clone()))?;
        debug!(model = %config.model, provider = provider.provider_name(), "provider resolved");

        // One structured proposal per invocation; the model is not handed a
        // live tool list.
        let proposal = provider
            .generate(&config.instructions, input, &[], &self.contract)
            .await?;

        // Mandatory in both modes: no proposal is surfaced, logged, or
        // executed unvalidated.
        contract::validate(&proposal.arguments, &self.contract)?;
        debug!(tool = %proposal.tool_name, "proposal validated");

        match mode {
            ExecutionMode::Discussion => Ok(RunOutcome::Proposal(proposal)),
            ExecutionMode::Execution => {
                // Permission strictly before dispatch; a rejected tool name
                // never reaches the registry.
                self.policy.check(config, &proposal.tool_name)?;

                let tool_name = proposal.tool_name;
                info!(tool = %tool_name, "executing tool");
                let output = self.tools.dispatch(&tool_name, proposal.arguments).await?;

                // Best-effort bookkeeping: a successfully executed side
                // effect is never reported as failed because the audit
                // append failed.
                if let Err(e) = self.audit.record(&tool_name).await {
                    warn!(tool = %tool_name, error = %e, "audit record failed");
                }

                Ok(RunOutcome::ToolOutput(output))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditSink;
    use crate::provider::mock::MockProvider;
    use serde_json::json;

    fn valid_proposal() -> StructuredProposal {
        StructuredProposal {
            tool_name: "create_workflow".to_string(),
            arguments: json!({
                "name": "Overdue Task Handler",
                "trigger": "task.overdue",
                "steps": [
                    {"type": "update", "entity": "Task", "update": {"status": "urgent"}}
                ]
            }),
        }
    }

    fn runtime_with(provider: Arc<MockProvider>) -> AgentRuntime {
        let mut providers = ProviderRegistry::new();
        providers.register("known-model", provider);
        AgentRuntime::new(
            Arc::new(providers),
            Arc::new(ToolRegistry::new()),
            Arc::new(MemoryAuditSink::new()),
        )
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(
            "discussion".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::Discussion
        );
        assert_eq!(
            "execution".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::Execution
        );
    }

    #[test]
    fn test_unknown_mode_rejected() {
        for bad in ["", "Discussion", "exec", "dry-run"] {
            let err = bad.parse::<ExecutionMode>().unwrap_err();
            assert!(matches!(err, RuntimeError::InvalidMode(_)), "mode: {bad:?}");
        }
    }

    #[tokio::test]
    async fn test_discussion_returns_validated_proposal() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_proposal(valid_proposal());
        let runtime = runtime_with(provider.clone());

        let config = AgentConfig::new("known-model", "instructions", ["create_workflow"]);
        let outcome = runtime
            .run(&config, "mark overdue tasks urgent", ExecutionMode::Discussion)
            .await
            .unwrap();

        match outcome {
            RunOutcome::Proposal(p) => assert_eq!(p, valid_proposal()),
            other => panic!("expected proposal, got {other:?}"),
        }
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_model_fails_before_provider_call() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_proposal(valid_proposal());
        let runtime = runtime_with(provider.clone());

        let config = AgentConfig::new("missing-model", "instructions", ["create_workflow"]);
        let err = runtime
            .run(&config, "anything", ExecutionMode::Discussion)
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::UnsupportedModel(m) if m == "missing-model"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_surfaced() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_error("upstream quota exceeded");
        let runtime = runtime_with(provider);

        let config = AgentConfig::new("known-model", "instructions", ["create_workflow"]);
        let err = runtime
            .run(&config, "anything", ExecutionMode::Discussion)
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::Provider(_)));
    }
}
