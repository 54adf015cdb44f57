use crate::proposal::StructuredProposal;
use crate::tool::ToolDefinition;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for model backends that can produce a single structured proposal.
///
/// This trait lives in the runtime (not in crates/llm) because it's defined
/// by the consumer, not the provider. Implementations live in adapter
/// crates.
#[async_trait]
pub trait ProviderCapability: Send + Sync {
    /// Ask the backend for one proposal conforming to `output_schema`.
    /// `tools` is the definitions made visible to the model; the runtime
    /// currently always passes an empty slice.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        tools: &[ToolDefinition],
        output_schema: &Value,
    ) -> Result<StructuredProposal, ProviderError>;

    /// Backend name for logging (e.g., "openai", "claude", "gemini")
    fn provider_name(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {status} — {body}")]
    Api { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Static model-id → capability table, populated at startup and read-only
/// afterwards. Registering a backend for a new model id requires no change
/// to the dispatch logic.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ProviderCapability>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a backend under a model identifier. Last write wins.
    pub fn register(&mut self, model_id: impl Into<String>, provider: Arc<dyn ProviderCapability>) {
        self.providers.insert(model_id.into(), provider);
    }

    /// Look up the backend for a model identifier.
    pub fn resolve(&self, model_id: &str) -> Option<Arc<dyn ProviderCapability>> {
        self.providers.get(model_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock provider for exercising the pipeline without real API calls.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Returns queued proposals in order and counts `generate` calls.
    pub struct MockProvider {
        responses: Mutex<Vec<Result<StructuredProposal, String>>>,
        calls: AtomicUsize,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        /// Queue a proposal for the next `generate` call.
        pub fn queue_proposal(&self, proposal: StructuredProposal) {
            self.responses.lock().unwrap().push(Ok(proposal));
        }

        /// Queue a generation failure for the next `generate` call.
        pub fn queue_error(&self, message: &str) {
            self.responses.lock().unwrap().push(Err(message.to_string()));
        }

        /// Number of `generate` calls made so far.
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Default for MockProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ProviderCapability for MockProvider {
        async fn generate(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _tools: &[ToolDefinition],
            _output_schema: &Value,
        ) -> Result<StructuredProposal, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.lock().unwrap().pop() {
                Some(Ok(proposal)) => Ok(proposal),
                Some(Err(message)) => Err(ProviderError::InvalidResponse(message)),
                None => Err(ProviderError::InvalidResponse(
                    "no queued response".to_string(),
                )),
            }
        }

        fn provider_name(&self) -> &str {
            "mock"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockProvider;
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ProviderRegistry::new();
        registry.register("known-model", Arc::new(MockProvider::new()));

        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("known-model").is_some());
        assert!(registry.resolve("unknown-model").is_none());
    }

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let provider = MockProvider::new();
        provider.queue_proposal(StructuredProposal {
            tool_name: "create_workflow".to_string(),
            arguments: serde_json::json!({}),
        });

        assert_eq!(provider.call_count(), 0);
        let schema = serde_json::json!({"type": "object"});
        provider.generate("s", "u", &[], &schema).await.unwrap();
        assert_eq!(provider.call_count(), 1);
    }
}
