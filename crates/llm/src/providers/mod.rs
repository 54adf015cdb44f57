pub mod claude;
pub mod gemini;
pub mod openai;

use std::sync::Arc;

use beamline_runtime::provider::{ProviderError, ProviderRegistry};
use beamline_runtime::StructuredProposal;
use serde_json::{json, Value};

use crate::config::LlmConfig;

/// Build the standard model-id → backend table from config.
///
/// Backends without an API key are left unregistered, so their model ids
/// fail resolution in the runtime before any network call.
pub fn standard_registry(config: &LlmConfig) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    if let Some(api_key) = &config.openai_api_key {
        registry.register(
            config.openai_model.clone(),
            Arc::new(openai::OpenAiProvider::new(
                api_key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
            )),
        );
    }
    if let Some(api_key) = &config.anthropic_api_key {
        registry.register(
            config.anthropic_model.clone(),
            Arc::new(claude::ClaudeProvider::new(
                api_key.clone(),
                config.anthropic_model.clone(),
            )),
        );
    }
    if let Some(api_key) = &config.gemini_api_key {
        registry.register(
            config.gemini_model.clone(),
            Arc::new(gemini::GeminiProvider::new(
                api_key.clone(),
                config.gemini_model.clone(),
            )),
        );
    }

    registry
}

/// Wrap the runtime's output schema in the envelope every backend is asked
/// to fill: the proposed tool name plus its schema-conformant arguments.
pub(crate) fn proposal_envelope(output_schema: &Value) -> Value {
    json!({
        "type": "object",
        "properties": {
            "tool_name": {"type": "string"},
            "arguments": output_schema
        },
        "required": ["tool_name", "arguments"]
    })
}

/// Parse a backend's JSON text into a proposal.
pub(crate) fn parse_proposal(text: &str) -> Result<StructuredProposal, ProviderError> {
    serde_json::from_str(text)
        .map_err(|e| ProviderError::InvalidResponse(format!("malformed proposal: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_skips_unconfigured_backends() {
        let config = LlmConfig {
            openai_api_key: Some("sk-test".to_string()),
            openai_model: "gpt-5.2".to_string(),
            openai_base_url: "https://api.openai.com".to_string(),
            anthropic_api_key: None,
            anthropic_model: "claude-opus-4.6".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-3".to_string(),
        };

        let registry = standard_registry(&config);
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("gpt-5.2").is_some());
        assert!(registry.resolve("claude-opus-4.6").is_none());
        assert!(registry.resolve("gemini-3").is_none());
    }

    #[test]
    fn test_envelope_wraps_schema() {
        let schema = json!({"type": "object", "required": ["name"]});
        let envelope = proposal_envelope(&schema);

        assert_eq!(envelope["properties"]["arguments"], schema);
        assert_eq!(envelope["required"], json!(["tool_name", "arguments"]));
    }

    #[test]
    fn test_parse_proposal() {
        let proposal =
            parse_proposal(r#"{"tool_name": "create_workflow", "arguments": {"name": "x"}}"#)
                .unwrap();
        assert_eq!(proposal.tool_name, "create_workflow");
        assert_eq!(proposal.arguments["name"], "x");

        assert!(parse_proposal("not json").is_err());
        assert!(parse_proposal(r#"{"tool_name": "x"}"#).is_err());
    }
}
