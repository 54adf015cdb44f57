use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use beamline_runtime::provider::{ProviderCapability, ProviderError};
use beamline_runtime::{StructuredProposal, ToolDefinition};

use super::proposal_envelope;

const MAX_TOKENS: u32 = 1024;

/// Name of the synthetic tool Claude is forced to call; its input is the
/// proposal envelope.
const EMIT_TOOL: &str = "emit_proposal";

pub struct ClaudeProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ClaudeProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Build the messages request. Claude's structured output is forced
    /// tool use: one synthetic tool whose input schema is the envelope.
    fn build_request_body(
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        output_schema: &Value,
    ) -> Value {
        json!({
            "model": model,
            "system": system_prompt,
            "messages": [
                {"role": "user", "content": user_prompt}
            ],
            "max_tokens": MAX_TOKENS,
            "tools": [{
                "name": EMIT_TOOL,
                "description": "Emit the single structured proposal for this instruction.",
                "input_schema": proposal_envelope(output_schema)
            }],
            "tool_choice": {"type": "tool", "name": EMIT_TOOL},
        })
    }

    /// Pull the forced tool call's input out of the response content blocks.
    fn extract_proposal(resp: &Value) -> Result<StructuredProposal, ProviderError> {
        let blocks = resp["content"]
            .as_array()
            .ok_or_else(|| ProviderError::InvalidResponse("missing content blocks".into()))?;

        let input = blocks
            .iter()
            .find(|block| block["type"] == "tool_use" && block["name"] == EMIT_TOOL)
            .map(|block| block["input"].clone())
            .ok_or_else(|| {
                ProviderError::InvalidResponse(format!("no {EMIT_TOOL} tool_use block"))
            })?;

        serde_json::from_value(input)
            .map_err(|e| ProviderError::InvalidResponse(format!("malformed proposal: {e}")))
    }
}

#[async_trait]
impl ProviderCapability for ClaudeProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        _tools: &[ToolDefinition],
        output_schema: &Value,
    ) -> Result<StructuredProposal, ProviderError> {
        let url = "https://api.anthropic.com/v1/messages";
        let body = Self::build_request_body(&self.model, system_prompt, user_prompt, output_schema);

        debug!("Claude request to {}", url);

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let resp: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Self::extract_proposal(&resp)
    }

    fn provider_name(&self) -> &str {
        "claude"
    }
}
