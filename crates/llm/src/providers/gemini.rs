use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use beamline_runtime::provider::{ProviderCapability, ProviderError};
use beamline_runtime::{StructuredProposal, ToolDefinition};

use super::{parse_proposal, proposal_envelope};

const TEMPERATURE: f32 = 0.0;
const MAX_OUTPUT_TOKENS: u32 = 1024;

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Build the generateContent request with a JSON response schema.
    fn build_request_body(system_prompt: &str, user_prompt: &str, output_schema: &Value) -> Value {
        json!({
            // Gemini uses a separate system_instruction field (like Claude)
            "system_instruction": {
                "parts": [{ "text": system_prompt }],
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": user_prompt }],
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
                "responseMimeType": "application/json",
                "responseSchema": proposal_envelope(output_schema),
            },
        })
    }
}

#[async_trait]
impl ProviderCapability for GeminiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        _tools: &[ToolDefinition],
        output_schema: &Value,
    ) -> Result<StructuredProposal, ProviderError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key,
        );

        let body = Self::build_request_body(system_prompt, user_prompt, output_schema);

        debug!("Gemini request to model={}", self.model);

        let response = self
            .client
            .post(&url)
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
        let content = resp["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::InvalidResponse("missing candidates[0].content.parts[0].text".into())
            })?;

        parse_proposal(content)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_structure() {
        let schema = json!({"type": "object", "required": ["name"]});
        let body =
            GeminiProvider::build_request_body("You are helpful.", "Create a workflow", &schema);

        // System instruction is separate
        assert_eq!(
            body["system_instruction"]["parts"][0]["text"]
                .as_str()
                .unwrap(),
            "You are helpful.",
        );

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "Create a workflow");

        // Generation config requests JSON conforming to the envelope
        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["properties"]["arguments"], schema);
    }
}
