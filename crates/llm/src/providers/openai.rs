use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use beamline_runtime::provider::{ProviderCapability, ProviderError};
use beamline_runtime::{StructuredProposal, ToolDefinition};

use super::{parse_proposal, proposal_envelope};

const TEMPERATURE: f32 = 0.0;
const MAX_TOKENS: u32 = 1024;

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    /// Build the chat-completions request with a structured-output response
    /// format derived from the contract schema.
    fn build_request_body(
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        output_schema: &Value,
    ) -> Value {
        json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "structured_proposal",
                    "schema": proposal_envelope(output_schema)
                }
            },
        })
    }
}

#[async_trait]
impl ProviderCapability for OpenAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        _tools: &[ToolDefinition],
        output_schema: &Value,
    ) -> Result<StructuredProposal, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = Self::build_request_body(&self.model, system_prompt, user_prompt, output_schema);

        debug!("OpenAI request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::InvalidResponse("missing choices[0].message.content".into())
            })?;

        parse_proposal(content)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_structure() {
        let schema = json!({"type": "object", "required": ["name"]});
        let body = OpenAiProvider::build_request_body(
            "gpt-5.2",
            "You are helpful.",
            "Create a workflow",
            &schema,
        );

        assert_eq!(body["model"], "gpt-5.2");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You are helpful.");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Create a workflow");

        // Response format carries the envelope, not the bare schema
        let response_schema = &body["response_format"]["json_schema"]["schema"];
        assert_eq!(response_schema["properties"]["arguments"], schema);
        assert_eq!(body["response_format"]["type"], "json_schema");
    }
}
