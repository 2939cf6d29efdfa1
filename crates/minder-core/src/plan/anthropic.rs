//! Completion client backed by the Anthropic Messages API.

use async_trait::async_trait;

use super::{CompletionClient, PlanError};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
const MAX_TOKENS: u32 = 1024;

/// Calls the Anthropic Messages API over HTTPS.
pub struct AnthropicClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, PlanError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": system,
            "messages": [
                { "role": "user", "content": user }
            ]
        });

        let resp = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| PlanError::GenerationFailed(format!("API request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(PlanError::GenerationFailed(format!(
                "API error {status}: {text}"
            )));
        }

        let api_resp: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| PlanError::GenerationFailed(format!("failed to parse API response: {e}")))?;

        extract_text(&api_resp)
    }
}

/// Extract the first text block from a Messages API response.
fn extract_text(api_resp: &serde_json::Value) -> Result<String, PlanError> {
    api_resp["content"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|block| block["text"].as_str())
        .map(|text| text.trim().to_owned())
        .ok_or_else(|| PlanError::GenerationFailed("no text in API response".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_reads_first_content_block() {
        let resp = serde_json::json!({
            "content": [
                { "type": "text", "text": "  1. Step one\n2. Step two  " }
            ]
        });
        assert_eq!(extract_text(&resp).unwrap(), "1. Step one\n2. Step two");
    }

    #[test]
    fn extract_text_rejects_empty_content() {
        for resp in [
            serde_json::json!({}),
            serde_json::json!({ "content": [] }),
            serde_json::json!({ "content": [{ "type": "tool_use" }] }),
        ] {
            let result = extract_text(&resp);
            assert!(matches!(result, Err(PlanError::GenerationFailed(_))));
        }
    }
}
