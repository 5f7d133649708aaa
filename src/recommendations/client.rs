// OpenRouter client for parameter extraction
// Speaks the OpenAI-compatible chat completions API

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LlmConfig;
use crate::recommendations::extraction::{
    build_system_prompt, parse_model_output, reconcile_with_query,
};
use crate::recommendations::{LlmError, RecommendationParameters};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for the OpenRouter API
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    config: LlmConfig,
    http_client: reqwest::Client,
    system_prompt: String,
}

impl OpenRouterClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
            system_prompt: build_system_prompt(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Asks the model to turn a free-text query into search parameters
    ///
    /// The returned parameters are already sanitized, reconciled with any
    /// negations in `query`, and always pass `ParameterValidator`.
    pub async fn extract_parameters(
        &self,
        query: &str,
    ) -> Result<RecommendationParameters, LlmError> {
        info!(model = %self.config.model, query_len = query.len(), "Requesting parameter extraction");

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;
        debug!("Raw model reply: {}", content);

        let params = parse_model_output(&content)?;
        Ok(reconcile_with_query(params, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config(base_url: &str) -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".to_string(),
            model: "test/model".to_string(),
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_completions_url_tolerates_trailing_slash() {
        let client = OpenRouterClient::new(test_config("https://openrouter.ai/api/v1/")).unwrap();
        assert_eq!(
            client.completions_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "test/model",
            messages: vec![ChatMessage {
                role: "user",
                content: "cheap hatchback",
            }],
            temperature: 0.0,
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "test/model");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "cheap hatchback");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "id": "gen-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"maxPrice\": 15000}"}}]
        }"#;

        let reply: ChatResponse = serde_json::from_str(json).unwrap();
        let content = reply.choices[0].message.content.clone().unwrap();

        let params = parse_model_output(&content).unwrap();
        assert_eq!(params.max_price, Some(15000.0));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        // Port 9 (discard) on localhost is not expected to speak HTTP
        let client = OpenRouterClient::new(test_config("http://127.0.0.1:9")).unwrap();
        let result = client.extract_parameters("anything").await;
        assert!(matches!(result, Err(LlmError::Request(_))));
    }
}
