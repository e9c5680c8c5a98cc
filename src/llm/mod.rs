//! Language model access
//!
//! [`LlmService`] talks to any OpenAI-compatible chat completions endpoint
//! (Groq by default). The pipeline only depends on the [`LanguageModel`]
//! trait, so tests can script model replies without a network.

pub mod prompts;

use std::time::Duration;

use async_trait::async_trait;
pub use prompts::ProfilePrompts;
pub use prompts::PromptTemplate;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::RabotError;
use crate::errors::Result;

/// Something that turns a prompt into a completion
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}

/// One message of a chat completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for an OpenAI-compatible chat completions API
#[derive(Clone)]
pub struct LlmService {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// Create a new LLM service
    ///
    /// # Errors
    /// - `MissingApiKey` when no key is configured
    /// - HTTP client build errors
    pub fn new(config: &AppConfig) -> Result<Self> {
        if config.llm_key().trim().is_empty() {
            return Err(RabotError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()
            .map_err(|e| RabotError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.llm_endpoint().trim_end_matches('/').to_string(),
            api_key: config.llm_key().to_string(),
            model: config.llm_model().to_string(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
        })
    }

    /// Generate a completion with explicit sampling parameters
    ///
    /// # Errors
    /// - Network failures and timeouts
    /// - Non-success status codes (authentication, rate limits)
    /// - Responses without a completion
    pub async fn generate_with_params(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling chat completions API: {} ({})", url, self.model);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(prompt)],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RabotError::LlmError(format!(
                "LLM API error ({status}): {error_text}"
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| RabotError::LlmError(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RabotError::LlmError("No completion in response".to_string()))
    }
}

#[async_trait]
impl LanguageModel for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_params(prompt, self.temperature, self.max_tokens)
            .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let config = AppConfig::default();
        assert!(matches!(
            LlmService::new(&config),
            Err(RabotError::MissingApiKey)
        ));
    }

    #[test]
    fn test_new_uses_configured_model() {
        let mut config = AppConfig::default();
        config.llm.api_key = "gsk_test".to_string();
        config.llm.endpoint = "https://api.groq.com/openai/v1/".to_string();

        let service = LlmService::new(&config).unwrap();
        assert_eq!(service.model_name(), "llama-3.1-8b-instant");
        assert_eq!(service.endpoint, "https://api.groq.com/openai/v1");
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "llama-3.1-8b-instant",
            messages: vec![ChatMessage::user("Who are you?")],
            temperature: 0.3,
            max_tokens: 256,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Who are you?");
        assert_eq!(json["max_tokens"], 256);
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"I am Ravikumar."},"finish_reason":"stop"}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].message.content, "I am Ravikumar.");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let mut config = AppConfig::default();
        config.llm.api_key = "gsk_test".to_string();
        config.llm.endpoint = "http://127.0.0.1:9".to_string();
        config.llm.timeout_secs = 2;

        let service = LlmService::new(&config).unwrap();
        assert!(matches!(
            service.generate("hello").await,
            Err(RabotError::HttpError(_))
        ));
    }
}
