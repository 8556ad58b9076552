use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Failures of a single text-generation call
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("DEEPSEEK_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("no text content in response")]
    EmptyResponse,
}

/// The model-call collaborator: prompt in, text out, or failure
///
/// Implemented by [`ChatClient`] for the real API and by scripted
/// generators in tests; the orchestrator only sees this trait.
pub trait TextGenerator {
    fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// Configuration for the chat-completions client
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// API key (from DEEPSEEK_API_KEY env var)
    pub api_key: String,
    /// Base URL of an OpenAI-compatible endpoint
    pub base_url: String,
    /// Model to use (e.g., "deepseek-chat")
    pub model: String,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl ChatConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, GenerationError> {
        let api_key =
            std::env::var("DEEPSEEK_API_KEY").map_err(|_| GenerationError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.deepseek.com".to_string(),
            model: "deepseek-chat".to_string(),
            max_tokens: 4096,
        }
    }
}

/// OpenAI-compatible chat-completions client
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn send(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let response: ChatResponse = response.json().await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

impl TextGenerator for ChatClient {
    fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send {
        self.send(system, user, temperature)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hello"}, "finish_reason": "stop"}
            ]
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "hello");
    }

    #[test]
    fn test_config_defaults() {
        let config = ChatConfig::new("key".to_string());
        assert_eq!(config.base_url, "https://api.deepseek.com");
        assert_eq!(config.model, "deepseek-chat");
    }
}
