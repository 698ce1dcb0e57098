//! OpenAI provider implementation
//!
//! Supports OpenAI API and OpenAI-compatible APIs (OpenRouter, OneAPI, etc.)

use crate::error::{BrandForgeError, Result};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::types::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI provider implementation
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(BrandForgeError::config("OpenAI API key is required"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| BrandForgeError::network(e.to_string(), None, None))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
        })
    }

    /// Append `endpoint` to the base URL, adding `/v1` when missing
    fn build_url(&self, endpoint: &str) -> String {
        let base_url = self.base_url.trim_end_matches('/');
        if base_url.ends_with("/v1") {
            format!("{}{}", base_url, endpoint)
        } else {
            format!("{}/v1{}", base_url, endpoint)
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, completion: &CompletionRequest) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: completion.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: completion.prompt.clone(),
                },
            ],
            temperature: completion.temperature,
            max_tokens: completion.max_tokens,
        };

        let url = self.build_url("/chat/completions");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| BrandForgeError::generation(self.name(), format!("Failed to connect to {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = match status.as_u16() {
                401 => format!("Authentication failed (401). Check the API key for {}", self.base_url),
                429 => "Rate limit exceeded (429). Try again later".to_string(),
                500..=599 => format!("Server error ({}). The API service is experiencing issues", status),
                _ => format!("API request failed ({}): {}", status, error_text),
            };
            return Err(BrandForgeError::generation(self.name(), message));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| BrandForgeError::generation(self.name(), format!("Unreadable response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| BrandForgeError::generation(self.name(), "Response contained no choices"))
    }

    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: &str) -> OpenAiProvider {
        OpenAiProvider::new(&LlmConfig {
            api_key: "sk-test".to_string(),
            base_url: Some(base_url.to_string()),
            ..LlmConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            provider("https://api.openai.com/v1/").build_url("/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            provider("https://openrouter.ai/api").build_url("/chat/completions"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }
}
