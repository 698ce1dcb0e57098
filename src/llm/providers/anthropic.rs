//! Anthropic provider implementation
//!
//! Supports Anthropic's Messages API

use crate::error::{BrandForgeError, Result};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::types::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_VERSION: &str = "2023-06-01";

/// Anthropic provider implementation
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(BrandForgeError::config("Anthropic API key is required"));
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
                .unwrap_or_else(|| "https://api.anthropic.com/v1".to_string()),
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, completion: &CompletionRequest) -> Result<String> {
        let request = MessagesRequest {
            model: self.model.clone(),
            system: completion.system.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: completion.prompt.clone(),
            }],
            temperature: completion.temperature.min(1.0),
            max_tokens: completion.max_tokens,
        };

        let url = format!("{}/messages", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| BrandForgeError::generation(self.name(), format!("Failed to connect to {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = match status.as_u16() {
                401 => "Authentication failed (401). Check the Anthropic API key".to_string(),
                429 => "Rate limit exceeded (429). Try again later".to_string(),
                529 => "Anthropic API is overloaded (529). Try again later".to_string(),
                _ => format!("Anthropic API request failed ({}): {}", status, error_text),
            };
            return Err(BrandForgeError::generation(self.name(), message));
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| BrandForgeError::generation(self.name(), format!("Unreadable response: {}", e)))?;

        let content: String = reply
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");
        if content.trim().is_empty() {
            return Err(BrandForgeError::generation(self.name(), "Response contained no text"));
        }

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    system: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

/// Only text blocks carry `text`
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let config = LlmConfig {
            provider: "anthropic".to_string(),
            ..LlmConfig::default()
        };
        assert!(AnthropicProvider::new(&config).is_err());
    }

    #[test]
    fn test_response_text_blocks() {
        let reply: MessagesResponse =
            serde_json::from_str(r#"{"content":[{"type":"text","text":"[]"},{"type":"tool_use","id":"x"}]}"#)
                .unwrap();
        let texts: Vec<_> = reply.content.into_iter().filter_map(|b| b.text).collect();
        assert_eq!(texts, vec!["[]"]);
    }
}
