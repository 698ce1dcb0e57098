//! Ollama provider implementation
//!
//! Supports local Ollama API for running LLMs locally

use crate::error::{BrandForgeError, Result};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::types::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama provider implementation for local LLM inference
pub struct OllamaProvider {
    client: Client,
    model: String,
    base_url: String,
}

impl OllamaProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(180)) // local inference is slow
            .build()
            .map_err(|e| BrandForgeError::network(e.to_string(), None, None))?;

        Ok(Self {
            client,
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434".to_string()),
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(&self, completion: &CompletionRequest) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            system: completion.system.clone(),
            prompt: completion.prompt.clone(),
            stream: false,
            options: GenerateOptions {
                temperature: completion.temperature,
            },
        };

        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                BrandForgeError::generation(self.name(), format!("Failed to connect to Ollama at {}: {}", url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = match status.as_u16() {
                404 => format!(
                    "Model '{}' not found. Pull it first: ollama pull {}",
                    self.model, self.model
                ),
                500..=599 => format!("Ollama server error ({}). Make sure Ollama is running", status),
                _ => format!("Ollama request failed ({}): {}", status, error_text),
            };
            return Err(BrandForgeError::generation(self.name(), message));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BrandForgeError::generation(self.name(), format!("Unreadable response: {}", e)))?;

        Ok(reply.response)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        true // Ollama doesn't need API key
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    system: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest {
            model: "llama3".to_string(),
            system: "You name brands.".to_string(),
            prompt: "names".to_string(),
            stream: false,
            options: GenerateOptions { temperature: 0.5 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["options"]["temperature"], 0.5);
        assert_eq!(json["stream"], false);
    }
}
