//! LLM (Large Language Model) integration module
//!
//! Brand name generation and brand story copy over hosted or local models.

pub mod generator;
pub mod providers;
pub mod story;

// Re-export main functionality
pub use generator::NameGenerator;
pub use story::StoryGenerator;

use crate::error::Result;
use crate::types::{BrandBrief, CandidateName, GenerationConfig, LlmConfig};
use async_trait::async_trait;

/// One system + user prompt exchange with a model
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Core trait for all LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the raw text reply
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Generate a batch of candidate brand names
    async fn generate_names(&self, brief: &BrandBrief, config: &GenerationConfig) -> Result<Vec<CandidateName>> {
        let request = CompletionRequest {
            system: providers::SYSTEM_PROMPT.to_string(),
            prompt: providers::build_naming_prompt(brief, config),
            temperature: config.temperature,
            max_tokens: providers::token_budget(config.count),
        };
        let reply = self.complete(&request).await?;
        providers::parse_candidate_names(&reply, config)
    }

    /// Get provider name
    fn name(&self) -> &'static str;

    /// Get model name being used
    fn model(&self) -> &str;

    /// Check if provider is configured and ready
    fn is_ready(&self) -> bool;
}

/// Get available LLM providers
pub fn available_providers() -> Vec<&'static str> {
    vec!["openai", "anthropic", "ollama"]
}

/// Create an LLM provider from configuration
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn LlmProvider>> {
    match config.provider.as_str() {
        "openai" => Ok(Box::new(providers::OpenAiProvider::new(config)?)),
        "anthropic" => Ok(Box::new(providers::AnthropicProvider::new(config)?)),
        "ollama" => Ok(Box::new(providers::OllamaProvider::new(config)?)),
        _ => Err(crate::error::BrandForgeError::config(format!(
            "Unsupported LLM provider: {}. Supported providers: {}",
            config.provider,
            available_providers().join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_rejected() {
        let config = LlmConfig {
            provider: "mistral".to_string(),
            ..LlmConfig::default()
        };
        assert!(create_provider(&config).is_err());
    }

    #[test]
    fn test_openai_requires_key() {
        assert!(create_provider(&LlmConfig::default()).is_err());
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = LlmConfig {
            provider: "ollama".to_string(),
            model: "llama3".to_string(),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert!(provider.is_ready());
        assert_eq!(provider.model(), "llama3");
    }
}
