//! Brand name generator over one or more LLM providers

use crate::error::{BrandForgeError, Result};
use crate::llm::{create_provider, LlmProvider};
use crate::types::{BrandBrief, CandidateName, GenerationConfig, LlmConfig};
use crate::workflow::NameSource;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

/// Name generator with a default provider and ordered fallbacks
#[derive(Clone)]
pub struct NameGenerator {
    /// Registration order is fallback order
    providers: Arc<RwLock<Vec<Arc<dyn LlmProvider>>>>,
    default_provider: Arc<RwLock<Option<String>>>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(Vec::new())),
            default_provider: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a provider built from configuration. The first one added becomes
    /// the default.
    pub fn add_provider(&self, config: &LlmConfig) -> Result<()> {
        let provider = create_provider(config)?;
        self.add(Arc::from(provider));
        Ok(())
    }

    /// Add an already constructed provider
    pub fn add(&self, provider: Arc<dyn LlmProvider>) {
        let name = provider.name().to_string();
        let mut providers = self.providers.write();
        providers.retain(|p| p.name() != name);
        providers.push(provider);

        let mut default = self.default_provider.write();
        if default.is_none() {
            *default = Some(name);
        }
    }

    /// Set default provider if it is registered
    pub fn set_default_provider(&self, provider: &str) {
        if self.has_provider(provider) {
            *self.default_provider.write() = Some(provider.to_string());
        }
    }

    pub fn default_provider(&self) -> Option<String> {
        self.default_provider.read().clone()
    }

    /// Providers in attempt order: default first, then the rest
    fn attempt_order(&self) -> Vec<Arc<dyn LlmProvider>> {
        let default = self.default_provider.read().clone();
        let providers = self.providers.read();
        let mut ordered: Vec<Arc<dyn LlmProvider>> = providers
            .iter()
            .filter(|p| Some(p.name()) == default.as_deref())
            .cloned()
            .collect();
        ordered.extend(
            providers
                .iter()
                .filter(|p| Some(p.name()) != default.as_deref())
                .cloned(),
        );
        ordered
    }

    /// Generate with the default provider, falling back to the others
    pub async fn generate_with_fallback(
        &self,
        brief: &BrandBrief,
        config: &GenerationConfig,
    ) -> Result<Vec<CandidateName>> {
        let overall_start = Instant::now();
        let mut last_error = None;

        for (attempt, provider) in self.attempt_order().into_iter().enumerate() {
            let start = Instant::now();
            match provider.generate_names(brief, config).await {
                Ok(names) if !names.is_empty() => {
                    tracing::info!(
                        provider = provider.name(),
                        model = provider.model(),
                        names_count = names.len(),
                        fallback_used = attempt > 0,
                        duration_ms = %overall_start.elapsed().as_millis(),
                        "Name generation completed"
                    );
                    return Ok(names);
                }
                Ok(_) => {
                    tracing::warn!(provider = provider.name(), "Provider returned no names");
                    last_error = Some(BrandForgeError::generation(provider.name(), "No names were generated"));
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %e,
                        duration_ms = %start.elapsed().as_millis(),
                        "Name generation failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(e @ BrandForgeError::Generation { .. }) => e,
            Some(e) => BrandForgeError::generation("llm", e.to_string()),
            None => BrandForgeError::generation("llm", "No providers configured"),
        })
    }

    /// Registered providers in attempt order
    pub fn providers(&self) -> Vec<Arc<dyn LlmProvider>> {
        self.attempt_order()
    }

    pub fn available_providers(&self) -> Vec<String> {
        self.providers.read().iter().map(|p| p.name().to_string()).collect()
    }

    pub fn has_provider(&self, provider: &str) -> bool {
        self.providers.read().iter().any(|p| p.name() == provider)
    }

    pub fn is_ready(&self) -> bool {
        self.providers.read().iter().any(|p| p.is_ready())
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameSource for NameGenerator {
    async fn generate_names(&self, brief: &BrandBrief, config: &GenerationConfig) -> Result<Vec<CandidateName>> {
        self.generate_with_fallback(brief, config).await
    }

    fn name(&self) -> &str {
        "llm"
    }
}
