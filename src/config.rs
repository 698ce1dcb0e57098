//! Settings loaded from the environment

use crate::domain::{parse_list, variants::normalize_suffix};
use crate::error::{BrandForgeError, Result};
use crate::types::{CheckConfig, GenerationConfig, LlmConfig, TrademarkStrategy, WorkflowConfig};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Complete runtime configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub check: CheckConfig,
    pub workflow: WorkflowConfig,
    pub generation: GenerationConfig,
    /// Configured providers, in preference order
    pub llm: Vec<LlmConfig>,
    pub trademark: TrademarkStrategy,
    pub session_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check: CheckConfig::default(),
            workflow: WorkflowConfig::default(),
            generation: GenerationConfig::default(),
            llm: Vec::new(),
            trademark: TrademarkStrategy::Simulated,
            session_dir: PathBuf::from(".sessions"),
        }
    }
}

impl Settings {
    /// Read settings from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Settings::default();

        if let Some(raw) = get("BRAND_FORGE_SUFFIXES") {
            let suffixes = parse_list(&raw)
                .iter()
                .map(|s| normalize_suffix(s))
                .collect::<Result<Vec<_>>>()
                .map_err(|e| crate::config_error!("BRAND_FORGE_SUFFIXES: {}", e))?;
            if !suffixes.is_empty() {
                settings.check.suffixes = suffixes;
            }
        }
        if let Some(raw) = get("BRAND_FORGE_PREFIXES") {
            let prefixes = parse_list(&raw);
            if !prefixes.is_empty() {
                settings.check.prefixes = prefixes;
            }
        }

        let check = &mut settings.check;
        check.include_prefixes = flag(&get, "BRAND_FORGE_INCLUDE_PREFIXES", check.include_prefixes)?;
        check.cache_ttl = Duration::from_secs(number(&get, "BRAND_FORGE_CACHE_TTL_SECS", 300)?);
        check.concurrent_checks = number(&get, "BRAND_FORGE_PROBE_CONCURRENCY", check.concurrent_checks)?;
        check.timeout = Duration::from_secs(number(&get, "BRAND_FORGE_PROBE_TIMEOUT_SECS", 8)?);
        check.retry_attempts = number(&get, "BRAND_FORGE_PROBE_RETRIES", check.retry_attempts)?;
        check.retry_backoff = Duration::from_millis(number(&get, "BRAND_FORGE_RETRY_BACKOFF_MS", 250)?);
        check.stagger_threshold = number(&get, "BRAND_FORGE_STAGGER_THRESHOLD", check.stagger_threshold)?;
        check.stagger_delay = Duration::from_millis(number(&get, "BRAND_FORGE_STAGGER_MS", 50)?);

        let workflow = &mut settings.workflow;
        workflow.batch_size = number(&get, "BRAND_FORGE_BATCH_SIZE", workflow.batch_size)?;
        workflow.min_select = number(&get, "BRAND_FORGE_MIN_SELECT", workflow.min_select)?;
        workflow.max_select = number(&get, "BRAND_FORGE_MAX_SELECT", workflow.max_select)?;
        workflow.max_loop_iterations = number(&get, "BRAND_FORGE_MAX_LOOP_ITERATIONS", workflow.max_loop_iterations)?;
        settings.generation.count = workflow.batch_size;

        if let Some(dir) = get("BRAND_FORGE_SESSION_DIR") {
            settings.session_dir = PathBuf::from(dir);
        }

        settings.trademark = TrademarkStrategy::from_api_key(get("USPTO_API_KEY"));
        settings.llm = llm_configs(&get, settings.generation.temperature);

        settings.validate()?;
        Ok(settings)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        let w = &self.workflow;
        if w.min_select == 0 {
            return Err(BrandForgeError::config("Minimum selection must be at least 1"));
        }
        if w.min_select > w.max_select {
            return Err(crate::config_error!(
                "Minimum selection ({}) exceeds maximum ({})",
                w.min_select, w.max_select
            ));
        }
        if w.batch_size < w.min_select {
            return Err(crate::config_error!(
                "Batch size ({}) is smaller than the minimum selection ({})",
                w.batch_size, w.min_select
            ));
        }
        if self.check.concurrent_checks == 0 {
            return Err(BrandForgeError::config("Probe concurrency must be at least 1"));
        }
        if self.check.suffixes.is_empty() {
            return Err(BrandForgeError::config("At least one domain suffix is required"));
        }
        Ok(())
    }
}

fn number<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| crate::config_error!("{} must be a non-negative integer, got '{}'", key, raw)),
        None => Ok(default),
    }
}

fn flag<G>(get: &G, key: &str, default: bool) -> Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|raw| raw.to_lowercase()) {
        Some(raw) => match raw.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(crate::config_error!("{} must be true or false, got '{}'", key, raw)),
        },
        None => Ok(default),
    }
}

fn llm_configs<G>(get: &G, temperature: f32) -> Vec<LlmConfig>
where
    G: Fn(&str) -> Option<String>,
{
    let mut configs = Vec::new();

    if let Some(api_key) = get("OPENAI_API_KEY") {
        configs.push(LlmConfig {
            provider: "openai".to_string(),
            model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4.1-mini".to_string()),
            api_key,
            base_url: get("OPENAI_BASE_URL"),
            temperature,
        });
    }

    if let Some(api_key) = get("ANTHROPIC_API_KEY") {
        configs.push(LlmConfig {
            provider: "anthropic".to_string(),
            model: get("ANTHROPIC_MODEL").unwrap_or_else(|| "claude-sonnet-4-5".to_string()),
            api_key,
            base_url: get("ANTHROPIC_BASE_URL"),
            temperature,
        });
    }

    if let Some(model) = get("OLLAMA_MODEL") {
        configs.push(LlmConfig {
            provider: "ollama".to_string(),
            model,
            api_key: String::new(),
            base_url: get("OLLAMA_BASE_URL"),
            temperature,
        });
    }

    configs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.check.suffixes.len(), 10);
        assert_eq!(s.check.prefixes.len(), 6);
        assert_eq!(s.check.cache_ttl, Duration::from_secs(300));
        assert_eq!(s.workflow.min_select, 5);
        assert_eq!(s.workflow.max_select, 10);
        assert_eq!(s.workflow.max_loop_iterations, 3);
        assert_eq!(s.trademark, TrademarkStrategy::Simulated);
        assert!(s.llm.is_empty());
        assert!(!s.check.include_prefixes);
    }

    #[test]
    fn test_include_prefixes_flag() {
        assert!(settings(&[("BRAND_FORGE_INCLUDE_PREFIXES", "TRUE")]).unwrap().check.include_prefixes);
        assert!(settings(&[("BRAND_FORGE_INCLUDE_PREFIXES", "1")]).unwrap().check.include_prefixes);
        assert!(!settings(&[("BRAND_FORGE_INCLUDE_PREFIXES", "no")]).unwrap().check.include_prefixes);

        let err = settings(&[("BRAND_FORGE_INCLUDE_PREFIXES", "sometimes")]).unwrap_err();
        assert!(err.to_string().contains("BRAND_FORGE_INCLUDE_PREFIXES"));
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("BRAND_FORGE_SUFFIXES", ".com, .io"),
            ("BRAND_FORGE_CACHE_TTL_SECS", "60"),
            ("BRAND_FORGE_MIN_SELECT", "2"),
            ("USPTO_API_KEY", "secret"),
            ("OLLAMA_MODEL", "llama3"),
        ])
        .unwrap();
        assert_eq!(s.check.suffixes, vec!["com", "io"]);
        assert_eq!(s.check.cache_ttl, Duration::from_secs(60));
        assert_eq!(s.workflow.min_select, 2);
        assert!(matches!(s.trademark, TrademarkStrategy::Enhanced { .. }));
        assert_eq!(s.llm.len(), 1);
        assert_eq!(s.llm[0].provider, "ollama");
    }

    #[test]
    fn test_malformed_number_is_config_error() {
        let err = settings(&[("BRAND_FORGE_CACHE_TTL_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, BrandForgeError::Config { .. }));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(settings(&[("BRAND_FORGE_MIN_SELECT", "12")]).is_err());
    }

    #[test]
    fn test_blank_list_keeps_defaults() {
        let s = settings(&[("BRAND_FORGE_PREFIXES", " , ")]).unwrap();
        assert_eq!(s.check.prefixes.len(), 6);
    }
}
