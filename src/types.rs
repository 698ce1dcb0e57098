//! Core types and structures for brand-forge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::{DEFAULT_PREFIXES, DEFAULT_SUFFIXES};

/// The user's brief. Fixed for the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BrandBrief {
    pub product_description: String,
    pub target_audience: String,
    pub brand_personality: String,
    pub industry: String,
}

impl BrandBrief {
    pub fn new(
        product_description: impl Into<String>,
        target_audience: impl Into<String>,
        brand_personality: impl Into<String>,
        industry: impl Into<String>,
    ) -> Self {
        Self {
            product_description: product_description.into(),
            target_audience: target_audience.into(),
            brand_personality: brand_personality.into(),
            industry: industry.into(),
        }
    }
}

/// A generated brand name with its generation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateName {
    pub brand_name: String,
    pub naming_strategy: String,
    pub rationale: String,
    pub tagline: String,
    pub syllables: u8,
    pub memorable_score: u8,
}

impl CandidateName {
    /// Candidate with only a name; metadata left blank
    pub fn bare(brand_name: impl Into<String>) -> Self {
        let brand_name = brand_name.into();
        Self {
            syllables: estimate_syllables(&brand_name),
            brand_name,
            naming_strategy: String::new(),
            rationale: String::new(),
            tagline: String::new(),
            memorable_score: 0,
        }
    }
}

/// Rough syllable count: number of vowel groups, at least one
pub fn estimate_syllables(name: &str) -> u8 {
    let mut groups = 0u8;
    let mut in_vowel = false;
    for c in name.chars().map(|c| c.to_ascii_lowercase()) {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !in_vowel {
            groups = groups.saturating_add(1);
        }
        in_vowel = vowel;
    }
    groups.max(1)
}

/// Domain availability, tri-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Taken,
    Unknown,
}

impl Availability {
    pub fn from_bool(available: bool) -> Self {
        if available {
            Availability::Available
        } else {
            Availability::Taken
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::Available => write!(f, "available"),
            Availability::Taken => write!(f, "taken"),
            Availability::Unknown => write!(f, "unknown"),
        }
    }
}

/// How much a domain result can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    /// Fresh answer from a registry
    Confirmed,
    /// Served from the result cache
    Cached,
    /// Retries exhausted; shown as available so a viable name is not discarded
    #[serde(rename = "unknown-assumed-available")]
    AssumedAvailable,
    /// Permanent lookup failure
    Unresolved,
    /// Probe was cancelled before it completed
    Cancelled,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Confirmed => write!(f, "confirmed"),
            Confidence::Cached => write!(f, "cached"),
            Confidence::AssumedAvailable => write!(f, "unknown-assumed-available"),
            Confidence::Unresolved => write!(f, "unresolved"),
            Confidence::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Availability result for one domain variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainCheck {
    pub domain: String,
    pub availability: Availability,
    pub confidence: Confidence,
    pub checked_at: DateTime<Utc>,
    pub error_message: Option<String>,
}

impl DomainCheck {
    pub fn is_available(&self) -> bool {
        self.availability.is_available()
    }

    /// Suffix of the variant, without the dot
    pub fn suffix(&self) -> &str {
        self.domain.rsplit('.').next().unwrap_or_default()
    }
}

/// All domain results for one brand name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainReport {
    /// Normalized base name
    pub base_name: String,
    /// One entry per requested variant, in variant order
    pub checks: Vec<DomainCheck>,
    /// Prefix variants probed because every base variant was taken
    pub alternatives: Vec<DomainCheck>,
    /// Set when the name could not be turned into domains at all
    pub error_message: Option<String>,
}

impl DomainReport {
    /// Report for a name that produced no variants
    pub fn failed(name: &str, message: impl Into<String>) -> Self {
        Self {
            base_name: name.to_string(),
            checks: Vec::new(),
            alternatives: Vec::new(),
            error_message: Some(message.into()),
        }
    }

    pub fn available(&self) -> impl Iterator<Item = &DomainCheck> {
        self.checks.iter().filter(|c| c.availability == Availability::Available)
    }

    pub fn taken(&self) -> impl Iterator<Item = &DomainCheck> {
        self.checks.iter().filter(|c| c.availability == Availability::Taken)
    }

    pub fn unknown(&self) -> impl Iterator<Item = &DomainCheck> {
        self.checks.iter().filter(|c| c.availability == Availability::Unknown)
    }

    /// Alternatives found available
    pub fn alternative_suggestions(&self) -> Vec<String> {
        self.alternatives
            .iter()
            .filter(|c| c.is_available())
            .map(|c| c.domain.clone())
            .collect()
    }

    /// Availability of `base_name.suffix`, if it was checked
    pub fn base_availability(&self, suffix: &str) -> Option<Availability> {
        let domain = format!("{}.{}", self.base_name, suffix);
        self.checks
            .iter()
            .find(|c| c.domain == domain)
            .map(|c| c.availability)
    }

    /// Checks with reduced confidence
    pub fn low_confidence(&self) -> impl Iterator<Item = &DomainCheck> {
        self.checks.iter().filter(|c| {
            !matches!(c.confidence, Confidence::Confirmed | Confidence::Cached)
        })
    }
}

/// Trademark risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrademarkRisk {
    Low,
    Medium,
    High,
    Unknown,
}

impl std::fmt::Display for TrademarkRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrademarkRisk::Low => write!(f, "low"),
            TrademarkRisk::Medium => write!(f, "medium"),
            TrademarkRisk::High => write!(f, "high"),
            TrademarkRisk::Unknown => write!(f, "unknown"),
        }
    }
}

/// Where a trademark assessment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrademarkSource {
    Simulated,
    External,
}

impl std::fmt::Display for TrademarkSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrademarkSource::Simulated => write!(f, "simulated"),
            TrademarkSource::External => write!(f, "external"),
        }
    }
}

/// Trademark risk for one name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrademarkAssessment {
    pub risk: TrademarkRisk,
    pub conflicts: u32,
    pub source: TrademarkSource,
    /// External confirmation was configured but failed
    pub degraded: bool,
    /// Common words the heuristic matched
    pub matched_terms: Vec<String>,
    pub disclaimer: String,
}

/// SEO payload from the SEO collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoResult {
    pub seo_score: u8,
    pub meta_title: String,
    pub meta_description: String,
    pub primary_keywords: Vec<String>,
    pub secondary_keywords: Vec<String>,
    pub content_opportunities: Vec<String>,
    pub optimization_tips: Vec<String>,
}

/// SEO field of a validation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SeoOutcome {
    Optimized(SeoResult),
    Unknown { reason: String },
}

impl SeoOutcome {
    pub fn result(&self) -> Option<&SeoResult> {
        match self {
            SeoOutcome::Optimized(result) => Some(result),
            SeoOutcome::Unknown { .. } => None,
        }
    }
}

/// Trademark assessor mode, chosen once at session start
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrademarkStrategy {
    /// Local heuristic only
    #[default]
    Simulated,
    /// Heuristic confirmed against the trademark status API
    Enhanced { api_key: String, base_url: Option<String> },
}

impl TrademarkStrategy {
    /// Enhanced when an API key is present, simulated otherwise
    pub fn from_api_key(api_key: Option<String>) -> Self {
        match api_key.filter(|k| !k.trim().is_empty()) {
            Some(api_key) => TrademarkStrategy::Enhanced { api_key, base_url: None },
            None => TrademarkStrategy::Simulated,
        }
    }
}

/// Configuration for domain checking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub suffixes: Vec<String>,
    pub prefixes: Vec<String>,
    /// Probe prefix variants up front instead of only as alternatives
    pub include_prefixes: bool,
    /// Suffixes used when deriving prefix alternatives
    pub alternative_suffixes: Vec<String>,
    pub concurrent_checks: usize,
    pub timeout: Duration,
    pub enable_rdap: bool,
    pub enable_whois: bool,
    /// Additional attempts after the first transient failure
    pub retry_attempts: usize,
    /// Linear backoff step between attempts
    pub retry_backoff: Duration,
    /// Batches larger than this are staggered
    pub stagger_threshold: usize,
    pub stagger_delay: Duration,
    pub cache_ttl: Duration,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            prefixes: DEFAULT_PREFIXES.iter().map(|s| s.to_string()).collect(),
            include_prefixes: false,
            alternative_suffixes: vec!["com".to_string()],
            concurrent_checks: 10,
            timeout: Duration::from_secs(8),
            enable_rdap: true,
            enable_whois: true,
            retry_attempts: 2,
            retry_backoff: Duration::from_millis(250),
            stagger_threshold: 10,
            stagger_delay: Duration::from_millis(50),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Configuration for the interactive workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub batch_size: usize,
    pub min_select: usize,
    pub max_select: usize,
    pub max_loop_iterations: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            batch_size: 20,
            min_select: 5,
            max_select: 10,
            max_loop_iterations: 3,
        }
    }
}

/// Configuration for one name generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub count: usize,
    pub temperature: f32,
    /// Names from earlier batches the model should not repeat
    pub avoid_names: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            count: 20,
            temperature: 0.8,
            avoid_names: Vec::new(),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4.1-mini".to_string(),
            api_key: String::new(),
            base_url: None,
            temperature: 0.8,
        }
    }
}

/// Counters kept by the domain validator
#[derive(Debug, Default)]
pub struct ProbeMetrics {
    probes_issued: AtomicU64,
    cache_hits: AtomicU64,
    fallbacks: AtomicU64,
    permanent_failures: AtomicU64,
    cancelled: AtomicU64,
}

impl ProbeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_probes(&self) {
        self.probes_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_fallbacks(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_permanent_failures(&self) {
        self.permanent_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            probes_issued: self.probes_issued.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            permanent_failures: self.permanent_failures.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ProbeMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    /// Probe attempts sent to registries (retries included)
    pub probes_issued: u64,
    pub cache_hits: u64,
    pub fallbacks: u64,
    pub permanent_failures: u64,
    pub cancelled: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syllable_estimate() {
        assert_eq!(estimate_syllables("MealMind"), 2);
        assert_eq!(estimate_syllables("Yumora"), 3);
        assert_eq!(estimate_syllables("xkcd"), 1);
    }

    #[test]
    fn test_confidence_serialization() {
        let json = serde_json::to_string(&Confidence::AssumedAvailable).unwrap();
        assert_eq!(json, "\"unknown-assumed-available\"");
        assert_eq!(Confidence::AssumedAvailable.to_string(), "unknown-assumed-available");
    }

    #[test]
    fn test_trademark_strategy_from_key() {
        assert_eq!(TrademarkStrategy::from_api_key(None), TrademarkStrategy::Simulated);
        assert_eq!(TrademarkStrategy::from_api_key(Some("  ".into())), TrademarkStrategy::Simulated);
        assert!(matches!(
            TrademarkStrategy::from_api_key(Some("key".into())),
            TrademarkStrategy::Enhanced { .. }
        ));
    }

    #[test]
    fn test_default_check_config() {
        let config = CheckConfig::default();
        assert_eq!(config.suffixes.len(), 10);
        assert_eq!(config.prefixes.len(), 6);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.retry_attempts, 2);
    }
}
