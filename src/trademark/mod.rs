//! Trademark risk assessment
//!
//! The assessor always runs a local heuristic. With the enhanced strategy it
//! also calls the trademark status service; that call only confirms the
//! service answered and never changes the risk level. When it fails the
//! assessment is marked `degraded` and reported as simulated.

use crate::error::{BrandForgeError, Result};
use crate::types::{TrademarkAssessment, TrademarkRisk, TrademarkSource, TrademarkStrategy};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

const SIMULATED_DISCLAIMER: &str = "Simulated risk estimate, not a legal trademark search";
const ENHANCED_DISCLAIMER: &str =
    "Heuristic risk estimate; trademark office reachable but not searched by name";

const DEFAULT_TSDR_URL: &str = "https://tsdrapi.uspto.gov";
/// Case used to confirm the status API answers (APPLE, serial 73222525)
const REFERENCE_SERIAL: &str = "73222525";

/// Words common enough in registered marks to raise risk on their own
const GENERIC_TERMS: &[&str] = &[
    "smart", "pro", "hub", "app", "cloud", "go", "one", "box", "lab", "max", "prime", "plus", "net",
    "link", "easy", "best", "quick", "true", "bright", "fresh", "star", "zen", "nova",
];

fn category_terms(category: &str) -> &'static [&'static str] {
    match category.trim().to_lowercase().as_str() {
        "food" | "food tech" | "foodtech" | "restaurant" | "nutrition" => {
            &["meal", "food", "chef", "eat", "kitchen", "taste", "plate", "nutri", "cook", "dish"]
        }
        "tech" | "technology" | "software" | "saas" | "ai" => {
            &["tech", "data", "code", "soft", "byte", "bit", "ai", "logic", "sync", "stack"]
        }
        "finance" | "fintech" | "banking" => &["pay", "cash", "fund", "coin", "bank", "money", "wallet", "credit"],
        "health" | "healthcare" | "wellness" | "fitness" => &["health", "fit", "care", "med", "well", "vita", "life"],
        "retail" | "ecommerce" | "e-commerce" | "fashion" => &["shop", "store", "cart", "buy", "deal", "mart", "style"],
        "education" | "edtech" => &["learn", "study", "edu", "school", "class", "tutor", "skill"],
        _ => &[],
    }
}

/// External trademark status service used in enhanced mode
#[async_trait]
pub trait TrademarkStatusService: Send + Sync {
    /// Confirm the service is reachable for an assessment of `name`
    async fn confirm(&self, name: &str) -> Result<()>;

    fn name(&self) -> &'static str {
        "trademark-service"
    }
}

/// USPTO TSDR case status client
pub struct UsptoTsdrClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl UsptoTsdrClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("brand-forge/0.1.0")
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to create TSDR HTTP client: {}. Using default.", e);
                Client::new()
            });

        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_TSDR_URL.to_string()),
        }
    }

    fn case_status_url(&self, serial: &str) -> String {
        format!(
            "{}/ts/cd/casestatus/sn{}/info.json",
            self.base_url.trim_end_matches('/'),
            serial
        )
    }
}

#[async_trait]
impl TrademarkStatusService for UsptoTsdrClient {
    async fn confirm(&self, name: &str) -> Result<()> {
        let url = self.case_status_url(REFERENCE_SERIAL);
        let response = self
            .client
            .get(&url)
            .header("USPTO-API-KEY", &self.api_key)
            .send()
            .await
            .map_err(|e| BrandForgeError::trademark(format!("TSDR request failed: {}", e)))?;

        let status = response.status().as_u16();
        match status {
            // 404 still means the API accepted the key
            200..=299 | 404 => {
                tracing::debug!(name = %name, status, "Trademark status service confirmed");
                Ok(())
            }
            401 | 403 => Err(BrandForgeError::trademark("TSDR rejected the API key")),
            _ => Err(BrandForgeError::trademark(format!("TSDR answered {}", status))),
        }
    }

    fn name(&self) -> &'static str {
        "uspto-tsdr"
    }
}

/// Trademark risk assessor configured once per session
pub struct TrademarkAssessor {
    service: Option<Arc<dyn TrademarkStatusService>>,
}

impl TrademarkAssessor {
    /// Heuristic-only assessor
    pub fn simulated() -> Self {
        Self { service: None }
    }

    /// Build the assessor for a strategy
    pub fn from_strategy(strategy: &TrademarkStrategy, timeout: Duration) -> Self {
        match strategy {
            TrademarkStrategy::Simulated => Self::simulated(),
            TrademarkStrategy::Enhanced { api_key, base_url } => {
                Self::with_service(Arc::new(UsptoTsdrClient::new(api_key.clone(), base_url.clone(), timeout)))
            }
        }
    }

    /// Enhanced assessor around an injected service
    pub fn with_service(service: Arc<dyn TrademarkStatusService>) -> Self {
        Self { service: Some(service) }
    }

    pub fn is_enhanced(&self) -> bool {
        self.service.is_some()
    }

    /// Assess a name. Never fails: an unreachable service degrades the
    /// result to the heuristic.
    pub async fn assess(&self, name: &str, category: Option<&str>) -> TrademarkAssessment {
        let mut assessment = heuristic_assessment(name, category);

        let Some(service) = &self.service else {
            return assessment;
        };

        match service.confirm(name).await {
            Ok(()) => {
                assessment.source = TrademarkSource::External;
                assessment.disclaimer = ENHANCED_DISCLAIMER.to_string();
            }
            Err(e) => {
                tracing::warn!(
                    name = %name,
                    service = service.name(),
                    error = %e,
                    "Trademark service unavailable, using heuristic only"
                );
                assessment.degraded = true;
            }
        }

        assessment
    }
}

impl Default for TrademarkAssessor {
    fn default() -> Self {
        Self::simulated()
    }
}

/// Deterministic local estimate.
///
/// Short names and names built from common or category words score higher.
fn heuristic_assessment(name: &str, category: Option<&str>) -> TrademarkAssessment {
    let normalized: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if normalized.is_empty() {
        return TrademarkAssessment {
            risk: TrademarkRisk::Unknown,
            conflicts: 0,
            source: TrademarkSource::Simulated,
            degraded: false,
            matched_terms: Vec::new(),
            disclaimer: SIMULATED_DISCLAIMER.to_string(),
        };
    }

    let mut points = match normalized.len() {
        0..=4 => 2,
        5..=6 => 1,
        _ => 0,
    };

    let mut matched_terms = Vec::new();
    for term in GENERIC_TERMS {
        if normalized.contains(term) {
            matched_terms.push(term.to_string());
            points += 1;
        }
    }
    for term in category.map(category_terms).unwrap_or_default() {
        if normalized.contains(term) && !matched_terms.iter().any(|t| t.as_str() == *term) {
            matched_terms.push(term.to_string());
            points += 2;
        }
    }

    let risk = match points {
        0 => TrademarkRisk::Low,
        1..=2 => TrademarkRisk::Medium,
        _ => TrademarkRisk::High,
    };

    TrademarkAssessment {
        risk,
        conflicts: points,
        source: TrademarkSource::Simulated,
        degraded: false,
        matched_terms,
        disclaimer: SIMULATED_DISCLAIMER.to_string(),
    }
}
