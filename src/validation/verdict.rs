//! Overall verdict for a validated name

use crate::types::{DomainReport, TrademarkAssessment, TrademarkRisk};
use serde::{Deserialize, Serialize};

/// Suffixes considered premium, in preference order
const PREMIUM_SUFFIXES: &[&str] = &["com", "ai", "io"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Clear,
    Caution,
    Blocked,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictStatus::Clear => write!(f, "clear"),
            VerdictStatus::Caution => write!(f, "caution"),
            VerdictStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// Combined domain and trademark judgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// 0-100
    pub score: u8,
    pub status: VerdictStatus,
    /// First available premium domain (`.com`, `.ai`, `.io`)
    pub best_available: Option<String>,
    pub recommendation: String,
    pub concerns: Vec<String>,
}

impl Verdict {
    pub fn from_checks(domains: &DomainReport, trademark: &TrademarkAssessment) -> Self {
        let available = |suffix: &str| {
            domains
                .base_availability(suffix)
                .map(|a| a.is_available())
                .unwrap_or(false)
        };

        let mut score: i32 = 100;
        if !available("com") {
            score -= 20;
        }
        if !available("ai") && !available("io") {
            score -= 10;
        }
        score -= match trademark.risk {
            TrademarkRisk::High => 40,
            TrademarkRisk::Medium => 20,
            TrademarkRisk::Low => 5,
            TrademarkRisk::Unknown => 10,
        };
        let score = score.clamp(0, 100) as u8;

        let status = match score {
            80..=100 => VerdictStatus::Clear,
            50..=79 => VerdictStatus::Caution,
            _ => VerdictStatus::Blocked,
        };

        let best_available = PREMIUM_SUFFIXES
            .iter()
            .find(|suffix| available(**suffix))
            .map(|suffix| format!(".{}", suffix));

        let recommendation = match (status, &best_available) {
            (VerdictStatus::Clear, Some(best)) => {
                format!("Clear to use: {} domain available with {} trademark risk", best, trademark.risk)
            }
            (VerdictStatus::Clear, None) => "Clear to use".to_string(),
            (VerdictStatus::Caution, None) => "Use with caution: no premium domain available".to_string(),
            (VerdictStatus::Caution, Some(best)) => {
                format!("Use with caution: {} available but trademark concerns exist", best)
            }
            (VerdictStatus::Blocked, _) => {
                "Blocked: trademark risk or domain availability too poor".to_string()
            }
        };

        let mut concerns = Vec::new();
        match best_available.as_deref() {
            None => concerns.push("No premium domains (.com, .ai, .io) available".to_string()),
            Some(".com") => {}
            Some(_) => concerns.push(".com domain not available".to_string()),
        }
        if trademark.risk == TrademarkRisk::High {
            concerns.push("High trademark risk".to_string());
        }
        if trademark.degraded {
            concerns.push("Trademark service unreachable; heuristic estimate only".to_string());
        }
        if domains.low_confidence().next().is_some() {
            concerns.push("Some domain results could not be confirmed".to_string());
        }

        Self {
            score,
            status,
            best_available,
            recommendation,
            concerns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Availability, Confidence, DomainCheck, TrademarkSource};
    use chrono::Utc;

    fn report(availability: &[(&str, Availability)]) -> DomainReport {
        DomainReport {
            base_name: "mealmind".to_string(),
            checks: availability
                .iter()
                .map(|(suffix, availability)| DomainCheck {
                    domain: format!("mealmind.{}", suffix),
                    availability: *availability,
                    confidence: Confidence::Confirmed,
                    checked_at: Utc::now(),
                    error_message: None,
                })
                .collect(),
            alternatives: Vec::new(),
            error_message: None,
        }
    }

    fn trademark(risk: TrademarkRisk) -> TrademarkAssessment {
        TrademarkAssessment {
            risk,
            conflicts: 0,
            source: TrademarkSource::Simulated,
            degraded: false,
            matched_terms: Vec::new(),
            disclaimer: String::new(),
        }
    }

    #[test]
    fn test_clear_verdict() {
        let domains = report(&[("com", Availability::Available), ("io", Availability::Available)]);
        let verdict = Verdict::from_checks(&domains, &trademark(TrademarkRisk::Low));
        assert_eq!(verdict.score, 95);
        assert_eq!(verdict.status, VerdictStatus::Clear);
        assert_eq!(verdict.best_available.as_deref(), Some(".com"));
        assert!(verdict.concerns.is_empty());
    }

    #[test]
    fn test_caution_without_com() {
        let domains = report(&[("com", Availability::Taken), ("ai", Availability::Available)]);
        let verdict = Verdict::from_checks(&domains, &trademark(TrademarkRisk::Medium));
        assert_eq!(verdict.score, 60);
        assert_eq!(verdict.status, VerdictStatus::Caution);
        assert_eq!(verdict.best_available.as_deref(), Some(".ai"));
        assert!(verdict.concerns.contains(&".com domain not available".to_string()));
    }

    #[test]
    fn test_blocked() {
        let domains = report(&[("com", Availability::Taken), ("io", Availability::Taken)]);
        let verdict = Verdict::from_checks(&domains, &trademark(TrademarkRisk::High));
        assert_eq!(verdict.score, 30);
        assert_eq!(verdict.status, VerdictStatus::Blocked);
        assert!(verdict.best_available.is_none());
        assert_eq!(verdict.concerns.len(), 2);
    }
}
