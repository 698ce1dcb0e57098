//! Validation records and the aggregated report

use crate::error::{BrandForgeError, Result};
use crate::types::{CandidateName, DomainReport, SeoOutcome, TrademarkAssessment};
use crate::validation::verdict::{Verdict, VerdictStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything learned about one selected name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub candidate: CandidateName,
    pub domains: DomainReport,
    pub trademark: TrademarkAssessment,
    /// Trademark result fell back to the heuristic after a service failure
    pub trademark_degraded: bool,
    pub seo: SeoOutcome,
    pub verdict: Verdict,
}

impl ValidationRecord {
    pub fn name(&self) -> &str {
        &self.candidate.brand_name
    }

    /// Prefix variants found available when every base variant was taken
    pub fn alternative_suggestions(&self) -> Vec<String> {
        self.domains.alternative_suggestions()
    }
}

/// Short counts for logs and the session log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub names: usize,
    pub clear: usize,
    pub caution: usize,
    pub blocked: usize,
    pub domains_available: usize,
    pub domains_taken: usize,
    pub domains_unknown: usize,
}

/// Result of one validation pass, records in selection order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub records: Vec<ValidationRecord>,
    pub generated_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn new(records: Vec<ValidationRecord>) -> Self {
        Self {
            records,
            generated_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records by descending verdict score; ties keep selection order
    pub fn ranked(&self) -> Vec<&ValidationRecord> {
        let mut ranked: Vec<&ValidationRecord> = self.records.iter().collect();
        ranked.sort_by(|a, b| b.verdict.score.cmp(&a.verdict.score));
        ranked
    }

    /// Records whose verdict is not blocked
    pub fn viable(&self) -> impl Iterator<Item = &ValidationRecord> {
        self.records
            .iter()
            .filter(|r| r.verdict.status != VerdictStatus::Blocked)
    }

    pub fn summary(&self) -> ReportSummary {
        let count = |status: VerdictStatus| self.records.iter().filter(|r| r.verdict.status == status).count();

        ReportSummary {
            names: self.records.len(),
            clear: count(VerdictStatus::Clear),
            caution: count(VerdictStatus::Caution),
            blocked: count(VerdictStatus::Blocked),
            domains_available: self.records.iter().map(|r| r.domains.available().count()).sum(),
            domains_taken: self.records.iter().map(|r| r.domains.taken().count()).sum(),
            domains_unknown: self.records.iter().map(|r| r.domains.unknown().count()).sum(),
        }
    }

    /// Write the report as pretty JSON
    pub fn export_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                BrandForgeError::io(
                    format!("Failed to create report directory: {}", e),
                    Some(parent.display().to_string()),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| {
            BrandForgeError::io(
                format!("Failed to write report: {}", e),
                Some(path.display().to_string()),
            )
        })?;

        tracing::info!(path = %path.display(), records = self.records.len(), "Validation report exported");
        Ok(())
    }

    /// Load a report written by [`ValidationReport::export_json`]
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BrandForgeError::io(
                format!("Failed to read report: {}", e),
                Some(path.display().to_string()),
            )
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
