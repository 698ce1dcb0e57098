//! Runs domain, trademark and SEO checks for a selection of names

use crate::domain::DomainValidator;
use crate::seo::SeoOptimizer;
use crate::trademark::TrademarkAssessor;
use crate::types::{BrandBrief, CandidateName, DomainReport, SeoOutcome};
use crate::validation::report::{ValidationRecord, ValidationReport};
use crate::validation::verdict::Verdict;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Progress callbacks while a selection is validated
pub trait ValidationProgress: Send + Sync {
    /// Called before name `index` (1-based) of `total` is validated
    fn on_name_start(&self, index: usize, total: usize, name: &str);

    /// Called once the record for a name is assembled
    fn on_name_complete(&self, _index: usize, _total: usize, _record: &ValidationRecord) {}
}

/// No-op progress for callers that do not display progress
pub struct NoProgress;

impl ValidationProgress for NoProgress {
    fn on_name_start(&self, _index: usize, _total: usize, _name: &str) {}
}

/// Validates selected names one after another
pub struct ValidationCoordinator {
    domains: DomainValidator,
    trademark: TrademarkAssessor,
    seo: Arc<dyn SeoOptimizer>,
}

impl ValidationCoordinator {
    pub fn new(domains: DomainValidator, trademark: TrademarkAssessor, seo: Arc<dyn SeoOptimizer>) -> Self {
        Self { domains, trademark, seo }
    }

    pub fn domain_validator(&self) -> &DomainValidator {
        &self.domains
    }

    /// Validate every name of the selection.
    ///
    /// Returns one record per name in selection order. Per-name failures
    /// are folded into the record; nothing here fails the pass.
    pub async fn validate_selection(
        &self,
        names: &[CandidateName],
        brief: &BrandBrief,
        progress: &dyn ValidationProgress,
        cancel: &CancellationToken,
    ) -> ValidationReport {
        let start = Instant::now();
        let total = names.len();
        let mut records = Vec::with_capacity(total);

        tracing::info!(names = total, "Validating selection");

        for (i, candidate) in names.iter().enumerate() {
            progress.on_name_start(i + 1, total, &candidate.brand_name);
            let record = self.validate_one(candidate, brief, cancel).await;
            progress.on_name_complete(i + 1, total, &record);
            records.push(record);
        }

        let report = ValidationReport::new(records);
        let summary = report.summary();
        tracing::info!(
            names = summary.names,
            clear = summary.clear,
            caution = summary.caution,
            blocked = summary.blocked,
            cancelled = cancel.is_cancelled(),
            duration_ms = %start.elapsed().as_millis(),
            "Selection validated"
        );
        report
    }

    async fn validate_one(
        &self,
        candidate: &CandidateName,
        brief: &BrandBrief,
        cancel: &CancellationToken,
    ) -> ValidationRecord {
        let name = candidate.brand_name.as_str();
        let category = Some(brief.industry.as_str()).filter(|c| !c.trim().is_empty());

        let (domains, trademark, seo) = tokio::join!(
            self.domains.validate_name(name, cancel),
            self.trademark.assess(name, category),
            self.seo.optimize(name, brief),
        );

        let domains = domains.unwrap_or_else(|e| {
            tracing::warn!(name = %name, error = %e, "Domain validation failed");
            DomainReport::failed(name, e.to_string())
        });

        let seo = match seo {
            Ok(result) => SeoOutcome::Optimized(result),
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "SEO optimization failed");
                SeoOutcome::Unknown { reason: e.to_string() }
            }
        };

        let verdict = Verdict::from_checks(&domains, &trademark);
        tracing::debug!(name = %name, score = verdict.score, status = %verdict.status, "Name validated");

        ValidationRecord {
            candidate: candidate.clone(),
            trademark_degraded: trademark.degraded,
            domains,
            trademark,
            seo,
            verdict,
        }
    }
}
