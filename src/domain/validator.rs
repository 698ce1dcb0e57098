//! Domain validation for one brand name
//!
//! Consults the shared result cache first, fans the misses out to the
//! availability probe under a concurrency limit, records fresh observations
//! back into the cache, and derives prefix alternatives when every base
//! variant is unavailable.

use crate::domain::probe::{ProbeOutcome, ProbePolicy};
use crate::domain::variants::{generate_variants, normalize_base_name, DomainVariant};
use crate::domain::{AvailabilityProbe, ResultCache};
use crate::error::Result;
use crate::types::{Availability, CheckConfig, Confidence, DomainCheck, DomainReport, MetricsSnapshot, ProbeMetrics};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Validates all domain variants of a brand name
pub struct DomainValidator {
    config: CheckConfig,
    probe: Arc<dyn AvailabilityProbe>,
    cache: Arc<ResultCache>,
    policy: ProbePolicy,
    semaphore: Semaphore,
    metrics: Arc<ProbeMetrics>,
}

impl DomainValidator {
    /// Create a validator around an injected probe and cache
    pub fn new(probe: Arc<dyn AvailabilityProbe>, cache: Arc<ResultCache>, config: CheckConfig) -> Self {
        let policy = ProbePolicy::from_config(&config);
        let semaphore = Semaphore::new(config.concurrent_checks.max(1));

        tracing::debug!(
            probe = probe.name(),
            concurrent_checks = config.concurrent_checks,
            cache_ttl_secs = cache.ttl().as_secs(),
            "Domain validator initialized"
        );

        Self {
            config,
            probe,
            cache,
            policy,
            semaphore,
            metrics: Arc::new(ProbeMetrics::new()),
        }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Validate a name with the configured suffixes (and prefixes, when
    /// `include_prefixes` is set)
    pub async fn validate_name(&self, name: &str, cancel: &CancellationToken) -> Result<DomainReport> {
        let prefixes = self.config.include_prefixes.then(|| self.config.prefixes.as_slice());
        self.validate(name, &self.config.suffixes, prefixes, cancel).await
    }

    /// Validate every variant of `name`.
    ///
    /// The report holds exactly one check per generated variant, in variant
    /// order. Fails only when the variants cannot be generated; individual
    /// probe failures are folded into the checks.
    pub async fn validate(
        &self,
        name: &str,
        suffixes: &[String],
        prefixes: Option<&[String]>,
        cancel: &CancellationToken,
    ) -> Result<DomainReport> {
        let start = Instant::now();
        let base_name = normalize_base_name(name)?;
        let variants = generate_variants(&base_name, suffixes, prefixes)?;

        let checks = self.check_variants(&variants, cancel).await;

        let base_checks: Vec<&DomainCheck> = checks
            .iter()
            .zip(variants.iter())
            .filter(|(_, v)| v.is_base())
            .map(|(c, _)| c)
            .collect();
        // Unknown results never count as taken
        let all_taken = !base_checks.is_empty()
            && base_checks.iter().all(|c| c.availability == Availability::Taken);

        let mut alternatives = Vec::new();
        if all_taken && prefixes.is_none() && !cancel.is_cancelled() {
            let alternative_variants: Vec<DomainVariant> = generate_variants(
                &base_name,
                &self.config.alternative_suffixes,
                Some(&self.config.prefixes),
            )?
            .into_iter()
            .filter(|v| !v.is_base())
            .collect();

            tracing::info!(
                name = %base_name,
                count = alternative_variants.len(),
                "All base domains unavailable, checking prefix alternatives"
            );
            alternatives = self.check_variants(&alternative_variants, cancel).await;
        }

        let report = DomainReport {
            base_name,
            checks,
            alternatives,
            error_message: None,
        };

        tracing::info!(
            name = %report.base_name,
            variants = report.checks.len(),
            available = report.available().count(),
            taken = report.taken().count(),
            unknown = report.unknown().count(),
            alternatives = report.alternatives.len(),
            duration_ms = %start.elapsed().as_millis(),
            "Domain validation completed"
        );

        Ok(report)
    }

    /// Resolve a variant batch: cache hits first, then concurrent probes for
    /// the misses. Output order follows `variants`.
    async fn check_variants(&self, variants: &[DomainVariant], cancel: &CancellationToken) -> Vec<DomainCheck> {
        let now = Utc::now();
        let mut slots: Vec<Option<DomainCheck>> = Vec::with_capacity(variants.len());
        let mut pending = Vec::new();

        for (index, variant) in variants.iter().enumerate() {
            match self.cache.get_at(&variant.domain, now) {
                Some(entry) => {
                    self.metrics.increment_cache_hits();
                    slots.push(Some(DomainCheck {
                        domain: entry.domain,
                        availability: entry.availability,
                        confidence: Confidence::Cached,
                        checked_at: entry.recorded_at,
                        error_message: None,
                    }));
                }
                None => {
                    slots.push(None);
                    pending.push((index, variant.domain.as_str()));
                }
            }
        }

        if !pending.is_empty() {
            let stagger = pending.len() > self.config.stagger_threshold;
            tracing::debug!(
                cached = variants.len() - pending.len(),
                probing = pending.len(),
                stagger,
                "Dispatching domain probes"
            );

            let futures = pending.iter().enumerate().map(|(position, &(index, domain))| async move {
                let delay = if stagger {
                    self.config.stagger_delay * position as u32
                } else {
                    std::time::Duration::ZERO
                };
                (index, self.probe_one(domain, delay, cancel).await)
            });

            for (index, check) in join_all(futures).await {
                slots[index] = Some(check);
            }
        }

        slots.into_iter().flatten().collect()
    }

    async fn probe_one(&self, domain: &str, delay: std::time::Duration, cancel: &CancellationToken) -> DomainCheck {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => ProbeOutcome::cancelled(0),
            outcome = async {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                match self.semaphore.acquire().await {
                    Ok(_permit) => self.policy.resolve(self.probe.as_ref(), domain, cancel).await,
                    Err(_) => ProbeOutcome::cancelled(0),
                }
            } => outcome,
        };

        for _ in 0..outcome.attempts {
            self.metrics.increment_probes();
        }
        match outcome.confidence {
            Confidence::AssumedAvailable => self.metrics.increment_fallbacks(),
            Confidence::Unresolved => self.metrics.increment_permanent_failures(),
            Confidence::Cancelled => self.metrics.increment_cancelled(),
            Confidence::Confirmed | Confidence::Cached => {}
        }

        let checked_at = Utc::now();
        if outcome.is_observed() {
            self.cache.put(domain, outcome.availability, checked_at);
        }

        DomainCheck {
            domain: domain.to_string(),
            availability: outcome.availability,
            confidence: outcome.confidence,
            checked_at,
            error_message: outcome.error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrandForgeError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Marks a fixed set of domains taken, everything else available
    struct MockProbe {
        taken: HashSet<String>,
        calls: AtomicUsize,
    }

    impl MockProbe {
        fn taking(domains: &[&str]) -> Self {
            Self {
                taken: domains.iter().map(|d| d.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AvailabilityProbe for MockProbe {
        async fn probe(&self, domain: &str) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(!self.taken.contains(domain))
        }
    }

    struct FlakyProbe;

    #[async_trait]
    impl AvailabilityProbe for FlakyProbe {
        async fn probe(&self, domain: &str) -> Result<bool> {
            Err(BrandForgeError::transient_probe(domain, "rate limited"))
        }
    }

    struct RegistryDownProbe;

    #[async_trait]
    impl AvailabilityProbe for RegistryDownProbe {
        async fn probe(&self, domain: &str) -> Result<bool> {
            Err(BrandForgeError::permanent_probe(domain, "registry refused the query"))
        }
    }

    /// Holds every probe for a while, recording when it arrived and how many
    /// were in flight at once
    struct RecordingProbe {
        started: Instant,
        hold: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        arrivals: Mutex<HashMap<String, Duration>>,
    }

    impl RecordingProbe {
        fn new(hold: Duration) -> Self {
            Self {
                started: Instant::now(),
                hold,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                arrivals: Mutex::new(HashMap::new()),
            }
        }

        fn arrival(&self, domain: &str) -> Duration {
            self.arrivals.lock()[domain]
        }
    }

    #[async_trait]
    impl AvailabilityProbe for RecordingProbe {
        async fn probe(&self, domain: &str) -> Result<bool> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.arrivals.lock().insert(domain.to_string(), self.started.elapsed());

            tokio::time::sleep(self.hold).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    fn fast_config() -> CheckConfig {
        CheckConfig {
            retry_backoff: Duration::from_millis(1),
            stagger_delay: Duration::from_millis(1),
            ..CheckConfig::default()
        }
    }

    fn validator(probe: Arc<dyn AvailabilityProbe>) -> DomainValidator {
        DomainValidator::new(probe, Arc::new(ResultCache::new()), fast_config())
    }

    #[tokio::test]
    async fn test_report_has_one_check_per_variant() {
        let probe = Arc::new(MockProbe::taking(&["mealmind.io", "mealmind.co"]));
        let validator = validator(probe.clone());

        let report = validator.validate_name("mealmind", &CancellationToken::new()).await.unwrap();
        assert_eq!(report.checks.len(), 10);
        assert_eq!(report.available().count(), 8);
        assert_eq!(report.taken().count(), 2);
        assert!(report.alternatives.is_empty());
        assert_eq!(report.checks[0].domain, "mealmind.com");
        assert_eq!(probe.calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_second_validation_hits_cache() {
        let probe = Arc::new(MockProbe::taking(&[]));
        let validator = validator(probe.clone());
        let cancel = CancellationToken::new();

        validator.validate_name("PlateWise", &cancel).await.unwrap();
        let before = validator.metrics().probes_issued;
        let report = validator.validate_name("platewise", &cancel).await.unwrap();

        assert_eq!(validator.metrics().probes_issued, before);
        assert_eq!(validator.metrics().cache_hits, 10);
        assert!(report.checks.iter().all(|c| c.confidence == Confidence::Cached));
    }

    #[tokio::test]
    async fn test_all_taken_derives_alternatives() {
        let taken: Vec<String> = crate::domain::DEFAULT_SUFFIXES
            .iter()
            .map(|s| format!("mealmind.{}", s))
            .chain(std::iter::once("getmealmind.com".to_string()))
            .collect();
        let taken_refs: Vec<&str> = taken.iter().map(String::as_str).collect();
        let probe = Arc::new(MockProbe::taking(&taken_refs));
        let validator = validator(probe.clone());

        let report = validator.validate_name("mealmind", &CancellationToken::new()).await.unwrap();
        assert_eq!(report.taken().count(), 10);
        assert_eq!(report.alternatives.len(), 6);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 16);
        assert_eq!(report.alternatives[0].domain, "getmealmind.com");
        assert!(!report.alternative_suggestions().contains(&"getmealmind.com".to_string()));
        assert!(report.alternative_suggestions().contains(&"trymealmind.com".to_string()));
    }

    #[tokio::test]
    async fn test_no_alternatives_when_prefixes_requested() {
        let probe = Arc::new(MockProbe::taking(&["brand.com"]));
        let validator = validator(probe);
        let suffixes = vec!["com".to_string()];
        let prefixes = vec!["get".to_string()];

        let report = validator
            .validate("brand", &suffixes, Some(&prefixes), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.checks.len(), 2);
        assert!(report.alternatives.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached() {
        let validator = validator(Arc::new(FlakyProbe));
        let suffixes = vec!["com".to_string()];

        let report = validator
            .validate("flaky", &suffixes, None, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.checks[0].availability, Availability::Available);
        assert_eq!(report.checks[0].confidence, Confidence::AssumedAvailable);
        assert!(validator.cache().get("flaky.com").is_none());
        assert_eq!(validator.metrics().fallbacks, 1);
        assert_eq!(validator.metrics().probes_issued, 3);
    }

    #[tokio::test]
    async fn test_cancelled_validation_returns_complete_shape() {
        let validator = validator(Arc::new(MockProbe::taking(&[])));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = validator.validate_name("mealmind", &cancel).await.unwrap();
        assert_eq!(report.checks.len(), 10);
        assert!(report.checks.iter().all(|c| c.confidence == Confidence::Cancelled));
        assert!(report.alternatives.is_empty());
        assert!(validator.cache().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_name_is_rejected() {
        let validator = validator(Arc::new(MockProbe::taking(&[])));
        let err = validator.validate_name("!!!", &CancellationToken::new()).await.unwrap_err();
        assert!(err.is_recoverable_input());
    }

    #[tokio::test]
    async fn test_shared_cache_between_validators() {
        let cache = Arc::new(ResultCache::new());
        let first_probe = Arc::new(MockProbe::taking(&[]));
        let second_probe = Arc::new(MockProbe::taking(&[]));
        let first = DomainValidator::new(first_probe, cache.clone(), fast_config());
        let second = DomainValidator::new(second_probe.clone(), cache, fast_config());

        first.validate_name("nutrinest", &CancellationToken::new()).await.unwrap();
        second.validate_name("nutrinest", &CancellationToken::new()).await.unwrap();
        assert_eq!(second_probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_base_results_do_not_derive_alternatives() {
        let validator = validator(Arc::new(RegistryDownProbe));

        let report = validator.validate_name("mealmind", &CancellationToken::new()).await.unwrap();
        assert_eq!(report.unknown().count(), 10);
        assert_eq!(report.taken().count(), 0);
        assert!(report.alternatives.is_empty());
        assert_eq!(validator.metrics().probes_issued, 10);
        assert_eq!(validator.metrics().permanent_failures, 10);
    }

    #[tokio::test]
    async fn test_mixed_taken_and_unknown_do_not_derive_alternatives() {
        struct HalfDown;

        #[async_trait]
        impl AvailabilityProbe for HalfDown {
            async fn probe(&self, domain: &str) -> Result<bool> {
                if domain.ends_with(".com") {
                    Err(BrandForgeError::permanent_probe(domain, "no registry"))
                } else {
                    Ok(false)
                }
            }
        }

        let report = validator(Arc::new(HalfDown))
            .validate_name("mealmind", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.taken().count(), 9);
        assert!(report.alternatives.is_empty());
    }

    #[tokio::test]
    async fn test_large_batches_are_staggered() {
        let probe = Arc::new(RecordingProbe::new(Duration::ZERO));
        let step = Duration::from_millis(3);
        let config = CheckConfig {
            include_prefixes: true,
            stagger_delay: step,
            ..fast_config()
        };
        let validator = DomainValidator::new(probe.clone(), Arc::new(ResultCache::new()), config);

        let report = validator.validate_name("platewise", &CancellationToken::new()).await.unwrap();
        assert_eq!(report.checks.len(), 70);

        for (position, check) in report.checks.iter().enumerate() {
            let arrived = probe.arrival(&check.domain);
            assert!(
                arrived >= step * position as u32,
                "{} arrived after {:?}, expected at least {:?}",
                check.domain,
                arrived,
                step * position as u32
            );
        }
    }

    #[tokio::test]
    async fn test_batches_at_threshold_are_not_staggered() {
        let probe = Arc::new(RecordingProbe::new(Duration::ZERO));
        let config = CheckConfig {
            stagger_delay: Duration::from_secs(1),
            ..fast_config()
        };
        let validator = DomainValidator::new(probe.clone(), Arc::new(ResultCache::new()), config);

        let report = validator.validate_name("platewise", &CancellationToken::new()).await.unwrap();
        assert_eq!(report.checks.len(), validator.config().stagger_threshold);

        for check in &report.checks {
            assert!(probe.arrival(&check.domain) < Duration::from_millis(500));
        }
    }

    #[tokio::test]
    async fn test_in_flight_checks_respect_concurrency_limit() {
        let probe = Arc::new(RecordingProbe::new(Duration::from_millis(5)));
        let config = CheckConfig {
            include_prefixes: true,
            concurrent_checks: 4,
            stagger_delay: Duration::ZERO,
            ..fast_config()
        };
        let validator = DomainValidator::new(probe.clone(), Arc::new(ResultCache::new()), config);

        let report = validator.validate_name("nutrinest", &CancellationToken::new()).await.unwrap();
        assert_eq!(report.checks.len(), 70);
        assert_eq!(probe.arrivals.lock().len(), 70);
        assert_eq!(probe.peak.load(Ordering::SeqCst), 4);
        assert_eq!(probe.in_flight.load(Ordering::SeqCst), 0);
    }
}
