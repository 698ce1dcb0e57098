//! In-memory collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use brand_forge::{
    domain::{AvailabilityProbe, DomainValidator, ResultCache},
    seo::{HeuristicSeoOptimizer, SeoOptimizer},
    session::{SessionEvent, SessionSink},
    trademark::{TrademarkAssessor, TrademarkStatusService},
    types::{BrandBrief, CandidateName, CheckConfig, GenerationConfig, SeoResult},
    validation::ValidationCoordinator,
    workflow::{NameSource, PromptRequest, PromptResponse, Prompter},
    BrandForgeError, Result,
};
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Scripted registry: listed domains are taken or flaky, the rest available
#[derive(Default)]
pub struct ScriptedProbe {
    taken: HashSet<String>,
    flaky: HashSet<String>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn taking(mut self, domains: &[&str]) -> Self {
        self.taken.extend(domains.iter().map(|d| d.to_string()));
        self
    }

    /// Domains whose lookups always fail transiently
    pub fn flaky(mut self, domains: &[&str]) -> Self {
        self.flaky.extend(domains.iter().map(|d| d.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvailabilityProbe for ScriptedProbe {
    async fn probe(&self, domain: &str) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.flaky.contains(domain) {
            return Err(BrandForgeError::transient_probe(domain, "registry throttled"));
        }
        Ok(!self.taken.contains(domain))
    }
}

/// Registry that never answers within a test's patience
pub struct StalledProbe;

#[async_trait]
impl AvailabilityProbe for StalledProbe {
    async fn probe(&self, _domain: &str) -> Result<bool> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(true)
    }
}

/// Check config with the default suffixes and near-zero delays
pub fn fast_check_config() -> CheckConfig {
    CheckConfig {
        retry_backoff: Duration::from_millis(1),
        stagger_delay: Duration::from_millis(1),
        ..CheckConfig::default()
    }
}

pub fn validator(probe: Arc<dyn AvailabilityProbe>) -> DomainValidator {
    DomainValidator::new(probe, Arc::new(ResultCache::new()), fast_check_config())
}

pub fn coordinator(probe: Arc<dyn AvailabilityProbe>) -> ValidationCoordinator {
    ValidationCoordinator::new(
        validator(probe),
        TrademarkAssessor::simulated(),
        Arc::new(HeuristicSeoOptimizer::new()),
    )
}

pub fn brief() -> BrandBrief {
    BrandBrief::new(
        "AI meal planner that builds weekly menus",
        "busy parents",
        "playful",
        "food",
    )
}

/// Produces `batch_size` distinct names per call, optionally failing the
/// first calls
pub struct BatchSource {
    calls: AtomicUsize,
    fail_first: usize,
    briefs: Mutex<Vec<BrandBrief>>,
    avoid_lists: Mutex<Vec<Vec<String>>>,
}

impl BatchSource {
    pub fn new() -> Self {
        Self::failing_first(0)
    }

    pub fn failing_first(fail_first: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_first,
            briefs: Mutex::new(Vec::new()),
            avoid_lists: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Brief received on every call
    pub fn briefs(&self) -> Vec<BrandBrief> {
        self.briefs.lock().clone()
    }

    pub fn avoid_lists(&self) -> Vec<Vec<String>> {
        self.avoid_lists.lock().clone()
    }
}

#[async_trait]
impl NameSource for BatchSource {
    async fn generate_names(&self, brief: &BrandBrief, config: &GenerationConfig) -> Result<Vec<CandidateName>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.briefs.lock().push(brief.clone());
        self.avoid_lists.lock().push(config.avoid_names.clone());

        if call < self.fail_first {
            return Err(BrandForgeError::generation("mock", "model overloaded"));
        }

        Ok((0..config.count)
            .map(|i| CandidateName::bare(format!("Brand{}x{}", call, i)))
            .collect())
    }
}

/// Replays a fixed list of answers; cancels once they run out
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<PromptRequest>>,
    rejected: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
            rejected: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().clone()
    }

    /// Messages of every rejected answer
    pub fn rejected(&self) -> Vec<String> {
        self.rejected.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().len()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn prompt(&self, request: &PromptRequest) -> Result<PromptResponse> {
        self.requests.lock().push(request.clone());
        self.answers
            .lock()
            .pop_front()
            .map(PromptResponse::from)
            .ok_or(BrandForgeError::Cancelled)
    }

    fn on_invalid_input(&self, error: &BrandForgeError) {
        self.rejected.lock().push(error.to_string());
    }
}

/// Keeps every persisted event
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }
}

impl SessionSink for RecordingSink {
    fn persist(&self, event: &SessionEvent) {
        self.events.lock().push(event.clone());
    }
}

pub struct FailingSeo;

#[async_trait]
impl SeoOptimizer for FailingSeo {
    async fn optimize(&self, _name: &str, _brief: &BrandBrief) -> Result<SeoResult> {
        Err(BrandForgeError::seo("keyword service unreachable"))
    }
}

pub struct UnreachableTrademarkService;

#[async_trait]
impl TrademarkStatusService for UnreachableTrademarkService {
    async fn confirm(&self, _name: &str) -> Result<()> {
        Err(BrandForgeError::trademark("connection refused"))
    }
}
