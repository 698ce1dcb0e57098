//! The Generate → Select → Validate → Decide loop
//!
//! The machine never reads input itself. [`Workflow::advance`] runs states
//! that need no user input and stops at the next prompt;
//! [`Workflow::respond`] feeds the answer back. [`Workflow::run`] ties both
//! to a [`Prompter`].

use crate::error::{BrandForgeError, Result};
use crate::session::{SessionEvent, SessionSink};
use crate::types::{BrandBrief, CandidateName, GenerationConfig, WorkflowConfig};
use crate::validation::{ValidationCoordinator, ValidationProgress, ValidationReport};
use crate::workflow::selection::{parse_decision, parse_selection, Decision, SelectionInput};
use crate::workflow::NameSource;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Session state carried across iterations.
///
/// The brief is set once and only readable afterwards.
#[derive(Debug, Clone)]
pub struct SessionContext {
    brief: BrandBrief,
    iteration: u32,
    batch: Vec<CandidateName>,
    seen_names: Vec<String>,
}

impl SessionContext {
    pub fn new(brief: BrandBrief) -> Self {
        Self {
            brief,
            iteration: 0,
            batch: Vec::new(),
            seen_names: Vec::new(),
        }
    }

    pub fn brief(&self) -> &BrandBrief {
        &self.brief
    }

    /// Number of `Generate` re-entries so far
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn batch(&self) -> &[CandidateName] {
        &self.batch
    }

    fn replace_batch(&mut self, batch: Vec<CandidateName>) {
        self.seen_names.extend(batch.iter().map(|c| c.brand_name.clone()));
        self.batch = batch;
    }
}

#[derive(Debug, Clone)]
pub enum WorkflowState {
    Generate,
    Select,
    Validate { selection: Vec<CandidateName> },
    Decide { report: ValidationReport },
    Accepted { report: ValidationReport, warning: Option<String> },
    Aborted { reason: String },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Generate => "generate",
            WorkflowState::Select => "select",
            WorkflowState::Validate { .. } => "validate",
            WorkflowState::Decide { .. } => "decide",
            WorkflowState::Accepted { .. } => "accepted",
            WorkflowState::Aborted { .. } => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Accepted { .. } | WorkflowState::Aborted { .. })
    }
}

/// What the machine needs from the user next
#[derive(Debug, Clone)]
pub enum PromptRequest {
    Select {
        batch: Vec<CandidateName>,
        min: usize,
        max: usize,
        iteration: u32,
        can_regenerate: bool,
    },
    Decide {
        report: ValidationReport,
        iteration: u32,
        can_regenerate: bool,
    },
}

/// The user's raw answer to a [`PromptRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptResponse {
    pub input: String,
}

impl From<&str> for PromptResponse {
    fn from(input: &str) -> Self {
        Self { input: input.to_string() }
    }
}

impl From<String> for PromptResponse {
    fn from(input: String) -> Self {
        Self { input }
    }
}

/// Source of user answers: a terminal, a script, an API
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask for an answer. `Err(Cancelled)` aborts the workflow.
    async fn prompt(&self, request: &PromptRequest) -> Result<PromptResponse>;

    /// Called when an answer was rejected; the same request follows
    fn on_invalid_input(&self, _error: &BrandForgeError) {}
}

/// Terminal result of a workflow
#[derive(Debug, Clone)]
pub enum WorkflowOutcome {
    Accepted { report: ValidationReport, warning: Option<String> },
    Aborted { reason: String },
}

/// Interactive brand naming session
pub struct Workflow {
    config: WorkflowConfig,
    generation: GenerationConfig,
    context: SessionContext,
    state: WorkflowState,
    generator: Arc<dyn NameSource>,
    coordinator: Arc<ValidationCoordinator>,
    sink: Arc<dyn SessionSink>,
    cancel: CancellationToken,
}

impl Workflow {
    pub fn new(
        brief: BrandBrief,
        config: WorkflowConfig,
        generator: Arc<dyn NameSource>,
        coordinator: Arc<ValidationCoordinator>,
        sink: Arc<dyn SessionSink>,
    ) -> Self {
        sink.persist(&SessionEvent::Started { brief: brief.clone() });
        tracing::info!(product = %brief.product_description, "Workflow started");

        let generation = GenerationConfig {
            count: config.batch_size,
            ..GenerationConfig::default()
        };

        Self {
            config,
            generation,
            context: SessionContext::new(brief),
            state: WorkflowState::Generate,
            generator,
            coordinator,
            sink,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token (e.g. wired to Ctrl-C)
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Regeneration is closed once the loop cap is hit or the session was
    /// interrupted
    fn can_regenerate(&self) -> bool {
        self.context.iteration < self.config.max_loop_iterations && !self.cancel.is_cancelled()
    }

    fn transition(&mut self, next: WorkflowState) {
        tracing::info!(
            from = self.state.name(),
            to = next.name(),
            iteration = self.context.iteration,
            "Workflow transition"
        );
        self.state = next;
    }

    /// Run states that need no input until the next prompt.
    ///
    /// Returns `None` once the workflow is terminal. A generation failure is
    /// returned as an error and leaves the machine in `Generate`, so calling
    /// `advance` again retries the step.
    pub async fn advance(&mut self, progress: &dyn ValidationProgress) -> Result<Option<PromptRequest>> {
        loop {
            match &self.state {
                WorkflowState::Generate => self.generate().await?,
                WorkflowState::Select => {
                    return Ok(Some(PromptRequest::Select {
                        batch: self.context.batch.clone(),
                        min: self.config.min_select,
                        max: self.config.max_select,
                        iteration: self.context.iteration,
                        can_regenerate: self.can_regenerate(),
                    }))
                }
                WorkflowState::Validate { selection } => {
                    let selection = selection.clone();
                    let report = self
                        .coordinator
                        .validate_selection(&selection, &self.context.brief, progress, &self.cancel)
                        .await;
                    self.sink.persist(&SessionEvent::Validated {
                        iteration: self.context.iteration,
                        summary: report.summary(),
                    });
                    self.transition(WorkflowState::Decide { report });
                }
                WorkflowState::Decide { report } => {
                    return Ok(Some(PromptRequest::Decide {
                        report: report.clone(),
                        iteration: self.context.iteration,
                        can_regenerate: self.can_regenerate(),
                    }))
                }
                WorkflowState::Accepted { .. } | WorkflowState::Aborted { .. } => return Ok(None),
            }
        }
    }

    async fn generate(&mut self) -> Result<()> {
        let mut request = self.generation.clone();
        request.count = self.config.batch_size;
        request
            .avoid_names
            .extend(self.context.seen_names.iter().cloned());

        let batch = self.generator.generate_names(&self.context.brief, &request).await?;
        if batch.is_empty() {
            return Err(BrandForgeError::generation(self.generator.name(), "No names were generated"));
        }

        self.sink.persist(&SessionEvent::Generated {
            iteration: self.context.iteration,
            names: batch.iter().map(|c| c.brand_name.clone()).collect(),
        });
        tracing::info!(count = batch.len(), iteration = self.context.iteration, "Names generated");

        self.context.replace_batch(batch);
        self.transition(WorkflowState::Select);
        Ok(())
    }

    /// Apply the user's answer to the pending prompt.
    ///
    /// Invalid input is returned as [`BrandForgeError::InvalidInput`] and
    /// leaves the state unchanged.
    pub fn respond(&mut self, input: &str) -> Result<()> {
        match &self.state {
            WorkflowState::Select => self.respond_select(input),
            WorkflowState::Decide { .. } => self.respond_decide(input),
            other => Err(BrandForgeError::internal(format!(
                "No prompt pending in state '{}'",
                other.name()
            ))),
        }
    }

    fn respond_select(&mut self, input: &str) -> Result<()> {
        let batch_len = self.context.batch.len();
        match parse_selection(input, batch_len, self.config.min_select, self.config.max_select)? {
            SelectionInput::All => {
                self.select(self.context.batch.clone());
                Ok(())
            }
            SelectionInput::Indices(indices) => {
                let selection = indices.iter().map(|&i| self.context.batch[i].clone()).collect();
                self.select(selection);
                Ok(())
            }
            SelectionInput::Regenerate => {
                if !self.can_regenerate() {
                    return Err(BrandForgeError::invalid_input(
                        "Regeneration is no longer available; select names from this batch",
                    ));
                }
                self.regenerate();
                Ok(())
            }
            SelectionInput::Abort => {
                self.abort("aborted at selection");
                Ok(())
            }
        }
    }

    fn select(&mut self, selection: Vec<CandidateName>) {
        self.sink.persist(&SessionEvent::Selected {
            iteration: self.context.iteration,
            names: selection.iter().map(|c| c.brand_name.clone()).collect(),
        });
        self.transition(WorkflowState::Validate { selection });
    }

    fn respond_decide(&mut self, input: &str) -> Result<()> {
        match parse_decision(input)? {
            Decision::Accept => self.accept(None),
            Decision::Regenerate if self.can_regenerate() => self.regenerate(),
            Decision::Regenerate => {
                let warning = if self.cancel.is_cancelled() {
                    "Validation was interrupted; accepting partial results".to_string()
                } else {
                    format!(
                        "Stopped after {} regenerations; accepting the latest results",
                        self.config.max_loop_iterations
                    )
                };
                tracing::warn!(iteration = self.context.iteration, "Regeneration limit reached");
                self.accept(Some(warning));
            }
            Decision::Abort => self.abort("aborted at decision"),
        }
        Ok(())
    }

    fn regenerate(&mut self) {
        self.context.iteration += 1;
        self.sink.persist(&SessionEvent::Regenerated {
            iteration: self.context.iteration,
        });
        self.transition(WorkflowState::Generate);
    }

    fn accept(&mut self, warning: Option<String>) {
        let WorkflowState::Decide { report } = &self.state else {
            return;
        };
        let report = report.clone();

        self.sink.persist(&SessionEvent::Accepted {
            iteration: self.context.iteration,
            warning: warning.clone(),
        });
        self.transition(WorkflowState::Accepted { report, warning });
    }

    /// Move to `Aborted` from any non-terminal state
    pub fn abort(&mut self, reason: &str) {
        if self.state.is_terminal() {
            return;
        }
        self.cancel.cancel();
        self.sink.persist(&SessionEvent::Aborted {
            iteration: self.context.iteration,
            reason: reason.to_string(),
        });
        self.transition(WorkflowState::Aborted {
            reason: reason.to_string(),
        });
    }

    /// Drive the workflow to a terminal state.
    ///
    /// Rejected answers are reported to the prompter and asked again. A
    /// cancelled prompt aborts. Generation errors are returned; the machine
    /// stays in `Generate` and `run` can be called again to retry.
    pub async fn run(
        &mut self,
        prompter: &dyn Prompter,
        progress: &dyn ValidationProgress,
    ) -> Result<WorkflowOutcome> {
        while let Some(request) = self.advance(progress).await? {
            loop {
                let response = match prompter.prompt(&request).await {
                    Ok(response) => response,
                    Err(BrandForgeError::Cancelled) => {
                        self.abort("cancelled by user");
                        break;
                    }
                    Err(e) => return Err(e),
                };

                match self.respond(&response.input) {
                    Ok(()) => break,
                    Err(e) if e.is_recoverable_input() => prompter.on_invalid_input(&e),
                    Err(e) => return Err(e),
                }
            }
        }

        match &self.state {
            WorkflowState::Accepted { report, warning } => Ok(WorkflowOutcome::Accepted {
                report: report.clone(),
                warning: warning.clone(),
            }),
            WorkflowState::Aborted { reason } => Ok(WorkflowOutcome::Aborted { reason: reason.clone() }),
            other => Err(BrandForgeError::internal(format!(
                "Workflow stopped in non-terminal state '{}'",
                other.name()
            ))),
        }
    }
}
