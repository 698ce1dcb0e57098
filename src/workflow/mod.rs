//! Interactive naming workflow

pub mod machine;
pub mod selection;

pub use machine::{
    PromptRequest, PromptResponse, Prompter, SessionContext, Workflow, WorkflowOutcome, WorkflowState,
};
pub use selection::{parse_decision, parse_selection, Decision, SelectionInput};

use crate::error::Result;
use crate::types::{BrandBrief, CandidateName, GenerationConfig};
use async_trait::async_trait;

/// Produces a batch of candidate names for a brief
#[async_trait]
pub trait NameSource: Send + Sync {
    async fn generate_names(&self, brief: &BrandBrief, config: &GenerationConfig) -> Result<Vec<CandidateName>>;

    /// Short name for errors and logs
    fn name(&self) -> &str {
        "generator"
    }
}
