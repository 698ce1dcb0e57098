//! Brand Forge - AI-assisted brand naming with selective validation
//!
//! Generates candidate brand names, lets the user pick a shortlist, and
//! validates only that shortlist against domain registries, a trademark risk
//! assessor and an SEO optimizer.

pub mod config;
pub mod domain;
pub mod error;
pub mod llm;
pub mod rdap;
pub mod seo;
pub mod session;
pub mod trademark;
pub mod types;
pub mod validation;
pub mod workflow;

// Re-export commonly used types
pub use config::Settings;
pub use error::{BrandForgeError, Result};
pub use types::{
    Availability, BrandBrief, CandidateName, CheckConfig, Confidence, DomainCheck, DomainReport,
    GenerationConfig, LlmConfig, MetricsSnapshot, SeoOutcome, SeoResult, TrademarkAssessment,
    TrademarkRisk, TrademarkSource, TrademarkStrategy, WorkflowConfig,
};

// Re-export main functionality
pub use domain::{AvailabilityProbe, DomainValidator, RegistryProbe, ResultCache};
pub use llm::{story::BrandStory, NameGenerator, StoryGenerator};
pub use seo::{HeuristicSeoOptimizer, SeoOptimizer};
pub use session::{JsonlSessionLog, NullSessionSink, SessionEvent, SessionSink};
pub use trademark::{TrademarkAssessor, TrademarkStatusService};
pub use validation::{ValidationCoordinator, ValidationProgress, ValidationRecord, ValidationReport};
pub use workflow::{NameSource, Prompter, Workflow, WorkflowOutcome, WorkflowState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
