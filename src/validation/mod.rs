//! Selection validation: per-name records and the aggregated report

pub mod coordinator;
pub mod report;
pub mod verdict;

pub use coordinator::{NoProgress, ValidationCoordinator, ValidationProgress};
pub use report::{ReportSummary, ValidationRecord, ValidationReport};
pub use verdict::{Verdict, VerdictStatus};
