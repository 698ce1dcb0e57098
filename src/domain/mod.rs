//! Domain availability checking module

pub mod cache;
pub mod probe;
pub mod validator;
pub mod variants;

// Re-export main functionality
pub use cache::{CacheEntry, ResultCache};
pub use probe::{ProbeOutcome, ProbePolicy, RegistryProbe};
pub use validator::DomainValidator;
pub use variants::{generate_variants, normalize_base_name, DomainVariant};

use crate::error::Result;
use async_trait::async_trait;

/// A single availability query against a registry.
///
/// Returns `Ok(true)` when the domain can be registered, `Ok(false)` when it
/// is taken. Failures carry a transient or permanent classification (see
/// [`crate::error::BrandForgeError::is_transient`]); retrying is the
/// caller's job.
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    async fn probe(&self, domain: &str) -> Result<bool>;

    /// Short name for logs
    fn name(&self) -> &'static str {
        "probe"
    }
}

/// Suffixes checked for every selected name
pub const DEFAULT_SUFFIXES: &[&str] = &[
    "com", "ai", "io", "so", "app", "co", "is", "me", "net", "to",
];

/// Prefixes used for `getname.com`-style alternatives
pub const DEFAULT_PREFIXES: &[&str] = &["get", "try", "your", "my", "hello", "use"];

/// Parse a user-supplied suffix or prefix list (`".com, io ai"`)
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(&[',', ' ', '\n', '\t'][..])
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
