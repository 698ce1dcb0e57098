//! Domain variant generation
//!
//! Turns a brand name into the ordered list of fully-qualified domains to
//! probe: base variants first (`name.suffix`), then prefix variants
//! (`prefixname.suffix`) grouped by prefix.

use crate::error::{BrandForgeError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MAX_LABEL_LEN: usize = 63;

/// One fully-qualified domain candidate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainVariant {
    pub domain: String,
    pub prefix: Option<String>,
    pub suffix: String,
}

impl DomainVariant {
    fn compose(base: &str, prefix: Option<&str>, suffix: &str) -> Result<Self> {
        let label = format!("{}{}", prefix.unwrap_or_default(), base);
        if label.len() > MAX_LABEL_LEN {
            return Err(BrandForgeError::invalid_input(format!(
                "Domain label '{}' too long (max {} characters)",
                label, MAX_LABEL_LEN
            )));
        }

        Ok(Self {
            domain: format!("{}.{}", label, suffix),
            prefix: prefix.map(str::to_string),
            suffix: suffix.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.domain
    }

    /// `name.suffix` without a prefix
    pub fn is_base(&self) -> bool {
        self.prefix.is_none()
    }
}

impl std::fmt::Display for DomainVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.domain)
    }
}

/// Compiled normalization patterns, built once per generation call
struct Patterns {
    non_alphanumeric: Regex,
    suffix_format: Regex,
}

impl Patterns {
    fn new() -> Result<Self> {
        Ok(Self {
            non_alphanumeric: Regex::new(r"[^a-z0-9]+")
                .map_err(|e| crate::internal_error!(e.to_string()))?,
            suffix_format: Regex::new(r"^[a-z]{2,63}$")
                .map_err(|e| crate::internal_error!(e.to_string()))?,
        })
    }

    fn strip(&self, input: &str) -> String {
        self.non_alphanumeric
            .replace_all(&input.trim().to_lowercase(), "")
            .into_owned()
    }

    fn base_name(&self, name: &str) -> Result<String> {
        let normalized = self.strip(name);
        if normalized.is_empty() {
            return Err(BrandForgeError::invalid_input(format!(
                "Brand name '{}' has no usable characters",
                name.trim()
            )));
        }
        Ok(normalized)
    }

    fn suffix(&self, suffix: &str) -> Result<String> {
        let suffix = suffix.trim().trim_start_matches('.').to_lowercase();
        if !self.suffix_format.is_match(&suffix) {
            return Err(BrandForgeError::invalid_input(format!(
                "Invalid domain suffix: '{}'",
                suffix
            )));
        }
        Ok(suffix)
    }
}

/// Lower-case and strip everything but `a-z0-9`.
///
/// `"Meal Mind!"` becomes `"mealmind"`. Fails when nothing is left.
pub fn normalize_base_name(name: &str) -> Result<String> {
    Patterns::new()?.base_name(name)
}

/// Normalize a suffix (`".COM"` → `"com"`) and check its format
pub fn normalize_suffix(suffix: &str) -> Result<String> {
    Patterns::new()?.suffix(suffix)
}

/// Generate the ordered variant list for a brand name.
///
/// Without prefixes the result has exactly one variant per suffix, in suffix
/// order. With prefixes, the base variants are followed by one block per
/// prefix, each block in suffix order. Repeated suffixes or prefixes are
/// collapsed so no variant appears twice.
pub fn generate_variants(
    base_name: &str,
    suffixes: &[String],
    prefixes: Option<&[String]>,
) -> Result<Vec<DomainVariant>> {
    let patterns = Patterns::new()?;
    let base = patterns.base_name(base_name)?;

    let suffixes = first_occurrences(
        suffixes
            .iter()
            .map(|s| patterns.suffix(s))
            .collect::<Result<Vec<_>>>()?,
    );

    let prefixes = first_occurrences(
        prefixes
            .unwrap_or_default()
            .iter()
            .map(|p| patterns.strip(p))
            .filter(|p| !p.is_empty())
            .collect(),
    );

    let mut variants = Vec::with_capacity(suffixes.len() * (1 + prefixes.len()));

    for suffix in &suffixes {
        variants.push(DomainVariant::compose(&base, None, suffix)?);
    }

    for prefix in &prefixes {
        for suffix in &suffixes {
            variants.push(DomainVariant::compose(&base, Some(prefix), suffix)?);
        }
    }

    Ok(variants)
}

/// Drop repeats, keeping the first occurrence of each item in place
fn first_occurrences(mut items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
    items
}
