//! LLM provider implementations
//!
//! Each provider lives in its own module; prompt construction and reply
//! parsing are shared here.

pub mod anthropic;
pub mod ollama;
pub mod openai;

// Re-export providers for easy access
pub use anthropic::AnthropicProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use crate::error::{BrandForgeError, Result};
use crate::types::{estimate_syllables, BrandBrief, CandidateName, GenerationConfig};
use serde::Deserialize;
use std::collections::HashSet;

pub const PERSONALITIES: &[&str] = &["playful", "professional", "innovative", "luxury"];
const DEFAULT_PERSONALITY: &str = "professional";

pub(crate) const SYSTEM_PROMPT: &str =
    "You are a brand naming specialist. Generate distinctive, memorable brand names and return them as a JSON array.";

/// Candidate as returned by a model; everything but the name is optional
#[derive(Debug, Deserialize)]
struct CandidateNameRaw {
    #[serde(alias = "name")]
    brand_name: String,
    #[serde(default)]
    naming_strategy: Option<String>,
    #[serde(default)]
    rationale: Option<String>,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    syllables: Option<u8>,
    #[serde(default)]
    memorable_score: Option<u8>,
}

/// Personality passed to the model; unknown values fall back to professional
pub(crate) fn personality(brief: &BrandBrief) -> &str {
    let requested = brief.brand_personality.trim();
    PERSONALITIES
        .iter()
        .find(|p| p.eq_ignore_ascii_case(requested))
        .copied()
        .unwrap_or(DEFAULT_PERSONALITY)
}

/// Build the brand naming prompt
pub fn build_naming_prompt(brief: &BrandBrief, config: &GenerationConfig) -> String {
    let avoid = if config.avoid_names.is_empty() {
        String::new()
    } else {
        format!("\nDo not repeat any of these names: {}\n", config.avoid_names.join(", "))
    };

    format!(
        "Generate {} brand names for this product: {}

Target audience: {}
Brand personality: {}
Industry: {}
{}
Mix naming strategies: portmanteau, descriptive, invented, acronym.

Return ONLY a JSON array of objects with this format:
[
  {{
    \"brand_name\": \"BrandName\",
    \"naming_strategy\": \"portmanteau\",
    \"rationale\": \"why this name works\",
    \"tagline\": \"short tagline\",
    \"syllables\": 3,
    \"memorable_score\": 8
  }}
]

memorable_score is an integer from 1 to 10.",
        config.count,
        brief.product_description,
        non_empty(&brief.target_audience),
        personality(brief),
        non_empty(&brief.industry),
        avoid
    )
}

/// Roughly 80 tokens per candidate plus framing
pub(crate) fn token_budget(count: usize) -> u32 {
    (count as u32).saturating_mul(80).saturating_add(400).min(8000)
}

pub(crate) fn non_empty(value: &str) -> &str {
    if value.trim().is_empty() {
        "unspecified"
    } else {
        value
    }
}

/// Parse candidate names from a model reply.
///
/// Prose around the JSON array is ignored. Blank and repeated names
/// (case-insensitive) are dropped, missing metadata is filled in, and the
/// result is cut to `config.count`.
pub fn parse_candidate_names(content: &str, config: &GenerationConfig) -> Result<Vec<CandidateName>> {
    let json_start = content.find('[').unwrap_or(0);
    let json_end = content.rfind(']').map(|i| i + 1).unwrap_or(content.len());
    let json_content = content.get(json_start..json_end).unwrap_or(content);

    let raw: Vec<CandidateNameRaw> = serde_json::from_str(json_content).map_err(|e| {
        BrandForgeError::parse(
            format!("Failed to parse AI response as JSON: {}", e),
            Some(json_content.to_string()),
        )
    })?;

    let mut seen = HashSet::new();
    let names: Vec<CandidateName> = raw
        .into_iter()
        .filter_map(|raw| {
            let brand_name = raw.brand_name.trim().to_string();
            if brand_name.is_empty() || !seen.insert(brand_name.to_lowercase()) {
                return None;
            }
            Some(CandidateName {
                syllables: raw.syllables.unwrap_or_else(|| estimate_syllables(&brand_name)),
                memorable_score: raw.memorable_score.unwrap_or(5).min(10),
                naming_strategy: raw.naming_strategy.unwrap_or_default(),
                rationale: raw.rationale.unwrap_or_default(),
                tagline: raw.tagline.unwrap_or_default(),
                brand_name,
            })
        })
        .take(config.count)
        .collect();

    Ok(names)
}
