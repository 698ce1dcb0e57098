//! Brand story copy for an accepted name
//!
//! Asks the configured models for taglines, a short brand story, landing
//! page hero copy and a value proposition. When no model answers with
//! usable copy the story is filled from local templates instead.

use crate::error::{BrandForgeError, Result};
use crate::llm::providers::{non_empty, personality};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::types::BrandBrief;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

pub const TAGLINE_COUNT: usize = 5;

const STORY_SYSTEM_PROMPT: &str =
    "You are a brand storyteller. Write concise, vivid marketing copy and return it as a single JSON object.";
const STORY_TEMPERATURE: f32 = 0.9;
const STORY_MAX_TOKENS: u32 = 1200;

/// Where a story's copy came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "provider")]
pub enum StorySource {
    Model(String),
    Template,
}

/// Marketing copy for one brand name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandStory {
    pub brand_name: String,
    pub taglines: Vec<String>,
    pub brand_story: String,
    pub hero_copy: String,
    pub value_proposition: String,
    pub source: StorySource,
}

#[derive(Debug, Deserialize)]
struct BrandStoryRaw {
    #[serde(default)]
    taglines: Vec<String>,
    #[serde(default, alias = "story")]
    brand_story: String,
    #[serde(default)]
    hero_copy: String,
    #[serde(default)]
    value_proposition: String,
}

/// Build the storytelling prompt for `brand_name`
pub fn build_story_prompt(brand_name: &str, brief: &BrandBrief) -> String {
    format!(
        "Create a brand identity for \"{}\".

Product: {}
Target audience: {}
Brand personality: {}
Industry: {}

Write:
1. {} tagline options, 5 to 8 words each
2. A brand story of 200 to 300 words
3. Landing page hero copy of 50 to 100 words with a call to action
4. A value proposition of 20 to 30 words

Return ONLY a JSON object with this format:
{{
  \"taglines\": [\"...\"],
  \"brand_story\": \"...\",
  \"hero_copy\": \"...\",
  \"value_proposition\": \"...\"
}}",
        brand_name,
        brief.product_description,
        non_empty(&brief.target_audience),
        personality(brief),
        non_empty(&brief.industry),
        TAGLINE_COUNT
    )
}

/// Parse story copy from a model reply.
///
/// Code fences and prose around the JSON object are ignored. Blank taglines
/// are dropped and the rest cut to [`TAGLINE_COUNT`]. A reply without
/// taglines or without a story is an error.
pub fn parse_brand_story(content: &str, brand_name: &str, provider: &str) -> Result<BrandStory> {
    let json_start = content.find('{').unwrap_or(0);
    let json_end = content.rfind('}').map(|i| i + 1).unwrap_or(content.len());
    let json_content = content.get(json_start..json_end).unwrap_or(content);

    let raw: BrandStoryRaw = serde_json::from_str(json_content).map_err(|e| {
        BrandForgeError::parse(
            format!("Failed to parse brand story as JSON: {}", e),
            Some(json_content.to_string()),
        )
    })?;

    let taglines: Vec<String> = raw
        .taglines
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(TAGLINE_COUNT)
        .collect();

    if taglines.is_empty() || raw.brand_story.trim().is_empty() {
        return Err(BrandForgeError::parse(
            "Brand story reply is missing taglines or the story",
            Some(json_content.to_string()),
        ));
    }

    Ok(BrandStory {
        brand_name: brand_name.to_string(),
        taglines,
        brand_story: raw.brand_story.trim().to_string(),
        hero_copy: raw.hero_copy.trim().to_string(),
        value_proposition: raw.value_proposition.trim().to_string(),
        source: StorySource::Model(provider.to_string()),
    })
}

fn personality_traits(personality: &str) -> &'static str {
    match personality {
        "playful" => "fun, inventive and easy to love",
        "innovative" => "bold, forward-looking and quick to adapt",
        "luxury" => "refined, exclusive and carefully crafted",
        _ => "dependable, efficient and trustworthy",
    }
}

/// Copy built locally from the brief
pub fn template_story(brand_name: &str, brief: &BrandBrief) -> BrandStory {
    let personality = personality(brief);
    let traits = personality_traits(personality);
    let product = brief.product_description.trim();
    let audience = non_empty(&brief.target_audience);

    BrandStory {
        brand_name: brand_name.to_string(),
        taglines: vec![
            format!("{}: made for the way you work", brand_name),
            format!("Less effort, more done with {}", brand_name),
            format!("{} turns plans into progress", brand_name),
            format!("Start simple. Stay with {}", brand_name),
            format!("{}, built for what comes next", brand_name),
        ],
        brand_story: format!(
            "{} started with one question: why is {} still so hard? We set out to build something {} for {}. \
             Every feature earns its place by saving time or removing a worry, and we keep listening to the people \
             who use it every day.",
            brand_name, product, traits, audience
        ),
        hero_copy: format!(
            "Meet {}. {} without the busywork, designed for {}. Try it today and see the difference in your first week.",
            brand_name, product, audience
        ),
        value_proposition: format!("{} delivers {} that feels {}.", brand_name, product, traits),
        source: StorySource::Template,
    }
}

/// Story writer over the configured providers, tried in order
#[derive(Clone)]
pub struct StoryGenerator {
    providers: Vec<Arc<dyn LlmProvider>>,
}

impl StoryGenerator {
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self { providers }
    }

    /// Write copy for `brand_name`. Never fails: when every provider errors
    /// or answers with unusable copy, the template story is returned.
    pub async fn generate_story(&self, brand_name: &str, brief: &BrandBrief) -> BrandStory {
        let request = CompletionRequest {
            system: STORY_SYSTEM_PROMPT.to_string(),
            prompt: build_story_prompt(brand_name, brief),
            temperature: STORY_TEMPERATURE,
            max_tokens: STORY_MAX_TOKENS,
        };

        for provider in &self.providers {
            let start = Instant::now();
            let story = match provider.complete(&request).await {
                Ok(reply) => parse_brand_story(&reply, brand_name, provider.name()),
                Err(e) => Err(e),
            };

            match story {
                Ok(story) => {
                    tracing::info!(
                        provider = provider.name(),
                        brand = %brand_name,
                        duration_ms = %start.elapsed().as_millis(),
                        "Brand story generated"
                    );
                    return story;
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), brand = %brand_name, error = %e, "Brand story failed");
                }
            }
        }

        tracing::info!(brand = %brand_name, "Using template brand story");
        template_story(brand_name, brief)
    }
}
