//! SEO optimization for brand names

use crate::error::{BrandForgeError, Result};
use crate::types::{BrandBrief, SeoResult};
use async_trait::async_trait;
use std::collections::HashSet;

const META_TITLE_MAX: usize = 60;
const META_DESCRIPTION_MAX: usize = 160;
const SHORT_DESCRIPTION: usize = 150;

/// Produces SEO content for a name
#[async_trait]
pub trait SeoOptimizer: Send + Sync {
    async fn optimize(&self, name: &str, brief: &BrandBrief) -> Result<SeoResult>;
}

/// Deterministic, offline SEO scoring and copy
#[derive(Debug, Default, Clone)]
pub struct HeuristicSeoOptimizer;

impl HeuristicSeoOptimizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SeoOptimizer for HeuristicSeoOptimizer {
    async fn optimize(&self, name: &str, brief: &BrandBrief) -> Result<SeoResult> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BrandForgeError::seo("Brand name is empty"));
        }

        let description = brief.product_description.trim();
        let industry = brief.industry.trim().to_lowercase();

        let result = SeoResult {
            seo_score: seo_score(name, description),
            meta_title: meta_title(name, description),
            meta_description: meta_description(name, description),
            primary_keywords: primary_keywords(description, &industry),
            secondary_keywords: vec![
                format!("{} {}", name.to_lowercase(), industry),
                format!("best {} solution", industry),
                format!("{} platform", industry),
            ],
            content_opportunities: vec![
                format!("How {} transforms {}", name, industry),
                format!("Top {} trends this year", industry),
                format!("{} vs competitors: a comparison", name),
            ],
            optimization_tips: optimization_tips(name),
        };

        tracing::debug!(name = %name, score = result.seo_score, "SEO optimization completed");
        Ok(result)
    }
}

fn seo_score(name: &str, description: &str) -> u8 {
    let mut score: u32 = 50;
    let len = name.chars().count();

    if (4..=12).contains(&len) {
        score += 15;
    }

    let description_words: HashSet<String> = description.to_lowercase().split_whitespace().map(str::to_string).collect();
    if name
        .to_lowercase()
        .split_whitespace()
        .any(|word| description_words.contains(word))
    {
        score += 20;
    }

    let vowels = name
        .to_lowercase()
        .chars()
        .filter(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        .count();
    let ratio = vowels as f64 / len.max(1) as f64;
    if (0.3..=0.5).contains(&ratio) {
        score += 15;
    }

    score.min(100) as u8
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn meta_title(name: &str, description: &str) -> String {
    let words: Vec<&str> = description.split_whitespace().collect();
    let benefit = if words.len() >= 3 {
        words[..3].join(" ")
    } else {
        truncate_chars(description, 20)
    };
    truncate_chars(&format!("{} - {}", name, benefit), META_TITLE_MAX)
}

fn meta_description(name: &str, description: &str) -> String {
    let mut text = format!("{}: {}", name, description);
    if text.chars().count() < SHORT_DESCRIPTION {
        text.push_str(" Discover the future of innovation.");
    }
    truncate_chars(&text, META_DESCRIPTION_MAX)
}

fn primary_keywords(description: &str, industry: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords: Vec<String> = description
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| w.chars().count() > 4)
        .filter(|w| seen.insert(w.clone()))
        .take(3)
        .collect();

    if !industry.is_empty() && seen.insert(industry.to_string()) {
        keywords.push(industry.to_string());
    }
    keywords
}

fn optimization_tips(name: &str) -> Vec<String> {
    let mut tips = vec!["Use the brand name consistently across all platforms".to_string()];
    if name.chars().count() > 15 {
        tips.push("Consider shortening the brand name for better SEO".to_string());
    }
    tips.push("Earn backlinks from industry sites".to_string());
    tips.push("Keep page load times low".to_string());
    tips
}
