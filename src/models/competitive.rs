use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One provider's answer to one competitive prompt. Failed calls still
/// produce a result with an error response and zero scores, so the
/// cross-provider rollup can show which providers answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTestResult {
    pub provider: String,
    pub prompt: String,
    pub response: String,
    pub rank_position: Option<u32>,
    pub brand_mentions: Vec<String>,
    pub competitor_mentions: Vec<String>,
    pub sentiment_score: f64,
    pub confidence: f64,
    pub response_time: f64,
    pub timestamp: DateTime<Utc>,
    pub citations: Vec<String>,
}

impl PromptTestResult {
    pub fn failed(provider: &str, prompt: &str, message: &str, response_time: f64) -> Self {
        Self {
            provider: provider.to_string(),
            prompt: prompt.to_string(),
            response: format!("Error: {}", message),
            rank_position: None,
            brand_mentions: Vec::new(),
            competitor_mentions: Vec::new(),
            sentiment_score: 0.0,
            confidence: 0.0,
            response_time,
            timestamp: Utc::now(),
            citations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitiveGap {
    pub provider: String,
    pub current_rank: u32,
    pub gap_size: u32,
    pub main_competitors: Vec<String>,
    pub opportunity_score: u32,
}

/// Cross-provider rollup for one competitive prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitiveAnalysis {
    pub prompt: String,
    pub results: Vec<PromptTestResult>,
    pub best_performer: String,
    pub ranking_summary: HashMap<String, u32>,
    pub competitive_gaps: Vec<CompetitiveGap>,
    pub improvement_opportunities: Vec<String>,
}

impl CompetitiveAnalysis {
    pub fn empty(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            results: Vec::new(),
            best_performer: String::new(),
            ranking_summary: HashMap::new(),
            competitive_gaps: Vec::new(),
            improvement_opportunities: Vec::new(),
        }
    }
}
