use serde::{Deserialize, Serialize};

/// Structured content grade. Every parsing tier fills this same schema,
/// so missing fields fall back to the serde defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentGrade {
    #[serde(default = "default_grade")]
    pub overall_grade: String,
    #[serde(default = "default_numerical")]
    pub numerical_score: u32,
    #[serde(default = "default_authority")]
    pub authority_score: u32,
    #[serde(default = "default_relevance")]
    pub relevance_score: u32,
    #[serde(default = "default_completeness")]
    pub completeness_score: u32,
    #[serde(default = "default_strengths")]
    pub strengths: Vec<String>,
    #[serde(default = "default_weaknesses")]
    pub weaknesses: Vec<String>,
    #[serde(default = "default_recommendations")]
    pub recommendations: Vec<String>,
}

fn default_grade() -> String {
    "B".to_string()
}

fn default_numerical() -> u32 {
    75
}

fn default_authority() -> u32 {
    70
}

fn default_relevance() -> u32 {
    80
}

fn default_completeness() -> u32 {
    75
}

fn default_strengths() -> Vec<String> {
    vec!["Well-structured content".to_string()]
}

fn default_weaknesses() -> Vec<String> {
    vec!["Could be more comprehensive".to_string()]
}

fn default_recommendations() -> Vec<String> {
    vec!["Add more specific examples".to_string()]
}

impl Default for ContentGrade {
    fn default() -> Self {
        Self {
            overall_grade: default_grade(),
            numerical_score: default_numerical(),
            authority_score: default_authority(),
            relevance_score: default_relevance(),
            completeness_score: default_completeness(),
            strengths: default_strengths(),
            weaknesses: default_weaknesses(),
            recommendations: default_recommendations(),
        }
    }
}
