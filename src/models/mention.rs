use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Five-level sentiment scale. The keyword heuristic only ever produces
/// the inner three levels; the extremes exist for the competitive scorer
/// and for data coming back from persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl SentimentLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            1 => SentimentLabel::VeryNegative,
            2 => SentimentLabel::Negative,
            4 => SentimentLabel::Positive,
            5 => SentimentLabel::VeryPositive,
            _ => SentimentLabel::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::VeryNegative => "very_negative",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
            SentimentLabel::VeryPositive => "very_positive",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One brand-referencing span extracted from a provider response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub content: String,
    pub sentiment_score: u8,
    pub sentiment_label: SentimentLabel,
    pub confidence: f64,
    pub source_urls: Vec<String>,
    pub context: String,
    pub provider: String,
    pub timestamp: DateTime<Utc>,
    pub keywords_found: Vec<String>,
}

/// Mention counts bucketed by sentiment level. Sums to the total mention
/// count of the analysis it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub very_positive: u32,
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
    pub very_negative: u32,
}

impl SentimentDistribution {
    pub fn record(&mut self, score: u8) {
        match score {
            5 => self.very_positive += 1,
            4 => self.positive += 1,
            2 => self.negative += 1,
            1 => self.very_negative += 1,
            _ => self.neutral += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.very_positive + self.positive + self.neutral + self.negative + self.very_negative
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub providers_used: Vec<String>,
    pub avg_confidence: f64,
    pub unique_sources: usize,
    pub search_timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub rate_limited: bool,
}

/// Aggregate result of one brand search across all providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandAnalysis {
    pub brand_name: String,
    pub total_mentions: u32,
    pub sentiment_distribution: SentimentDistribution,
    pub visibility_score: f64,
    pub mentions: Vec<Mention>,
    pub analysis_metadata: AnalysisMetadata,
}

impl BrandAnalysis {
    /// The zero result: no mentions, zero score, empty distribution.
    pub fn empty(brand_name: &str) -> Self {
        Self {
            brand_name: brand_name.to_string(),
            total_mentions: 0,
            sentiment_distribution: SentimentDistribution::default(),
            visibility_score: 0.0,
            mentions: Vec::new(),
            analysis_metadata: AnalysisMetadata {
                providers_used: Vec::new(),
                avg_confidence: 0.0,
                unique_sources: 0,
                search_timestamp: Utc::now(),
                rate_limited: false,
            },
        }
    }

    pub fn rate_limited(brand_name: &str) -> Self {
        let mut analysis = Self::empty(brand_name);
        analysis.analysis_metadata.rate_limited = true;
        analysis
    }

    /// Mean of mention sentiment scores, neutral when there are none.
    pub fn average_sentiment(&self) -> f64 {
        if self.mentions.is_empty() {
            return 3.0;
        }
        let sum: u32 = self.mentions.iter().map(|m| m.sentiment_score as u32).sum();
        sum as f64 / self.mentions.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trips_through_score() {
        assert_eq!(SentimentLabel::from_score(1), SentimentLabel::VeryNegative);
        assert_eq!(SentimentLabel::from_score(3), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(5), SentimentLabel::VeryPositive);
    }

    #[test]
    fn test_distribution_total_tracks_records() {
        let mut dist = SentimentDistribution::default();
        for score in [4, 4, 3, 2, 5, 1] {
            dist.record(score);
        }
        assert_eq!(dist.total(), 6);
        assert_eq!(dist.positive, 2);
        assert_eq!(dist.very_negative, 1);
    }

    #[test]
    fn test_empty_analysis_is_all_zero() {
        let analysis = BrandAnalysis::empty("Acme");
        assert_eq!(analysis.visibility_score, 0.0);
        assert_eq!(analysis.total_mentions, 0);
        assert_eq!(analysis.sentiment_distribution, SentimentDistribution::default());
        assert_eq!(analysis.average_sentiment(), 3.0);
        assert!(!analysis.analysis_metadata.rate_limited);
    }
}
