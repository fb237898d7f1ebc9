use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Mutex;

use crate::analysis::competitive::{
    calculate_confidence, estimate_rank, extract_citations, find_competitor_mentions,
    score_sentiment,
};
use crate::analysis::extractor::extract_mentions;
use crate::analysis::grading::{fallback_grade, parse_grade_response};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::limits::{RateLimiter, SearchCache};
use crate::models::{
    AnalysisMetadata, BrandAnalysis, CompetitiveAnalysis, CompetitiveGap, ContentGrade, Mention,
    PromptTestResult, SentimentDistribution,
};
use crate::openrouter::prompts;
use crate::openrouter::{AiProvider, ChatMessage, CompletionProvider};

const SEARCH_TEMPERATURE: f32 = 0.3;
const COMPETITIVE_TEMPERATURE: f32 = 0.7;
const GRADING_TEMPERATURE: f32 = 0.3;
const GRADING_MAX_TOKENS: u32 = 1500;

/// Aggregates brand signals across the provider set: concurrent fan-out,
/// mention extraction, visibility scoring, competitive rollups, and content
/// grading, fronted by a TTL cache and a per-minute call budget.
///
/// One engine per process; construct it at startup and pass it by handle.
pub struct BrandIntelligenceEngine {
    gateway: Arc<dyn CompletionProvider>,
    providers: Vec<AiProvider>,
    cache: Mutex<SearchCache>,
    limiter: Mutex<RateLimiter>,
    config: EngineConfig,
}

impl BrandIntelligenceEngine {
    pub fn new(gateway: impl CompletionProvider + 'static, config: EngineConfig) -> Self {
        Self {
            gateway: Arc::new(gateway),
            providers: AiProvider::all().to_vec(),
            cache: Mutex::new(SearchCache::new(Duration::from_secs(config.cache_ttl_secs))),
            limiter: Mutex::new(RateLimiter::new(config.rate_limit_per_minute)),
            config,
        }
    }

    pub fn with_providers(mut self, providers: Vec<AiProvider>) -> Self {
        self.providers = providers;
        self
    }

    /// Search for brand mentions across all providers. Always yields an
    /// analysis: cache hits return the stored result, an exhausted call
    /// budget returns a zero result flagged `rate_limited`, and per-provider
    /// failures degrade to zero mentions from that provider.
    pub async fn search(&self, brand_name: &str, keywords: &[String]) -> BrandAnalysis {
        let key = SearchCache::key(brand_name, keywords);

        if let Some(cached) = self.cache.lock().await.get(&key) {
            tracing::debug!("Cache hit for {}", brand_name);
            return cached;
        }

        if !self.limiter.lock().await.try_acquire() {
            tracing::warn!("Rate limit reached, returning empty analysis for {}", brand_name);
            return BrandAnalysis::rate_limited(brand_name);
        }

        let analysis = self.search_uncached(brand_name, keywords).await;
        self.cache.lock().await.insert(key, analysis.clone());
        analysis
    }

    async fn search_uncached(&self, brand_name: &str, keywords: &[String]) -> BrandAnalysis {
        let branches = self.providers.iter().map(|provider| {
            let gateway = self.gateway.clone();
            let provider = *provider;
            let brand = brand_name.to_string();
            let keywords = keywords.to_vec();
            let max_tokens = self.config.max_tokens;

            async move {
                let messages = [
                    ChatMessage::system(prompts::SEARCH_SYSTEM_PROMPT),
                    ChatMessage::user(prompts::search_prompt(&brand, &keywords)),
                ];

                let outcome: Result<Vec<Mention>> = match gateway
                    .complete(provider.model_id(), &messages, max_tokens, SEARCH_TEMPERATURE)
                    .await
                {
                    Ok(text) => Ok(extract_mentions(&text, &brand, &keywords, provider.name())),
                    Err(e) => Err(e),
                };
                (provider, outcome)
            }
        });

        let mut all_mentions = Vec::new();
        for (provider, outcome) in join_all(branches).await {
            match outcome {
                Ok(mentions) => {
                    tracing::debug!("{} yielded {} mentions", provider, mentions.len());
                    all_mentions.extend(mentions);
                }
                Err(e) => {
                    tracing::warn!("{} search failed: {}", provider, e);
                }
            }
        }

        Self::aggregate(brand_name, all_mentions)
    }

    pub(crate) fn aggregate(brand_name: &str, mentions: Vec<Mention>) -> BrandAnalysis {
        if mentions.is_empty() {
            return BrandAnalysis::empty(brand_name);
        }

        let mut distribution = SentimentDistribution::default();
        for mention in &mentions {
            distribution.record(mention.sentiment_score);
        }

        let visibility_score = Self::visibility_score(&mentions, &distribution);

        let mut providers_used = Vec::new();
        for mention in &mentions {
            if !providers_used.contains(&mention.provider) {
                providers_used.push(mention.provider.clone());
            }
        }

        let avg_confidence =
            mentions.iter().map(|m| m.confidence).sum::<f64>() / mentions.len() as f64;

        let unique_sources = mentions
            .iter()
            .flat_map(|m| m.source_urls.iter())
            .collect::<HashSet<_>>()
            .len();

        BrandAnalysis {
            brand_name: brand_name.to_string(),
            total_mentions: mentions.len() as u32,
            sentiment_distribution: distribution,
            visibility_score,
            mentions,
            analysis_metadata: AnalysisMetadata {
                providers_used,
                avg_confidence,
                unique_sources,
                search_timestamp: Utc::now(),
                rate_limited: false,
            },
        }
    }

    /// Composite 0-100 score: mention volume (max 50), weighted sentiment
    /// mix, average extraction confidence (max 10), and source diversity
    /// (max 10).
    fn visibility_score(mentions: &[Mention], dist: &SentimentDistribution) -> f64 {
        let total = mentions.len() as f64;

        let volume_score = (total * 2.0).min(50.0);

        let positive_weight =
            (dist.very_positive as f64 * 1.0 + dist.positive as f64 * 0.8) / total;
        let negative_weight =
            (dist.very_negative as f64 * 1.0 + dist.negative as f64 * 0.8) / total;
        let neutral_weight = dist.neutral as f64 / total;

        let sentiment_score =
            positive_weight * 30.0 + neutral_weight * 15.0 - negative_weight * 10.0;

        let avg_confidence = mentions.iter().map(|m| m.confidence).sum::<f64>() / total;
        let confidence_score = avg_confidence * 10.0;

        let unique_sources = mentions
            .iter()
            .flat_map(|m| m.source_urls.iter())
            .collect::<HashSet<_>>()
            .len();
        let source_score = (unique_sources as f64 * 2.0).min(10.0);

        (volume_score + sentiment_score + confidence_score + source_score).clamp(0.0, 100.0)
    }

    /// Run one competitive prompt against every provider concurrently.
    /// Unlike the mention path, failures stay visible: a failed branch
    /// becomes a result row with an error response and zero scores.
    pub async fn test_across_providers(
        &self,
        prompt: &str,
        brand_name: &str,
        competitors: &[String],
    ) -> CompetitiveAnalysis {
        let branches = self.providers.iter().map(|provider| {
            let gateway = self.gateway.clone();
            let provider = *provider;
            let prompt = prompt.to_string();
            let brand = brand_name.to_string();
            let competitors = competitors.to_vec();
            let max_tokens = self.config.max_tokens;

            async move {
                let started = Instant::now();
                let messages = [ChatMessage::user(prompts::competitive_prompt(
                    &prompt,
                    &brand,
                    &competitors,
                ))];

                match gateway
                    .complete(
                        provider.model_id(),
                        &messages,
                        max_tokens,
                        COMPETITIVE_TEMPERATURE,
                    )
                    .await
                {
                    Ok(response) => Self::analyze_provider_response(
                        provider.name(),
                        &prompt,
                        &response,
                        &brand,
                        &competitors,
                        started.elapsed().as_secs_f64(),
                    ),
                    Err(e) => {
                        tracing::warn!("{} competitive test failed: {}", provider, e);
                        PromptTestResult::failed(
                            provider.name(),
                            &prompt,
                            &e.to_string(),
                            started.elapsed().as_secs_f64(),
                        )
                    }
                }
            }
        });

        let results = join_all(branches).await;
        Self::merge_competitive_results(prompt, results)
    }

    fn analyze_provider_response(
        provider: &str,
        prompt: &str,
        response: &str,
        brand_name: &str,
        competitors: &[String],
        response_time: f64,
    ) -> PromptTestResult {
        let brand_mentions = if response
            .to_lowercase()
            .contains(&brand_name.to_lowercase())
        {
            vec![brand_name.to_string()]
        } else {
            Vec::new()
        };

        let competitor_mentions = find_competitor_mentions(response, competitors);

        PromptTestResult {
            provider: provider.to_string(),
            prompt: prompt.to_string(),
            response: response.to_string(),
            rank_position: estimate_rank(response, brand_name, competitors),
            sentiment_score: score_sentiment(response, brand_name),
            confidence: calculate_confidence(response, &brand_mentions, &competitor_mentions),
            citations: extract_citations(response),
            brand_mentions,
            competitor_mentions,
            response_time,
            timestamp: Utc::now(),
        }
    }

    fn merge_competitive_results(
        prompt: &str,
        results: Vec<PromptTestResult>,
    ) -> CompetitiveAnalysis {
        if results.is_empty() {
            return CompetitiveAnalysis::empty(prompt);
        }

        let best_performer = results
            .iter()
            .filter_map(|r| r.rank_position.map(|rank| (rank, &r.provider)))
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, provider)| provider.clone())
            .unwrap_or_default();

        let ranking_summary: HashMap<String, u32> = results
            .iter()
            .filter_map(|r| r.rank_position.map(|rank| (r.provider.clone(), rank)))
            .collect();

        let competitive_gaps: Vec<CompetitiveGap> = results
            .iter()
            .filter_map(|r| match r.rank_position {
                Some(rank) if rank > 1 => Some(CompetitiveGap {
                    provider: r.provider.clone(),
                    current_rank: rank,
                    gap_size: rank - 1,
                    main_competitors: r.competitor_mentions.iter().take(2).cloned().collect(),
                    opportunity_score: 100u32.saturating_sub(rank * 15),
                }),
                _ => None,
            })
            .collect();

        let mut improvement_opportunities = Vec::new();

        if !ranking_summary.is_empty() {
            let avg_rank = ranking_summary.values().sum::<u32>() as f64
                / ranking_summary.len() as f64;
            if avg_rank > 2.0 {
                improvement_opportunities.push(format!(
                    "Focus on {} - average rank is {:.1}, opportunity to improve",
                    prompt, avg_rank
                ));
            }
        }

        if let Some(top_competitor) = Self::most_mentioned_competitor(&results) {
            improvement_opportunities.push(format!(
                "Challenge {} - most frequently mentioned competitor",
                top_competitor
            ));
        }

        CompetitiveAnalysis {
            prompt: prompt.to_string(),
            results,
            best_performer,
            ranking_summary,
            competitive_gaps,
            improvement_opportunities,
        }
    }

    fn most_mentioned_competitor(results: &[PromptTestResult]) -> Option<String> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for result in results {
            for competitor in &result.competitor_mentions {
                *counts.entry(competitor.as_str()).or_insert(0) += 1;
            }
        }

        // Ties break alphabetically so the narrative is stable.
        counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)))
            .map(|(name, _)| name.to_string())
    }

    /// Grade a piece of content against a prompt with a single fixed model.
    /// Never fails: parse failures degrade through the grading tiers and a
    /// dead provider degrades to the length heuristic.
    pub async fn grade_content(
        &self,
        prompt: &str,
        content: &str,
        brand_name: &str,
    ) -> ContentGrade {
        let messages = [ChatMessage::user(prompts::grading_prompt(
            prompt, content, brand_name,
        ))];

        match self
            .gateway
            .complete(
                AiProvider::Claude.model_id(),
                &messages,
                GRADING_MAX_TOKENS,
                GRADING_TEMPERATURE,
            )
            .await
        {
            Ok(response) => parse_grade_response(&response, content),
            Err(e) => {
                tracing::warn!("Content grading call failed: {}", e);
                fallback_grade(content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::SentimentLabel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned gateway: maps model ids to fixed responses (or failures) and
    /// counts calls so cache behavior is observable.
    struct FakeGateway {
        responses: HashMap<&'static str, std::result::Result<&'static str, u16>>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeGateway {
        fn new(
            responses: HashMap<&'static str, std::result::Result<&'static str, u16>>,
        ) -> Self {
            Self {
                responses,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn single(response: &'static str) -> Self {
            let mut responses = HashMap::new();
            for provider in AiProvider::all() {
                responses.insert(provider.model_id(), Ok(response));
            }
            Self::new(responses)
        }

        fn failing() -> Self {
            let mut responses = HashMap::new();
            for provider in AiProvider::all() {
                responses.insert(provider.model_id(), Err(503u16));
            }
            Self::new(responses)
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeGateway {
        async fn complete(
            &self,
            model: &str,
            _messages: &[ChatMessage],
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(model) {
                Some(Ok(text)) => Ok(text.to_string()),
                Some(Err(status)) => Err(Error::Provider {
                    status: *status,
                    body: "unavailable".to_string(),
                }),
                None => Err(Error::Provider {
                    status: 404,
                    body: format!("unknown model {}", model),
                }),
            }
        }
    }

    fn engine(gateway: FakeGateway) -> BrandIntelligenceEngine {
        BrandIntelligenceEngine::new(gateway, EngineConfig::default())
    }

    #[tokio::test]
    async fn test_search_extracts_single_positive_mention() {
        let gateway = FakeGateway::single(
            "Acme makes excellent widgets and users love the great design.\n\n\
             Unrelated vendors were not discussed here.",
        );
        let engine = engine(gateway).with_providers(vec![AiProvider::ChatGpt]);

        let analysis = engine.search("Acme", &["widgets".to_string()]).await;

        assert_eq!(analysis.total_mentions, 1);
        assert_eq!(analysis.mentions[0].sentiment_score, 4);
        assert_eq!(analysis.mentions[0].sentiment_label, SentimentLabel::Positive);
        assert_eq!(analysis.mentions[0].keywords_found, vec!["widgets"]);
        assert_eq!(analysis.analysis_metadata.providers_used, vec!["ChatGPT"]);
    }

    #[tokio::test]
    async fn test_distribution_sums_to_total_and_score_in_range() {
        let gateway = FakeGateway::single(
            "Acme is great.\n\nAcme had a terrible outage.\n\nAcme was mentioned in passing.",
        );
        let engine = engine(gateway);

        let analysis = engine.search("Acme", &[]).await;

        assert_eq!(
            analysis.sentiment_distribution.total(),
            analysis.total_mentions
        );
        assert!(analysis.visibility_score >= 0.0 && analysis.visibility_score <= 100.0);
        // Three providers, three brand sections each.
        assert_eq!(analysis.total_mentions, 9);
    }

    #[tokio::test]
    async fn test_no_mentions_yields_zero_analysis() {
        let gateway = FakeGateway::single("Nothing about the brand in question here.");
        let engine = engine(gateway);

        let analysis = engine.search("Acme", &[]).await;

        assert_eq!(analysis.total_mentions, 0);
        assert_eq!(analysis.visibility_score, 0.0);
        assert_eq!(analysis.sentiment_distribution, SentimentDistribution::default());
    }

    #[tokio::test]
    async fn test_one_failed_provider_does_not_abort_search() {
        let mut responses = HashMap::new();
        responses.insert(AiProvider::ChatGpt.model_id(), Ok("Acme ships widgets."));
        responses.insert(AiProvider::Claude.model_id(), Err(500u16));
        responses.insert(AiProvider::Gemini.model_id(), Ok("Acme grew last year."));
        let engine = engine(FakeGateway::new(responses));

        let analysis = engine.search("Acme", &[]).await;

        assert_eq!(analysis.total_mentions, 2);
        let providers = &analysis.analysis_metadata.providers_used;
        assert!(providers.contains(&"ChatGPT".to_string()));
        assert!(providers.contains(&"Gemini".to_string()));
        assert!(!providers.contains(&"Claude".to_string()));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_providers_and_ignores_keyword_order() {
        let gateway = FakeGateway::single("Acme remains popular.");
        let calls = gateway.calls.clone();
        let engine = BrandIntelligenceEngine::new(gateway, EngineConfig::default());

        let kw_a = vec!["widgets".to_string(), "gadgets".to_string()];
        let kw_b = vec!["gadgets".to_string(), "widgets".to_string()];

        let first = engine.search("Acme", &kw_a).await;
        let second = engine.search("Acme", &kw_b).await;

        assert_eq!(first.total_mentions, second.total_mentions);
        // Only the first search reached the gateway: 3 provider calls.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_budget_returns_flagged_zero_result() {
        let gateway = FakeGateway::single("Acme remains popular.");
        let config = EngineConfig {
            rate_limit_per_minute: 1,
            ..EngineConfig::default()
        };
        let engine = BrandIntelligenceEngine::new(gateway, config);

        let first = engine.search("Acme", &[]).await;
        assert!(!first.analysis_metadata.rate_limited);

        // Different brand misses the cache and hits the exhausted budget.
        let second = engine.search("Apex", &[]).await;
        assert!(second.analysis_metadata.rate_limited);
        assert_eq!(second.total_mentions, 0);
        assert_eq!(second.visibility_score, 0.0);
    }

    #[tokio::test]
    async fn test_competitive_rollup_keeps_failures_visible() {
        let mut responses = HashMap::new();
        responses.insert(
            AiProvider::ChatGpt.model_id(),
            Ok("Acme is the best choice, better than Foo and Bar."),
        );
        responses.insert(AiProvider::Claude.model_id(), Err(502u16));
        responses.insert(
            AiProvider::Gemini.model_id(),
            Ok("Foo leads the segment while Acme struggles to keep pace."),
        );
        let engine = engine(FakeGateway::new(responses));

        let competitors = vec!["Foo".to_string(), "Bar".to_string()];
        let analysis = engine
            .test_across_providers("best widget maker", "Acme", &competitors)
            .await;

        assert_eq!(analysis.results.len(), 3);
        assert_eq!(analysis.best_performer, "ChatGPT");
        assert_eq!(analysis.ranking_summary.get("ChatGPT"), Some(&1));
        assert_eq!(analysis.ranking_summary.get("Gemini"), Some(&2));
        assert!(analysis.ranking_summary.get("Claude").is_none());

        let failed = analysis
            .results
            .iter()
            .find(|r| r.provider == "Claude")
            .unwrap();
        assert!(failed.response.starts_with("Error:"));
        assert_eq!(failed.rank_position, None);
        assert_eq!(failed.sentiment_score, 0.0);
        assert_eq!(failed.confidence, 0.0);

        let gap = &analysis.competitive_gaps[0];
        assert_eq!(gap.provider, "Gemini");
        assert_eq!(gap.gap_size, 1);
        assert_eq!(gap.opportunity_score, 70);

        assert!(analysis
            .improvement_opportunities
            .iter()
            .any(|o| o.contains("Challenge Foo")));
    }

    #[tokio::test]
    async fn test_grading_falls_back_when_provider_is_down() {
        let engine = engine(FakeGateway::failing());
        let content = vec!["word"; 50].join(" ");

        let grade = engine.grade_content("best widgets", &content, "Acme").await;

        assert_eq!(grade.overall_grade, "D");
        assert_eq!(grade.numerical_score, 60);
    }

    #[tokio::test]
    async fn test_grading_parses_json_response() {
        let gateway = FakeGateway::single(
            r#"{"overall_grade": "A", "numerical_score": 95, "strengths": ["expert voice"]}"#,
        );
        let engine = engine(gateway);

        let grade = engine.grade_content("best widgets", "body", "Acme").await;

        assert_eq!(grade.overall_grade, "A");
        assert_eq!(grade.numerical_score, 95);
        assert_eq!(grade.strengths, vec!["expert voice"]);
    }
}
