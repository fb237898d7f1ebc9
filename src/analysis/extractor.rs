use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

use crate::analysis::sentiment::analyze_sentiment;
use crate::models::Mention;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).expect("invalid URL pattern")
});

const CONTEXT_LIMIT: usize = 200;

/// Split provider text on blank-line boundaries and turn each section that
/// references the brand into a `Mention`. Sections without the brand name
/// are dropped: precision over recall, so every mention is brand-relevant.
pub fn extract_mentions(
    response_text: &str,
    brand_name: &str,
    keywords: &[String],
    provider: &str,
) -> Vec<Mention> {
    let brand_lower = brand_name.to_lowercase();
    let mut mentions = Vec::new();

    for section in response_text.split("\n\n") {
        let section = section.trim();
        if section.is_empty() {
            continue;
        }

        let section_lower = section.to_lowercase();
        if !section_lower.contains(&brand_lower) {
            continue;
        }

        let source_urls: Vec<String> = URL_PATTERN
            .find_iter(section)
            .map(|m| m.as_str().to_string())
            .collect();

        let keywords_found: Vec<String> = keywords
            .iter()
            .filter(|kw| section_lower.contains(&kw.to_lowercase()))
            .cloned()
            .collect();

        let reading = analyze_sentiment(section);

        mentions.push(Mention {
            content: section.to_string(),
            sentiment_score: reading.score,
            sentiment_label: reading.label,
            confidence: reading.confidence,
            source_urls,
            context: truncate_context(section),
            provider: provider.to_string(),
            timestamp: Utc::now(),
            keywords_found,
        });
    }

    mentions
}

fn truncate_context(section: &str) -> String {
    if section.chars().count() > CONTEXT_LIMIT {
        let preview: String = section.chars().take(CONTEXT_LIMIT).collect();
        format!("{}...", preview)
    } else {
        section.to_string()
    }
}
