use regex::Regex;
use std::sync::LazyLock;

/// Competitive-framing vocabulary, distinct from the general mention
/// sentiment lists: these are the words models use when ranking brands
/// against each other.
const POSITIVE_FRAMING: [&str; 16] = [
    "best", "excellent", "superior", "leading", "top", "outstanding", "reliable",
    "innovative", "efficient", "advanced", "popular", "recommended", "preferred",
    "winner", "impressive", "strong",
];

const NEGATIVE_FRAMING: [&str; 16] = [
    "worst", "poor", "inferior", "problems", "issues", "concerns", "expensive",
    "limited", "lacking", "disappointing", "weak", "behind", "struggling", "fails",
    "unable", "difficult",
];

static CITATION_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s\)>]+").expect("invalid URL pattern"));

static SOURCE_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)according to ([^,\n]+)").expect("invalid source pattern"),
        Regex::new(r"(?i)source: ([^,\n]+)").expect("invalid source pattern"),
        Regex::new(r"(?i)study by ([^,\n]+)").expect("invalid source pattern"),
        Regex::new(r"(?i)research from ([^,\n]+)").expect("invalid source pattern"),
    ]
});

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("invalid numeric pattern"));

/// Estimate the brand's ordinal position within one provider answer.
///
/// A superlative pattern referencing the brand forces rank 1 regardless of
/// where competitors appear. Otherwise ranking falls back to first-occurrence
/// order: the brand at the earliest offset is rank 1, and a later brand ranks
/// below every competitor whose first occurrence precedes it. Absent brand
/// means no rank.
pub fn estimate_rank(response: &str, brand_name: &str, competitors: &[String]) -> Option<u32> {
    let response_lower = response.to_lowercase();
    let brand_lower = brand_name.to_lowercase();

    let superlatives = [
        format!("{} is the best", brand_lower),
        format!("{} leads", brand_lower),
        format!("{} tops", brand_lower),
        format!("top choice is {}", brand_lower),
        format!("#1 is {}", brand_lower),
        format!("first place: {}", brand_lower),
    ];

    if superlatives.iter().any(|p| response_lower.contains(p)) {
        return Some(1);
    }

    let brand_position = response_lower.find(&brand_lower)?;

    let competitors_before = competitors
        .iter()
        .filter_map(|c| response_lower.find(&c.to_lowercase()))
        .filter(|&pos| pos < brand_position)
        .count() as u32;

    Some(competitors_before + 1)
}

/// Additive sentiment for competitive framing, on the full 1.0-5.0 scale.
/// Exactly neutral when the brand is absent.
pub fn score_sentiment(response: &str, brand_name: &str) -> f64 {
    let response_lower = response.to_lowercase();

    if !response_lower.contains(&brand_name.to_lowercase()) {
        return 3.0;
    }

    let positive = POSITIVE_FRAMING
        .iter()
        .filter(|w| response_lower.contains(*w))
        .count() as f64;
    let negative = NEGATIVE_FRAMING
        .iter()
        .filter(|w| response_lower.contains(*w))
        .count() as f64;

    let score = 3.0 + (positive * 0.3).min(2.0) - (negative * 0.3).min(2.0);
    score.clamp(1.0, 5.0)
}

/// Confidence in a provider answer, 0-100: length, brand presence,
/// competitor context, and numeric specificity.
pub fn calculate_confidence(
    response: &str,
    brand_mentions: &[String],
    competitor_mentions: &[String],
) -> f64 {
    let mut confidence = (response.len() as f64 / 1000.0).min(1.0) * 30.0;

    if !brand_mentions.is_empty() {
        confidence += 25.0;
    }

    if !competitor_mentions.is_empty() {
        confidence += (competitor_mentions.len() as f64 * 10.0).min(30.0);
    }

    let numeric_tokens = NUMERIC_TOKEN.find_iter(response).count();
    if numeric_tokens > 0 {
        confidence += (numeric_tokens as f64 * 2.0).min(15.0);
    }

    confidence.min(100.0)
}

/// URLs plus phrases following "according to" / "source:" / "study by" /
/// "research from".
pub fn extract_citations(response: &str) -> Vec<String> {
    let mut citations: Vec<String> = CITATION_URL
        .find_iter(response)
        .map(|m| m.as_str().to_string())
        .collect();

    for pattern in SOURCE_PHRASES.iter() {
        for caps in pattern.captures_iter(response) {
            if let Some(source) = caps.get(1) {
                citations.push(source.as_str().trim().to_string());
            }
        }
    }

    citations
}

/// Competitors whose names occur (case-insensitively) anywhere in the answer.
pub fn find_competitor_mentions(response: &str, competitors: &[String]) -> Vec<String> {
    let response_lower = response.to_lowercase();
    competitors
        .iter()
        .filter(|c| response_lower.contains(&c.to_lowercase()))
        .cloned()
        .collect()
}
