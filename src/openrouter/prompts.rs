//! Prompt builders for the three engine operations.

pub const SEARCH_SYSTEM_PROMPT: &str = "You are a brand intelligence analyst. \
Provide detailed information about brand mentions, including context, sentiment, \
and any referenced sources.";

pub fn search_prompt(brand_name: &str, keywords: &[String]) -> String {
    let keyword_str = keywords.join(", ");
    format!(
        "Search your knowledge base for recent mentions, discussions, news, and \
         information about {brand_name}. Focus on content related to: {keyword_str}. \
         Provide specific examples with context, sentiment analysis, and any \
         referenced sources or links."
    )
}

pub fn competitive_prompt(query: &str, brand_name: &str, competitors: &[String]) -> String {
    let top_competitors = competitors
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Query: \"{query}\"\n\n\
         Please provide a comprehensive response to this query. I need to analyze:\n\
         1. How {brand_name} compares to competitors like {top_competitors}\n\
         2. Specific rankings or recommendations\n\
         3. Any citations or sources you reference\n\
         4. Key factors that influence recommendations\n\n\
         Please be thorough and specific in your analysis."
    )
}

pub fn grading_prompt(prompt: &str, content: &str, brand_name: &str) -> String {
    format!(
        "Analyze this content about {brand_name} for the prompt \"{prompt}\" and \
         provide detailed grading:\n\n\
         CONTENT TO ANALYZE:\n{content}\n\n\
         Please provide a JSON response with:\n\
         1. overall_grade (A-F)\n\
         2. numerical_score (0-100)\n\
         3. authority_score (0-100) - how authoritative and expert the content appears\n\
         4. relevance_score (0-100) - how well it matches the prompt\n\
         5. completeness_score (0-100) - how comprehensive the coverage is\n\
         6. strengths (array of 3-5 specific strengths)\n\
         7. weaknesses (array of 3-5 specific areas for improvement)\n\
         8. recommendations (array of 3-5 specific improvement suggestions)\n\n\
         Focus on practical, actionable feedback for improving AI search rankings."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competitive_prompt_names_three_competitors_at_most() {
        let competitors: Vec<String> = ["Ford", "GM", "Rivian", "Mercedes", "BMW"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let prompt = competitive_prompt("best electric car", "Tesla", &competitors);
        assert!(prompt.contains("Ford, GM, Rivian"));
        assert!(!prompt.contains("Mercedes"));
    }

    #[test]
    fn test_search_prompt_includes_brand_and_keywords() {
        let keywords = vec!["widgets".to_string(), "gadgets".to_string()];
        let prompt = search_prompt("Acme", &keywords);
        assert!(prompt.contains("Acme"));
        assert!(prompt.contains("widgets, gadgets"));
    }
}
