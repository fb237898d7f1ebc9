use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use brandpulse::models::{BrandAnalysis, CompetitiveAnalysis, ContentGrade};
use brandpulse::{
    BrandIntelligenceEngine, Config, EngineConfig, OpenRouterClient, Storage,
};

#[derive(Parser, Debug)]
#[command(name = "brandpulse")]
#[command(version = "0.1.0")]
#[command(about = "Analyze brand visibility and sentiment across AI providers")]
struct Args {
    /// Output format (json, text)
    #[arg(short, long, default_value = "text", global = true)]
    format: String,

    /// Database path for storing results
    #[arg(long, default_value = "brandpulse.db", global = true)]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for brand mentions across all providers
    Search {
        /// Brand name to search for
        #[arg(short, long)]
        brand: String,

        /// Comma-separated keywords to focus the search
        #[arg(short, long, value_delimiter = ',')]
        keywords: Vec<String>,
    },

    /// Test a competitive prompt against every provider
    Compete {
        /// The prompt to test
        #[arg(short, long)]
        prompt: String,

        /// Brand name to rank
        #[arg(short, long)]
        brand: String,

        /// Comma-separated competitor names
        #[arg(short, long, value_delimiter = ',')]
        competitors: Vec<String>,
    },

    /// Grade a piece of content against a prompt
    Grade {
        /// The prompt the content targets
        #[arg(short, long)]
        prompt: String,

        /// File containing the content to grade
        #[arg(short, long)]
        content_file: String,

        /// Brand name the content is about
        #[arg(short, long)]
        brand: String,
    },

    /// Show stored analysis history for a brand
    History {
        /// Brand name to look up
        #[arg(short, long)]
        brand: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("brandpulse=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Command::History { ref brand } = args.command {
        let storage = Storage::new(&args.database)?;
        return show_history(&storage, brand);
    }

    let config = Config::from_env()?;
    let gateway = OpenRouterClient::new(&config.openrouter_api_key, config.request_timeout_secs)?;
    let engine = BrandIntelligenceEngine::new(gateway, EngineConfig::from(&config));

    match args.command {
        Command::Search { brand, keywords } => {
            tracing::info!("Searching brand mentions for: {}", brand);
            let analysis = engine.search(&brand, &keywords).await;

            // The in-memory result stands even if saving fails.
            match Storage::new(&args.database) {
                Ok(mut storage) => {
                    if let Err(e) = storage.persist(&brand, &analysis, &keywords) {
                        tracing::error!("Failed to persist analysis: {}", e);
                    }
                }
                Err(e) => tracing::error!("Failed to open database: {}", e),
            }

            output_search(&analysis, &args.format)?;
        }
        Command::Compete {
            prompt,
            brand,
            competitors,
        } => {
            tracing::info!("Testing competitive prompt for: {}", brand);
            let analysis = engine.test_across_providers(&prompt, &brand, &competitors).await;
            output_competitive(&analysis, &args.format)?;
        }
        Command::Grade {
            prompt,
            content_file,
            brand,
        } => {
            let content = std::fs::read_to_string(&content_file)?;
            tracing::info!("Grading content for prompt: {}", prompt);
            let grade = engine.grade_content(&prompt, &content, &brand).await;
            output_grade(&grade, &args.format)?;
        }
        Command::History { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn show_history(storage: &Storage, brand: &str) -> anyhow::Result<()> {
    match storage.brand_stats(brand)? {
        Some(stats) => {
            println!("\n=== {} ===\n", stats.brand_name);
            println!("Visibility score: {:.1}", stats.visibility_score);
            println!("Total mentions:   {}", stats.total_mentions);
            println!("Avg sentiment:    {:.2}", stats.avg_sentiment);
            println!("Last analysis:    {}", stats.last_analysis);

            let reports = storage.recent_reports(brand, 10)?;
            if !reports.is_empty() {
                println!("\nRecent analyses:");
                for report in reports {
                    println!(
                        "  {} - {} mentions, visibility {:.1} (keywords: {})",
                        report.created_at,
                        report.total_mentions,
                        report.visibility_score,
                        report.search_keywords.join(", ")
                    );
                }
            }
        }
        None => println!("No stored analyses for {}", brand),
    }
    Ok(())
}

fn output_search(analysis: &BrandAnalysis, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(analysis)?);
        return Ok(());
    }

    println!("\n=== Brand Analysis: {} ===\n", analysis.brand_name);
    if analysis.analysis_metadata.rate_limited {
        println!("Rate limited - try again in a minute.\n");
    }
    println!("Visibility score: {:.1}/100", analysis.visibility_score);
    println!("Total mentions:   {}", analysis.total_mentions);
    println!(
        "Providers:        {}",
        analysis.analysis_metadata.providers_used.join(", ")
    );

    let dist = &analysis.sentiment_distribution;
    println!("\nSentiment distribution:");
    println!("  very positive: {}", dist.very_positive);
    println!("  positive:      {}", dist.positive);
    println!("  neutral:       {}", dist.neutral);
    println!("  negative:      {}", dist.negative);
    println!("  very negative: {}", dist.very_negative);

    if !analysis.mentions.is_empty() {
        println!("\nMentions:");
        for mention in &analysis.mentions {
            println!(
                "  [{}] {} ({:.0}% confidence)",
                mention.provider,
                mention.sentiment_label,
                mention.confidence * 100.0
            );
            println!("    {}", mention.context);
        }
    }

    Ok(())
}

fn output_competitive(analysis: &CompetitiveAnalysis, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(analysis)?);
        return Ok(());
    }

    println!("\n=== Competitive Analysis ===\n");
    println!("Prompt: {}", analysis.prompt);
    if !analysis.best_performer.is_empty() {
        println!("Best performer: {}", analysis.best_performer);
    }

    println!("\nPer-provider results:");
    for result in &analysis.results {
        let rank = result
            .rank_position
            .map(|r| format!("#{}", r))
            .unwrap_or_else(|| "unranked".to_string());
        println!(
            "  {} - {} (sentiment {:.1}, confidence {:.0}, {:.1}s)",
            result.provider, rank, result.sentiment_score, result.confidence, result.response_time
        );
    }

    if !analysis.competitive_gaps.is_empty() {
        println!("\nCompetitive gaps:");
        for gap in &analysis.competitive_gaps {
            println!(
                "  {} ranks #{} (gap {}, opportunity {})",
                gap.provider, gap.current_rank, gap.gap_size, gap.opportunity_score
            );
        }
    }

    if !analysis.improvement_opportunities.is_empty() {
        println!("\nOpportunities:");
        for opportunity in &analysis.improvement_opportunities {
            println!("  - {}", opportunity);
        }
    }

    Ok(())
}

fn output_grade(grade: &ContentGrade, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(grade)?);
        return Ok(());
    }

    println!("\n=== Content Grade: {} ({}) ===\n", grade.overall_grade, grade.numerical_score);
    println!("Authority:    {}/100", grade.authority_score);
    println!("Relevance:    {}/100", grade.relevance_score);
    println!("Completeness: {}/100", grade.completeness_score);

    println!("\nStrengths:");
    for item in &grade.strengths {
        println!("  + {}", item);
    }
    println!("\nWeaknesses:");
    for item in &grade.weaknesses {
        println!("  - {}", item);
    }
    println!("\nRecommendations:");
    for item in &grade.recommendations {
        println!("  * {}", item);
    }

    Ok(())
}
