pub mod sentiment;
pub mod extractor;
pub mod competitive;
pub mod grading;
pub mod engine;

pub use engine::BrandIntelligenceEngine;
pub use extractor::extract_mentions;
pub use sentiment::{analyze_sentiment, SentimentReading};
