use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::Result;
use crate::models::BrandAnalysis;

pub struct Storage {
    conn: Connection,
}

/// Rolling per-brand stats kept up to date by `persist`.
#[derive(Debug, Clone)]
pub struct BrandStats {
    pub brand_name: String,
    pub visibility_score: f64,
    pub total_mentions: u32,
    pub avg_sentiment: f64,
    pub last_analysis: String,
}

#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub total_mentions: u32,
    pub visibility_score: f64,
    pub search_keywords: Vec<String>,
    pub created_at: String,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS brands (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                visibility_score REAL NOT NULL DEFAULT 0,
                total_mentions INTEGER NOT NULL DEFAULT 0,
                avg_sentiment REAL NOT NULL DEFAULT 3.0,
                last_analysis TEXT
            );

            CREATE TABLE IF NOT EXISTS analysis_reports (
                id INTEGER PRIMARY KEY,
                brand_id INTEGER NOT NULL REFERENCES brands(id),
                total_mentions INTEGER NOT NULL,
                sentiment_distribution TEXT NOT NULL,
                visibility_score REAL NOT NULL,
                analysis_metadata TEXT,
                search_keywords TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS mentions (
                id INTEGER PRIMARY KEY,
                brand_id INTEGER NOT NULL REFERENCES brands(id),
                report_id INTEGER NOT NULL REFERENCES analysis_reports(id),
                content TEXT NOT NULL,
                sentiment_score INTEGER NOT NULL,
                sentiment_label TEXT NOT NULL,
                confidence REAL NOT NULL,
                source_urls TEXT,
                context TEXT,
                provider TEXT NOT NULL,
                keywords_found TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_reports_brand_id ON analysis_reports(brand_id);
            CREATE INDEX IF NOT EXISTS idx_mentions_brand_id ON mentions(brand_id);
            CREATE INDEX IF NOT EXISTS idx_mentions_report_id ON mentions(report_id);
            "#,
        )?;

        Ok(())
    }

    /// Upsert the brand's rolling stats, append one report row, and append
    /// one row per mention, all in a single transaction.
    pub fn persist(
        &mut self,
        brand_name: &str,
        analysis: &BrandAnalysis,
        keywords: &[String],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;

        let timestamp = analysis.analysis_metadata.search_timestamp.to_rfc3339();
        let avg_sentiment = analysis.average_sentiment();

        tx.execute(
            r#"
            INSERT INTO brands (name, visibility_score, total_mentions, avg_sentiment, last_analysis)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(name) DO UPDATE SET
                visibility_score = excluded.visibility_score,
                total_mentions = excluded.total_mentions,
                avg_sentiment = excluded.avg_sentiment,
                last_analysis = excluded.last_analysis
            "#,
            params![
                brand_name,
                analysis.visibility_score,
                analysis.total_mentions,
                avg_sentiment,
                timestamp,
            ],
        )?;

        let brand_id: i64 = tx.query_row(
            "SELECT id FROM brands WHERE name = ?1",
            params![brand_name],
            |row| row.get(0),
        )?;

        tx.execute(
            r#"
            INSERT INTO analysis_reports
                (brand_id, total_mentions, sentiment_distribution, visibility_score,
                 analysis_metadata, search_keywords, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                brand_id,
                analysis.total_mentions,
                serde_json::to_string(&analysis.sentiment_distribution)?,
                analysis.visibility_score,
                serde_json::to_string(&analysis.analysis_metadata)?,
                serde_json::to_string(keywords)?,
                timestamp,
            ],
        )?;

        let report_id = tx.last_insert_rowid();

        for mention in &analysis.mentions {
            tx.execute(
                r#"
                INSERT INTO mentions
                    (brand_id, report_id, content, sentiment_score, sentiment_label,
                     confidence, source_urls, context, provider, keywords_found, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
                params![
                    brand_id,
                    report_id,
                    mention.content,
                    mention.sentiment_score,
                    mention.sentiment_label.as_str(),
                    mention.confidence,
                    serde_json::to_string(&mention.source_urls)?,
                    mention.context,
                    mention.provider,
                    serde_json::to_string(&mention.keywords_found)?,
                    mention.timestamp.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    pub fn brand_stats(&self, brand_name: &str) -> Result<Option<BrandStats>> {
        let result = self.conn.query_row(
            r#"
            SELECT name, visibility_score, total_mentions, avg_sentiment, last_analysis
            FROM brands WHERE name = ?1
            "#,
            params![brand_name],
            |row| {
                Ok(BrandStats {
                    brand_name: row.get(0)?,
                    visibility_score: row.get(1)?,
                    total_mentions: row.get(2)?,
                    avg_sentiment: row.get(3)?,
                    last_analysis: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                })
            },
        );

        match result {
            Ok(stats) => Ok(Some(stats)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn recent_reports(&self, brand_name: &str, limit: u32) -> Result<Vec<ReportSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT r.total_mentions, r.visibility_score, r.search_keywords, r.created_at
            FROM analysis_reports r
            JOIN brands b ON r.brand_id = b.id
            WHERE b.name = ?1
            ORDER BY r.created_at DESC
            LIMIT ?2
            "#,
        )?;

        let reports = stmt.query_map(params![brand_name, limit], |row| {
            let keywords_json: String = row.get(2)?;
            Ok(ReportSummary {
                total_mentions: row.get(0)?,
                visibility_score: row.get(1)?,
                search_keywords: serde_json::from_str(&keywords_json).unwrap_or_default(),
                created_at: row.get(3)?,
            })
        })?;

        reports
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub fn mention_count(&self, brand_name: &str) -> Result<u32> {
        let count = self.conn.query_row(
            r#"
            SELECT COUNT(*) FROM mentions m
            JOIN brands b ON m.brand_id = b.id
            WHERE b.name = ?1
            "#,
            params![brand_name],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extractor::extract_mentions;
    use crate::analysis::engine::BrandIntelligenceEngine;

    fn sample_analysis() -> BrandAnalysis {
        let text = "Acme shipped excellent widgets, see https://example.com/a.\n\n\
                    Acme reported a problem with delivery.";
        let mentions = extract_mentions(text, "Acme", &["widgets".to_string()], "ChatGPT");
        BrandIntelligenceEngine::aggregate("Acme", mentions)
    }

    #[test]
    fn test_persist_round_trip() {
        let mut storage = Storage::in_memory().unwrap();
        let analysis = sample_analysis();
        let keywords = vec!["widgets".to_string()];

        storage.persist("Acme", &analysis, &keywords).unwrap();

        let stats = storage.brand_stats("Acme").unwrap().unwrap();
        assert_eq!(stats.total_mentions, 2);
        assert_eq!(stats.visibility_score, analysis.visibility_score);
        assert_eq!(stats.avg_sentiment, 3.0);

        assert_eq!(storage.mention_count("Acme").unwrap(), 2);

        let reports = storage.recent_reports("Acme", 10).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].search_keywords, keywords);
    }

    #[test]
    fn test_persist_upserts_single_brand_row() {
        let mut storage = Storage::in_memory().unwrap();
        let analysis = sample_analysis();

        storage.persist("Acme", &analysis, &[]).unwrap();
        storage.persist("Acme", &analysis, &[]).unwrap();

        let reports = storage.recent_reports("Acme", 10).unwrap();
        assert_eq!(reports.len(), 2);

        // One brands row, rolling stats overwritten.
        let count: i64 = storage
            .conn
            .query_row("SELECT COUNT(*) FROM brands", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_empty_analysis_persists_neutral_sentiment() {
        let mut storage = Storage::in_memory().unwrap();
        let analysis = BrandAnalysis::empty("Ghost");

        storage.persist("Ghost", &analysis, &[]).unwrap();

        let stats = storage.brand_stats("Ghost").unwrap().unwrap();
        assert_eq!(stats.total_mentions, 0);
        assert_eq!(stats.avg_sentiment, 3.0);
        assert_eq!(storage.mention_count("Ghost").unwrap(), 0);
    }

    #[test]
    fn test_unknown_brand_has_no_stats() {
        let storage = Storage::in_memory().unwrap();
        assert!(storage.brand_stats("Nobody").unwrap().is_none());
    }
}
