use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::BrandAnalysis;

/// Time-boxed cache of search results keyed by normalized (brand, keywords).
/// Expired entries are evicted lazily on lookup. Single-process, in-memory;
/// the engine guards it with a mutex.
pub struct SearchCache {
    entries: HashMap<String, (BrandAnalysis, Instant)>,
    ttl: Duration,
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Stable key: lowercased brand plus sorted, deduplicated keywords, so
    /// any permutation of the same keyword list hits the same entry.
    pub fn key(brand_name: &str, keywords: &[String]) -> String {
        let mut normalized: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        normalized.sort();
        normalized.dedup();
        format!("{}|{}", brand_name.to_lowercase(), normalized.join(","))
    }

    pub fn get(&mut self, key: &str) -> Option<BrandAnalysis> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&mut self, key: String, analysis: BrandAnalysis) {
        self.insert_at(key, analysis, Instant::now());
    }

    fn get_at(&mut self, key: &str, now: Instant) -> Option<BrandAnalysis> {
        match self.entries.get(key) {
            Some((analysis, inserted)) if now.duration_since(*inserted) < self.ttl => {
                Some(analysis.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn insert_at(&mut self, key: String, analysis: BrandAnalysis, now: Instant) {
        self.entries.insert(key, (analysis, now));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_permutation_independent() {
        let a = SearchCache::key(
            "Acme",
            &["widgets".to_string(), "gadgets".to_string()],
        );
        let b = SearchCache::key(
            "acme",
            &["Gadgets".to_string(), "widgets".to_string()],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_separates_different_brands() {
        let keywords = vec!["widgets".to_string()];
        assert_ne!(
            SearchCache::key("Acme", &keywords),
            SearchCache::key("Apex", &keywords)
        );
    }

    #[test]
    fn test_fresh_entry_is_returned() {
        let mut cache = SearchCache::new(Duration::from_secs(3600));
        let key = SearchCache::key("Acme", &[]);
        cache.insert(key.clone(), BrandAnalysis::empty("Acme"));
        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn test_expired_entry_is_evicted_on_lookup() {
        let mut cache = SearchCache::new(Duration::from_secs(3600));
        let key = SearchCache::key("Acme", &[]);
        let now = Instant::now();
        cache.insert_at(key.clone(), BrandAnalysis::empty("Acme"), now);

        let later = now + Duration::from_secs(3601);
        assert!(cache.get_at(&key, later).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_entry_just_under_ttl_survives() {
        let mut cache = SearchCache::new(Duration::from_secs(3600));
        let key = SearchCache::key("Acme", &[]);
        let now = Instant::now();
        cache.insert_at(key.clone(), BrandAnalysis::empty("Acme"), now);
        assert!(cache.get_at(&key, now + Duration::from_secs(3599)).is_some());
    }
}
