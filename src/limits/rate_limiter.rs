use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Sliding per-minute call budget. Calls land in integer minute buckets;
/// buckets older than the previous minute are pruned on each check. A call
/// is admitted only while the current bucket sits below the ceiling.
pub struct RateLimiter {
    buckets: HashMap<u64, u32>,
    ceiling: u32,
}

impl RateLimiter {
    pub fn new(ceiling: u32) -> Self {
        Self {
            buckets: HashMap::new(),
            ceiling,
        }
    }

    pub fn try_acquire(&mut self) -> bool {
        let minute = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() / 60)
            .unwrap_or(0);
        self.try_acquire_at(minute)
    }

    pub fn try_acquire_at(&mut self, minute: u64) -> bool {
        self.buckets
            .retain(|&bucket, _| bucket + 1 >= minute);

        let count = self.buckets.entry(minute).or_insert(0);
        if *count >= self.ceiling {
            return false;
        }
        *count += 1;
        true
    }
}
