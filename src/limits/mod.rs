pub mod cache;
pub mod rate_limiter;

pub use cache::SearchCache;
pub use rate_limiter::RateLimiter;
