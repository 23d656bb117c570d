pub mod client;
pub mod paginator;
pub mod query;
pub mod rate_limiter;

pub use client::GitHubClient;
pub use query::SearchQuery;
pub use rate_limiter::RateLimiter;
