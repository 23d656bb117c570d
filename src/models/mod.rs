pub mod confluence;
pub mod github;
pub mod jira;
pub mod metrics;
