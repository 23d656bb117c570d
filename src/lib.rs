pub mod activity;
pub mod config;
pub mod confluence;
pub mod dates;
pub mod error;
pub mod github;
pub mod jira;
pub mod metrics;
pub mod models;

pub use config::Config;
pub use confluence::ConfluenceClient;
pub use error::{Error, Provider, Result};
pub use github::GitHubClient;
pub use jira::JiraClient;
