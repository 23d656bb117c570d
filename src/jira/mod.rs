pub mod changelog;
pub mod client;
pub mod query;

pub use client::JiraClient;
pub use query::JqlQuery;
