pub mod client;
pub mod query;

pub use client::ConfluenceClient;
pub use query::CqlQuery;
