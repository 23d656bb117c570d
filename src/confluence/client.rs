use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::AtlassianConfig;
use crate::error::{retry_after_secs, Error, Provider, Result};
use crate::models::confluence::{Content, SearchResponse};

const PROVIDER: Provider = Provider::Confluence;

/// Confluence serves at most 50 content results per page.
const MAX_LIMIT: usize = 50;

pub struct ConfluenceClient {
    client: Client,
    config: AtlassianConfig,
}

impl ConfluenceClient {
    pub fn new(config: &AtlassianConfig, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// For testing: point the client at a mock server.
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!(
            "{}/rest/api/{}",
            self.config.base_url,
            endpoint.trim_start_matches('/')
        );
        tracing::debug!(%url, "Confluence request");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.email, Some(&self.config.api_token))
            .query(params)
            .send()
            .await
            .map_err(|e| Error::network(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_status(PROVIDER, status.as_u16(), retry_after, body));
        }

        response
            .json()
            .await
            .map_err(|source| Error::Decode {
                provider: PROVIDER,
                source,
            })
    }

    /// Run a CQL content search with `start`/`limit` pagination,
    /// accumulating up to `max_items` results.
    pub async fn search_content(
        &self,
        cql: &str,
        expand: &str,
        max_items: usize,
    ) -> Result<Vec<Content>> {
        tracing::info!(%cql, "searching Confluence content");
        let limit = MAX_LIMIT.min(max_items.max(1));
        let mut items = Vec::new();
        let mut start = 0usize;

        while items.len() < max_items {
            let params = [
                ("cql", cql.to_string()),
                ("expand", expand.to_string()),
                ("start", start.to_string()),
                ("limit", limit.to_string()),
            ];
            let page: SearchResponse = self.get_json("content/search", &params).await?;

            let page_len = page.results.len();
            if page_len == 0 {
                break;
            }
            items.extend(page.results);

            if page_len < limit || items.len() >= max_items {
                break;
            }
            start += limit;
        }

        items.truncate(max_items);
        Ok(items)
    }

    /// Child comments of one page, with authorship and timestamp expanded.
    pub async fn page_comments(&self, page_id: &str) -> Result<Vec<Content>> {
        let endpoint = format!("content/{page_id}/child/comment");
        let response: SearchResponse = self
            .get_json(&endpoint, &[("expand", "version".to_string())])
            .await?;
        Ok(response.results)
    }
}
