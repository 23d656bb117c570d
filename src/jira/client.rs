use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::AtlassianConfig;
use crate::error::{retry_after_secs, Error, Provider, Result};
use crate::models::jira::{Changelog, Issue, SearchResponse};

const PROVIDER: Provider = Provider::Jira;

/// Jira caps search pages at 100 results.
const MAX_RESULTS: usize = 100;

pub struct JiraClient {
    client: Client,
    config: AtlassianConfig,
}

impl JiraClient {
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
            "{}/rest/api/3/{}",
            self.config.base_url,
            endpoint.trim_start_matches('/')
        );
        tracing::debug!(%url, "Jira request");

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

    /// Run a JQL search with `startAt`/`maxResults` pagination, changelog
    /// expanded, accumulating up to `max_items` issues.
    pub async fn search_issues(&self, jql: &str, max_items: usize) -> Result<Vec<Issue>> {
        tracing::info!(%jql, "searching Jira issues");
        let page_size = MAX_RESULTS.min(max_items.max(1));
        let mut issues = Vec::new();
        let mut start_at = 0usize;

        while issues.len() < max_items {
            let params = [
                ("jql", jql.to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", page_size.to_string()),
                ("expand", "changelog".to_string()),
            ];
            let page: SearchResponse = self.get_json("search", &params).await?;

            let page_len = page.issues.len();
            if page_len == 0 {
                break;
            }
            issues.extend(page.issues);

            if page_len < page_size || issues.len() >= max_items {
                break;
            }
            start_at += page_size;
        }

        issues.truncate(max_items);
        Ok(issues)
    }

    /// Fetch one issue's changelog; used when a search result did not
    /// carry its history.
    pub async fn issue_changelog(&self, key: &str) -> Result<Changelog> {
        let endpoint = format!("issue/{key}");
        let issue: Issue = self
            .get_json(&endpoint, &[("expand", "changelog".to_string())])
            .await?;
        Ok(issue.changelog.unwrap_or_default())
    }
}
