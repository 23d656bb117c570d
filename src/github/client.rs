use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::GitHubConfig;
use crate::error::{retry_after_secs, Error, Provider, Result};
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::RateLimiter;
use crate::models::github::{PullRequestDetail, Review, ReviewComment, SearchIssue};

const PROVIDER: Provider = Provider::GitHub;

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig, timeout_secs: u64) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.token))
                .map_err(|_| Error::Config("GITHUB_TOKEN contains invalid characters".to_string()))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static("devpulse/0.1"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(),
            base_url: "https://api.github.com".to_string(),
        })
    }

    /// For testing: point the client at a mock server.
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.wait().await;
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        tracing::debug!(%url, "GitHub request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| Error::network(PROVIDER, e))?;
        self.rate_limiter.update_from_response(&response);

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

    /// Search issues/PRs, newest first, up to `max_items`.
    pub async fn search_pull_requests(
        &self,
        query: &str,
        max_items: usize,
    ) -> Result<Vec<SearchIssue>> {
        tracing::info!(%query, "searching GitHub pull requests");
        Paginator::new(self).fetch_limited(query, max_items).await
    }

    pub async fn pr_details(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetail> {
        let endpoint = format!("repos/{owner}/{repo}/pulls/{number}");
        self.get_json(&endpoint, &[]).await
    }

    pub async fn pr_reviews(&self, owner: &str, repo: &str, number: u64) -> Result<Vec<Review>> {
        let endpoint = format!("repos/{owner}/{repo}/pulls/{number}/reviews");
        self.get_json(&endpoint, &[]).await
    }

    pub async fn pr_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<ReviewComment>> {
        let endpoint = format!("repos/{owner}/{repo}/pulls/{number}/comments");
        self.get_json(&endpoint, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> GitHubClient {
        let config = GitHubConfig {
            token: "test-token".to_string(),
        };
        GitHubClient::new(&config, 5).unwrap().with_base_url(&server.uri())
    }

    #[tokio::test]
    async fn maps_401_to_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/1"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .pr_details("acme", "widgets", 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Authentication {
                provider: Provider::GitHub
            }
        ));
    }

    #[tokio::test]
    async fn maps_429_with_retry_after_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/1"))
            .respond_with(
                ResponseTemplate::new(429).insert_header("Retry-After", "30"),
            )
            .mount(&server)
            .await;

        let err = test_client(&server)
            .pr_details("acme", "widgets", 1)
            .await
            .unwrap_err();
        match err {
            Error::RateLimited {
                provider,
                retry_after,
            } => {
                assert_eq!(provider, Provider::GitHub);
                assert_eq!(retry_after, Some(30));
            }
            other => panic!("expected RateLimited, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn maps_404_and_other_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/2"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert!(matches!(
            client.pr_details("acme", "widgets", 1).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            client.pr_details("acme", "widgets", 2).await.unwrap_err(),
            Error::Api { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn sends_auth_and_api_version_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/1"))
            .and(wiremock::matchers::header("Authorization", "Bearer test-token"))
            .and(wiremock::matchers::header_exists("X-GitHub-Api-Version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "number": 1,
                "created_at": "2024-01-05T12:00:00Z",
                "merged_at": null,
                "state": "open"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let detail = test_client(&server)
            .pr_details("acme", "widgets", 1)
            .await
            .unwrap();
        assert_eq!(detail.number, 1);
        assert!(detail.merged_at.is_none());
    }
}
