use crate::error::Result;
use crate::github::client::GitHubClient;
use crate::models::github::{SearchIssue, SearchResponse};

/// GitHub caps search pages at 100 items.
const MAX_PER_PAGE: usize = 100;

/// Walks `page`/`per_page` search pagination, accumulating items until a
/// short page signals the end of data or the cap is reached. Page size is
/// the smaller of the provider maximum and the cap, so a capped query
/// issues at most `ceil(cap / per_page)` requests.
pub(crate) struct Paginator<'a> {
    client: &'a GitHubClient,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub async fn fetch_limited(&self, query: &str, max_items: usize) -> Result<Vec<SearchIssue>> {
        let per_page = MAX_PER_PAGE.min(max_items.max(1));
        let mut items = Vec::new();
        let mut page = 1usize;

        while items.len() < max_items {
            let params = [
                ("q", query.to_string()),
                ("sort", "created".to_string()),
                ("order", "desc".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ];
            let response: SearchResponse = self.client.get_json("search/issues", &params).await?;

            let page_len = response.items.len();
            if page_len == 0 {
                break;
            }
            items.extend(response.items);

            if page_len < per_page || items.len() >= max_items {
                break;
            }
            page += 1;
        }

        items.truncate(max_items);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GitHubConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_page(count: usize, offset: usize) -> serde_json::Value {
        let items: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "number": i + offset,
                    "created_at": "2024-01-05T12:00:00Z",
                    "repository_url": "https://api.github.com/repos/acme/widgets",
                    "pull_request": {}
                })
            })
            .collect();
        serde_json::json!({
            "total_count": 1000,
            "incomplete_results": false,
            "items": items
        })
    }

    fn test_client(server: &MockServer) -> GitHubClient {
        let config = GitHubConfig {
            token: "t".to_string(),
        };
        GitHubClient::new(&config, 5).unwrap().with_base_url(&server.uri())
    }

    #[tokio::test]
    async fn stops_at_cap_without_extra_requests() {
        let server = MockServer::start().await;

        // Cap 150 with per_page 100: exactly two requests, never a third.
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_page(100, 0)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_page(100, 100)))
            .expect(1)
            .mount(&server)
            .await;

        let items = test_client(&server)
            .search_pull_requests("type:pr", 150)
            .await
            .unwrap();
        assert_eq!(items.len(), 150);
    }

    #[tokio::test]
    async fn short_page_ends_pagination() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_page(100, 0)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_page(7, 100)))
            .expect(1)
            .mount(&server)
            .await;

        let items = test_client(&server)
            .search_pull_requests("type:pr", 500)
            .await
            .unwrap();
        assert_eq!(items.len(), 107);
    }

    #[tokio::test]
    async fn small_cap_shrinks_page_size() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("per_page", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_page(25, 0)))
            .expect(1)
            .mount(&server)
            .await;

        let items = test_client(&server)
            .search_pull_requests("type:pr", 25)
            .await
            .unwrap();
        assert_eq!(items.len(), 25);
    }

    #[tokio::test]
    async fn empty_first_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_page(0, 0)))
            .expect(1)
            .mount(&server)
            .await;

        let items = test_client(&server)
            .search_pull_requests("type:pr", 100)
            .await
            .unwrap();
        assert!(items.is_empty());
    }
}
