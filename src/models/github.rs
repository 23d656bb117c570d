use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope returned by `GET /search/issues`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<SearchIssue>,
}

/// One item from the issue/PR search. The `pull_request` marker is only
/// present on items that are pull requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIssue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub repository_url: String,
    pub user: Option<Actor>,
    pub pull_request: Option<PullRequestRef>,
}

impl SearchIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Split `repository_url` (`.../repos/{owner}/{name}`) into its owner
    /// and name segments.
    pub fn repo_owner_and_name(&self) -> Option<(&str, &str)> {
        let mut parts = self.repository_url.rsplit('/');
        let name = parts.next()?;
        let owner = parts.next()?;
        if name.is_empty() || owner.is_empty() {
            return None;
        }
        Some((owner, name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRef {
    #[serde(default)]
    pub url: Option<String>,
}

/// Detail payload from `GET /repos/{owner}/{repo}/pulls/{number}`;
/// `merged_at` is `None` until the PR is merged.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestDetail {
    pub number: u64,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: String,
}

/// One review from `GET /repos/{owner}/{repo}/pulls/{number}/reviews`.
/// `submitted_at` is absent on PENDING reviews.
#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub id: u64,
    pub user: Option<Actor>,
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: String,
}

/// One review comment from `GET /repos/{owner}/{repo}/pulls/{number}/comments`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewComment {
    pub id: u64,
    pub user: Option<Actor>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_owner_and_name() {
        let issue: SearchIssue = serde_json::from_value(serde_json::json!({
            "number": 42,
            "created_at": "2024-01-05T12:00:00Z",
            "repository_url": "https://api.github.com/repos/acme/widgets",
            "pull_request": {}
        }))
        .unwrap();
        assert!(issue.is_pull_request());
        assert_eq!(issue.repo_owner_and_name(), Some(("acme", "widgets")));
    }

    #[test]
    fn test_plain_issue_has_no_pull_request_marker() {
        let issue: SearchIssue = serde_json::from_value(serde_json::json!({
            "number": 7,
            "created_at": "2024-01-05T12:00:00Z",
            "repository_url": "https://api.github.com/repos/acme/widgets"
        }))
        .unwrap();
        assert!(!issue.is_pull_request());
    }
}
