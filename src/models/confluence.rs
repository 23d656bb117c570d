use serde::Deserialize;

/// Envelope returned by `GET /rest/api/content/search` and the child
/// comment endpoint. Timestamps are `String`s parsed at use, same as Jira.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Content>,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub size: u64,
}

/// A content object: page, blog post, or comment. Comments reuse this
/// shape; their author and timestamp live under `version`.
#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub space: Option<Space>,
    pub history: Option<ContentHistory>,
    pub version: Option<Version>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    pub key: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentHistory {
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<LastUpdated>,
    #[serde(rename = "createdBy")]
    pub created_by: Option<UserRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastUpdated {
    pub by: Option<UserRef>,
    pub when: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    pub by: Option<UserRef>,
    pub when: Option<String>,
    #[serde(default)]
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

impl UserRef {
    /// Whether this user matches a subject given as email or account id.
    pub fn matches(&self, subject: &str) -> bool {
        self.email.as_deref() == Some(subject) || self.account_id.as_deref() == Some(subject)
    }
}
