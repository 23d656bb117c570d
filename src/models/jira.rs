use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Envelope returned by `GET /rest/api/3/search`.
///
/// Jira timestamps use compact offsets (`+0000`) that are not RFC 3339,
/// so they stay `String` here and go through `dates::parse_date` at use.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default, rename = "startAt")]
    pub start_at: u64,
    #[serde(default, rename = "maxResults")]
    pub max_results: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
    pub changelog: Option<Changelog>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
    pub created: Option<String>,
    #[serde(rename = "resolutiondate")]
    pub resolution_date: Option<String>,
    #[serde(rename = "issuetype")]
    pub issue_type: Option<NamedField>,
    pub priority: Option<NamedField>,
    pub status: Option<NamedField>,
    pub assignee: Option<UserRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedField {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// Changelog attached by `expand=changelog`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<ChangeHistory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeHistory {
    pub created: Option<String>,
    pub author: Option<UserRef>,
    #[serde(default)]
    pub items: Vec<ChangeItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeItem {
    #[serde(default)]
    pub field: String,
    #[serde(rename = "fromString")]
    pub from_string: Option<String>,
    #[serde(rename = "toString")]
    pub to_string: Option<String>,
}

/// One status change extracted from the changelog, ordered by `at`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub at: DateTime<Utc>,
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor: Option<String>,
}
