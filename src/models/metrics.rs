use std::collections::BTreeMap;

use serde::Serialize;

/// Metrics for one GitHub user over one date range.
#[derive(Debug, Clone, Serialize)]
pub struct GitHubActivityMetrics {
    pub login: String,
    pub from: String,
    pub to: String,
    /// `None` means all repositories the token can see.
    pub repositories: Option<Vec<String>>,
    pub pull_requests: PullRequestMetrics,
    pub cycle_times: CycleTimeMetrics,
    pub code_review: CodeReviewMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct PullRequestMetrics {
    pub authored: usize,
    pub merged: usize,
    /// merged / authored; 0 when nothing was authored.
    pub merge_rate: f64,
    pub authored_per_week: f64,
}

/// Hours from PR creation to merge, averaged over merged PRs with sane
/// timestamps. `average_hours` is `None` when no PR survived, which is
/// not the same as an average of zero.
#[derive(Debug, Clone, Serialize)]
pub struct CycleTimeMetrics {
    pub average_hours: Option<f64>,
    pub average_days: Option<f64>,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeReviewMetrics {
    pub reviews_given: usize,
    pub comments_written: usize,
    /// reviews_given / authored; 0 when nothing was authored.
    pub review_participation: f64,
}

/// Metrics for one Jira user over one date range.
#[derive(Debug, Clone, Serialize)]
pub struct JiraActivityMetrics {
    pub user: String,
    pub from: String,
    pub to: String,
    pub jql_filter: Option<String>,
    pub issues: IssueMetrics,
    pub lead_times: LeadTimeMetrics,
    pub issue_distribution: IssueDistribution,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueMetrics {
    pub assigned: usize,
    pub resolved: usize,
    /// resolved / assigned; 0 when nothing was assigned.
    pub resolution_rate: f64,
    pub reopened: usize,
    /// (resolved - reopened) / resolved; 0 when nothing was resolved.
    pub quality_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadTimeMetrics {
    pub average_hours: Option<f64>,
    pub average_days: Option<f64>,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueDistribution {
    pub types: BTreeMap<String, usize>,
    pub priorities: BTreeMap<String, usize>,
}

/// Metrics for one Confluence user over one date range.
#[derive(Debug, Clone, Serialize)]
pub struct ConfluenceActivityMetrics {
    pub user: String,
    pub from: String,
    pub to: String,
    pub space_filter: Option<String>,
    pub period_days: i64,
    pub content: ContentMetrics,
    pub engagement: EngagementMetrics,
    pub distribution: SpaceDistribution,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentMetrics {
    pub pages_created: usize,
    /// Updated by the subject but not created by them in the range.
    pub pages_updated: usize,
    pub total_content_activity: usize,
    pub creation_rate: f64,
    pub update_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngagementMetrics {
    pub comments_written: usize,
    pub comment_rate: f64,
    /// comments / (created + updated); 0 when there was no content activity.
    pub engagement_ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpaceDistribution {
    pub spaces_active: usize,
    pub spaces_breakdown: BTreeMap<String, SpaceActivity>,
    pub content_types: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SpaceActivity {
    pub created: usize,
    pub updated: usize,
}
