use futures::stream::{self, StreamExt};

use crate::dates::DateRange;
use crate::error::{Error, Result};
use crate::jira::changelog::{extract_transitions, lead_times, was_reopened};
use crate::jira::{JiraClient, JqlQuery};
use crate::metrics;
use crate::models::jira::Issue;
use crate::models::metrics::JiraActivityMetrics;

/// Cap on primary search results per query.
const SEARCH_CAP: usize = 200;

/// Per-item secondary fetches in flight at once.
const SECONDARY_FETCH_CONCURRENCY: usize = 5;

/// Compute engineering activity metrics for one Jira user over an
/// inclusive date range, optionally narrowed by an extra JQL clause.
pub async fn engineer_activity(
    client: &JiraClient,
    subject: &str,
    from: &str,
    to: &str,
    jql_extra: Option<&str>,
) -> Result<JiraActivityMetrics> {
    let range = DateRange::parse(from, to)?;
    tracing::info!(subject, from, to, "computing Jira engineering metrics");

    let assigned_jql = JqlQuery::new()
        .assignee(subject)
        .created_in(&range)
        .extra(jql_extra)
        .build();
    let assigned = client.search_issues(&assigned_jql, SEARCH_CAP).await?;

    let resolved_jql = JqlQuery::new()
        .assignee(subject)
        .resolved_in(&range)
        .resolved_statuses()
        .extra(jql_extra)
        .build();
    let resolved = client.search_issues(&resolved_jql, SEARCH_CAP).await?;

    let reopened = count_reopened(client, &assigned).await?;
    let lead_times = lead_times(&resolved);

    Ok(metrics::jira::compute(
        subject,
        &range,
        jql_extra,
        &assigned,
        resolved.len(),
        reopened,
        &lead_times,
    ))
}

/// Count issues that went back to active work after being resolved.
/// Issues whose search payload already carries a changelog are evaluated
/// in place; the rest go through a bounded per-issue fetch whose failures
/// are logged and skipped.
async fn count_reopened(client: &JiraClient, issues: &[Issue]) -> Result<usize> {
    let mut reopened = 0usize;
    let mut missing: Vec<&Issue> = Vec::new();

    for issue in issues {
        match &issue.changelog {
            Some(changelog) => {
                if was_reopened(&extract_transitions(changelog)) {
                    reopened += 1;
                }
            }
            None => missing.push(issue),
        }
    }

    if missing.is_empty() {
        return Ok(reopened);
    }

    let mut stream = stream::iter(missing)
        .map(|issue| async move {
            match client.issue_changelog(&issue.key).await {
                Ok(changelog) => Ok(Some(was_reopened(&extract_transitions(&changelog)))),
                Err(err @ Error::RateLimited { .. }) => Err(err),
                Err(err) => {
                    tracing::warn!(key = %issue.key, %err, "failed to fetch changelog, skipping");
                    Ok(None)
                }
            }
        })
        .buffer_unordered(SECONDARY_FETCH_CONCURRENCY);

    while let Some(result) = stream.next().await {
        if result? == Some(true) {
            reopened += 1;
        }
    }
    Ok(reopened)
}
