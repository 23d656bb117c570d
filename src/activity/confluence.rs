use std::collections::HashSet;

use futures::stream::{self, StreamExt};

use crate::confluence::{ConfluenceClient, CqlQuery};
use crate::dates::{parse_date, DateRange};
use crate::error::{Error, Result};
use crate::metrics;
use crate::models::confluence::Content;
use crate::models::metrics::ConfluenceActivityMetrics;

/// Cap on primary search results per query.
const SEARCH_CAP: usize = 200;

/// Smaller cap on the page set scanned for comments; each scanned page
/// costs one extra request.
const COMMENT_SCAN_CAP: usize = 100;

/// Per-item secondary fetches in flight at once.
const SECONDARY_FETCH_CONCURRENCY: usize = 5;

/// Compute documentation activity metrics for one Confluence user over an
/// inclusive date range, optionally scoped to a space.
pub async fn engineer_activity(
    client: &ConfluenceClient,
    subject: &str,
    from: &str,
    to: &str,
    space_key: Option<&str>,
) -> Result<ConfluenceActivityMetrics> {
    let range = DateRange::parse(from, to)?;
    tracing::info!(subject, from, to, "computing Confluence engineering metrics");

    let created_cql = CqlQuery::new()
        .creator(subject)
        .created_in(&range)
        .content_type("page")
        .space(space_key)
        .build();
    let created = client
        .search_content(&created_cql, "version,space,history", SEARCH_CAP)
        .await?;

    // CQL cannot filter by who last modified, so fetch the range
    // unfiltered and keep only pages whose last modifier is the subject.
    let updated_cql = CqlQuery::new()
        .last_modified_in(&range)
        .content_type("page")
        .space(space_key)
        .build();
    let updated_in_range = client
        .search_content(&updated_cql, "version,space,history.lastUpdated", SEARCH_CAP)
        .await?;
    let updated_by_subject = filter_last_modified_by(updated_in_range, subject);
    let updated_only = drop_created_overlap(&created, updated_by_subject);

    let comments_written = count_comments_by(client, subject, &range, space_key).await?;

    Ok(metrics::confluence::compute(
        subject,
        &range,
        space_key,
        &created,
        &updated_only,
        comments_written,
    ))
}

/// Keep only items whose recorded last modifier matches the subject by
/// email or account id. Skipping this step would attribute other
/// people's edits to the subject.
fn filter_last_modified_by(items: Vec<Content>, subject: &str) -> Vec<Content> {
    items
        .into_iter()
        .filter(|item| {
            item.history
                .as_ref()
                .and_then(|h| h.last_updated.as_ref())
                .and_then(|l| l.by.as_ref())
                .is_some_and(|by| by.matches(subject))
        })
        .collect()
}

/// Set-difference by page id: a page the subject created in the range is
/// counted as created, never also as updated.
fn drop_created_overlap(created: &[Content], updated: Vec<Content>) -> Vec<Content> {
    let created_ids: HashSet<&str> = created.iter().filter_map(|c| c.id.as_deref()).collect();
    updated
        .into_iter()
        .filter(|item| {
            item.id
                .as_deref()
                .map_or(true, |id| !created_ids.contains(id))
        })
        .collect()
}

/// Scan pages touched in the range and collect comments authored by the
/// subject whose own timestamp falls inside the range (a comment can be
/// newer or older than its page's modification window).
async fn count_comments_by(
    client: &ConfluenceClient,
    subject: &str,
    range: &DateRange,
    space_key: Option<&str>,
) -> Result<usize> {
    let scan_cql = CqlQuery::new()
        .last_modified_in(range)
        .content_type("page")
        .space(space_key)
        .build();
    let pages = client
        .search_content(&scan_cql, "version", COMMENT_SCAN_CAP)
        .await?;

    let mut stream = stream::iter(pages.iter().filter_map(|p| p.id.as_deref()))
        .map(|page_id| async move {
            match client.page_comments(page_id).await {
                Ok(comments) => Ok(comments
                    .iter()
                    .filter(|comment| comment_matches(comment, subject, range))
                    .count()),
                Err(err @ Error::RateLimited { .. }) => Err(err),
                Err(err) => {
                    tracing::warn!(page_id, %err, "failed to fetch page comments, skipping");
                    Ok(0)
                }
            }
        })
        .buffer_unordered(SECONDARY_FETCH_CONCURRENCY);

    let mut total = 0usize;
    while let Some(result) = stream.next().await {
        total += result?;
    }
    Ok(total)
}

fn comment_matches(comment: &Content, subject: &str, range: &DateRange) -> bool {
    let Some(version) = comment.version.as_ref() else {
        return false;
    };
    if !version.by.as_ref().is_some_and(|by| by.matches(subject)) {
        return false;
    }
    let Some(when) = version.when.as_deref() else {
        return false;
    };
    match parse_date(when) {
        Ok(at) => range.contains(at),
        Err(err) => {
            tracing::warn!(when, %err, "skipping comment with unparseable timestamp");
            false
        }
    }
}
