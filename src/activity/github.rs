use futures::stream::{self, StreamExt};

use crate::dates::{hours_between, DateRange};
use crate::error::{Error, Result};
use crate::github::{GitHubClient, SearchQuery};
use crate::metrics;
use crate::models::github::{PullRequestDetail, SearchIssue};
use crate::models::metrics::GitHubActivityMetrics;

/// Cap on primary search results per query.
const SEARCH_CAP: usize = 200;

/// Smaller cap on the PR set scanned for reviews/comments; each scanned
/// PR costs one extra request per sub-resource.
const REVIEW_SCAN_CAP: usize = 50;

/// Per-item secondary fetches in flight at once.
const SECONDARY_FETCH_CONCURRENCY: usize = 5;

/// Compute engineering activity metrics for one GitHub user over an
/// inclusive date range, optionally scoped to a repository list.
pub async fn engineer_activity(
    client: &GitHubClient,
    login: &str,
    from: &str,
    to: &str,
    repos: Option<&[String]>,
) -> Result<GitHubActivityMetrics> {
    let range = DateRange::parse(from, to)?;
    tracing::info!(login, from, to, "computing GitHub engineering metrics");

    let authored_query = SearchQuery::pull_requests(&range)
        .author(login)
        .repos(repos)
        .build();
    let authored: Vec<SearchIssue> = client
        .search_pull_requests(&authored_query, SEARCH_CAP)
        .await?
        .into_iter()
        .filter(SearchIssue::is_pull_request)
        .collect();

    let details = fetch_pr_details(client, &authored).await?;
    let merged: Vec<&PullRequestDetail> =
        details.iter().filter(|d| d.merged_at.is_some()).collect();
    let cycle_times: Vec<f64> = merged
        .iter()
        .filter_map(|d| {
            let hours = hours_between(d.created_at, d.merged_at?);
            (hours >= 0.0).then_some(hours)
        })
        .collect();

    // No direct search for "reviews by user" exists; scan PRs touched in
    // the range and check each one's reviews and comments for the subject.
    let scan_query = SearchQuery::pull_requests(&range).repos(repos).build();
    let scan_prs: Vec<SearchIssue> = client
        .search_pull_requests(&scan_query, REVIEW_SCAN_CAP)
        .await?
        .into_iter()
        .filter(SearchIssue::is_pull_request)
        .collect();

    let reviews_given = count_reviews_by(client, &scan_prs, login, &range).await?;
    let comments_written = count_review_comments_by(client, &scan_prs, login, &range).await?;

    Ok(metrics::github::compute(
        login,
        &range,
        repos,
        authored.len(),
        merged.len(),
        &cycle_times,
        reviews_given,
        comments_written,
    ))
}

/// Fetch per-PR detail with bounded concurrency. Individual failures are
/// logged and the PR is skipped; a rate limit aborts the whole batch.
async fn fetch_pr_details(
    client: &GitHubClient,
    prs: &[SearchIssue],
) -> Result<Vec<PullRequestDetail>> {
    let mut stream = stream::iter(prs)
        .map(|pr| async move {
            let Some((owner, repo)) = pr.repo_owner_and_name() else {
                tracing::warn!(number = pr.number, url = %pr.repository_url, "skipping PR with unparseable repository url");
                return Ok(None);
            };
            match client.pr_details(owner, repo, pr.number).await {
                Ok(detail) => Ok(Some(detail)),
                Err(err @ Error::RateLimited { .. }) => Err(err),
                Err(err) => {
                    tracing::warn!(number = pr.number, %err, "failed to fetch PR details, skipping");
                    Ok(None)
                }
            }
        })
        .buffer_unordered(SECONDARY_FETCH_CONCURRENCY);

    let mut details = Vec::new();
    while let Some(result) = stream.next().await {
        if let Some(detail) = result? {
            details.push(detail);
        }
    }
    Ok(details)
}

async fn count_reviews_by(
    client: &GitHubClient,
    prs: &[SearchIssue],
    login: &str,
    range: &DateRange,
) -> Result<usize> {
    let mut stream = stream::iter(prs)
        .map(|pr| async move {
            let Some((owner, repo)) = pr.repo_owner_and_name() else {
                return Ok(0);
            };
            match client.pr_reviews(owner, repo, pr.number).await {
                Ok(reviews) => Ok(reviews
                    .iter()
                    .filter(|review| {
                        review.user.as_ref().map(|u| u.login.as_str()) == Some(login)
                            && review.submitted_at.is_some_and(|at| range.contains(at))
                    })
                    .count()),
                Err(err @ Error::RateLimited { .. }) => Err(err),
                Err(err) => {
                    tracing::warn!(number = pr.number, %err, "failed to fetch PR reviews, skipping");
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

async fn count_review_comments_by(
    client: &GitHubClient,
    prs: &[SearchIssue],
    login: &str,
    range: &DateRange,
) -> Result<usize> {
    let mut stream = stream::iter(prs)
        .map(|pr| async move {
            let Some((owner, repo)) = pr.repo_owner_and_name() else {
                return Ok(0);
            };
            match client.pr_comments(owner, repo, pr.number).await {
                Ok(comments) => Ok(comments
                    .iter()
                    .filter(|comment| {
                        comment.user.as_ref().map(|u| u.login.as_str()) == Some(login)
                            && range.contains(comment.created_at)
                    })
                    .count()),
                Err(err @ Error::RateLimited { .. }) => Err(err),
                Err(err) => {
                    tracing::warn!(number = pr.number, %err, "failed to fetch PR comments, skipping");
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
