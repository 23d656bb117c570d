use crate::dates::DateRange;
use crate::models::metrics::{
    CodeReviewMetrics, CycleTimeMetrics, GitHubActivityMetrics, PullRequestMetrics,
};

/// Fold the raw GitHub result sets into the fixed metrics shape. Pure
/// arithmetic, no I/O.
#[allow(clippy::too_many_arguments)]
pub fn compute(
    login: &str,
    range: &DateRange,
    repos: Option<&[String]>,
    authored: usize,
    merged: usize,
    cycle_times: &[f64],
    reviews_given: usize,
    comments_written: usize,
) -> GitHubActivityMetrics {
    let merge_rate = if authored > 0 {
        round2(merged as f64 / authored as f64)
    } else {
        0.0
    };
    let review_participation = if authored > 0 {
        round2(reviews_given as f64 / authored as f64)
    } else {
        0.0
    };

    let average_hours = average(cycle_times);

    GitHubActivityMetrics {
        login: login.to_string(),
        from: range.from.to_string(),
        to: range.to.to_string(),
        repositories: repos.map(|r| r.to_vec()),
        pull_requests: PullRequestMetrics {
            authored,
            merged,
            merge_rate,
            authored_per_week: round1(authored as f64 / range.weeks()),
        },
        cycle_times: CycleTimeMetrics {
            average_hours: average_hours.map(round1),
            average_days: average_hours.map(|h| round1(h / 24.0)),
            sample_count: cycle_times.len(),
        },
        code_review: CodeReviewMetrics {
            reviews_given,
            comments_written,
            review_participation,
        },
    }
}

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
