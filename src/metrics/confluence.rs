use std::collections::BTreeMap;

use crate::dates::DateRange;
use crate::models::confluence::Content;
use crate::models::metrics::{
    ConfluenceActivityMetrics, ContentMetrics, EngagementMetrics, SpaceActivity, SpaceDistribution,
};

/// Fold the raw Confluence result sets into the fixed metrics shape.
/// `updated_only` must already exclude pages the subject created in the
/// range. Pure arithmetic, no I/O.
pub fn compute(
    user: &str,
    range: &DateRange,
    space_filter: Option<&str>,
    created: &[Content],
    updated_only: &[Content],
    comments_written: usize,
) -> ConfluenceActivityMetrics {
    let pages_created = created.len();
    let pages_updated = updated_only.len();
    let total_activity = pages_created + pages_updated;
    let weeks = range.weeks();

    let engagement_ratio = if total_activity > 0 {
        round1(comments_written as f64 / total_activity as f64)
    } else {
        0.0
    };

    let mut spaces: BTreeMap<String, SpaceActivity> = BTreeMap::new();
    let mut content_types: BTreeMap<String, usize> = BTreeMap::new();
    for page in created {
        spaces.entry(space_name(page)).or_default().created += 1;
        *content_types.entry(type_name(page)).or_insert(0) += 1;
    }
    for page in updated_only {
        spaces.entry(space_name(page)).or_default().updated += 1;
        *content_types.entry(type_name(page)).or_insert(0) += 1;
    }

    ConfluenceActivityMetrics {
        user: user.to_string(),
        from: range.from.to_string(),
        to: range.to.to_string(),
        space_filter: space_filter.map(String::from),
        period_days: range.days(),
        content: ContentMetrics {
            pages_created,
            pages_updated,
            total_content_activity: total_activity,
            creation_rate: round1(pages_created as f64 / weeks),
            update_rate: round1(pages_updated as f64 / weeks),
        },
        engagement: EngagementMetrics {
            comments_written,
            comment_rate: round1(comments_written as f64 / weeks),
            engagement_ratio,
        },
        distribution: SpaceDistribution {
            spaces_active: spaces.len(),
            spaces_breakdown: spaces,
            content_types,
        },
    }
}

fn space_name(page: &Content) -> String {
    page.space
        .as_ref()
        .and_then(|s| s.name.clone().or_else(|| s.key.clone()))
        .unwrap_or_else(|| "Unknown".to_string())
}

fn type_name(page: &Content) -> String {
    page.content_type
        .clone()
        .unwrap_or_else(|| "Unknown".to_string())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
