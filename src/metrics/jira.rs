use std::collections::BTreeMap;

use crate::dates::DateRange;
use crate::models::jira::Issue;
use crate::models::metrics::{
    IssueDistribution, IssueMetrics, JiraActivityMetrics, LeadTimeMetrics,
};

/// Fold the raw Jira result sets into the fixed metrics shape. Pure
/// arithmetic, no I/O.
pub fn compute(
    user: &str,
    range: &DateRange,
    jql_filter: Option<&str>,
    assigned: &[Issue],
    resolved: usize,
    reopened: usize,
    lead_times: &[f64],
) -> JiraActivityMetrics {
    let assigned_count = assigned.len();
    let resolution_rate = if assigned_count > 0 {
        round2(resolved as f64 / assigned_count as f64)
    } else {
        0.0
    };
    let quality_score = if resolved > 0 {
        round2((resolved as f64 - reopened as f64) / resolved as f64)
    } else {
        0.0
    };

    let mut types: BTreeMap<String, usize> = BTreeMap::new();
    let mut priorities: BTreeMap<String, usize> = BTreeMap::new();
    for issue in assigned {
        let issue_type = issue
            .fields
            .issue_type
            .as_ref()
            .map_or("Unknown", |t| t.name.as_str());
        *types.entry(issue_type.to_string()).or_insert(0) += 1;

        let priority = issue
            .fields
            .priority
            .as_ref()
            .map_or("Unknown", |p| p.name.as_str());
        *priorities.entry(priority.to_string()).or_insert(0) += 1;
    }

    let average_hours = average(lead_times);

    JiraActivityMetrics {
        user: user.to_string(),
        from: range.from.to_string(),
        to: range.to.to_string(),
        jql_filter: jql_filter.map(String::from),
        issues: IssueMetrics {
            assigned: assigned_count,
            resolved,
            resolution_rate,
            reopened,
            quality_score,
        },
        lead_times: LeadTimeMetrics {
            average_hours: average_hours.map(round1),
            average_days: average_hours.map(|h| round1(h / 24.0)),
            sample_count: lead_times.len(),
        },
        issue_distribution: IssueDistribution { types, priorities },
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::jira::{IssueFields, NamedField};

    fn range() -> DateRange {
        DateRange::parse("2024-01-01", "2024-01-10").unwrap()
    }

    fn issue(issue_type: Option<&str>, priority: Option<&str>) -> Issue {
        Issue {
            key: "DEV-1".to_string(),
            fields: IssueFields {
                issue_type: issue_type.map(|name| NamedField {
                    name: name.to_string(),
                }),
                priority: priority.map(|name| NamedField {
                    name: name.to_string(),
                }),
                ..Default::default()
            },
            changelog: None,
        }
    }

    #[test]
    fn test_rates_and_lead_times() {
        let assigned = vec![
            issue(Some("Bug"), Some("High")),
            issue(Some("Bug"), Some("Low")),
            issue(Some("Task"), Some("High")),
            issue(None, None),
        ];
        let metrics = compute(
            "alice@example.com",
            &range(),
            Some("project = DEV"),
            &assigned,
            2,
            1,
            &[5.0, 15.0],
        );

        assert_eq!(metrics.issues.assigned, 4);
        assert_eq!(metrics.issues.resolution_rate, 0.5);
        assert_eq!(metrics.issues.quality_score, 0.5);
        assert_eq!(metrics.lead_times.average_hours, Some(10.0));
        assert_eq!(metrics.lead_times.average_days, Some(0.4));
        assert_eq!(metrics.lead_times.sample_count, 2);
        assert_eq!(metrics.issue_distribution.types["Bug"], 2);
        assert_eq!(metrics.issue_distribution.types["Task"], 1);
        assert_eq!(metrics.issue_distribution.types["Unknown"], 1);
        assert_eq!(metrics.issue_distribution.priorities["High"], 2);
    }

    #[test]
    fn test_zero_assigned_guards_resolution_rate() {
        let metrics = compute("alice@example.com", &range(), None, &[], 0, 0, &[]);
        assert_eq!(metrics.issues.resolution_rate, 0.0);
        assert_eq!(metrics.issues.quality_score, 0.0);
        assert!(metrics.issues.resolution_rate.is_finite());
    }

    #[test]
    fn test_no_resolved_issues_yields_no_average() {
        let metrics = compute("alice@example.com", &range(), None, &[], 0, 0, &[]);
        assert_eq!(metrics.lead_times.average_hours, None);
        assert_eq!(metrics.lead_times.sample_count, 0);
    }
}
