use crate::dates::{hours_between, parse_date};
use crate::models::jira::{Changelog, Issue, StatusTransition};

/// Workflow states counted as completion.
pub const RESOLVED_STATUSES: &[&str] = &["Done", "Resolved", "Closed", "Fix Released", "Complete"];

/// Workflow states counted as active work. States in neither set are
/// inert for reopened detection.
pub const ACTIVE_STATUSES: &[&str] = &[
    "Open",
    "In Progress",
    "To Do",
    "Reopened",
    "In Review",
    "Testing",
];

/// Pull the status changes out of a changelog, sorted by timestamp.
/// Histories without a usable timestamp are dropped.
pub fn extract_transitions(changelog: &Changelog) -> Vec<StatusTransition> {
    let mut transitions = Vec::new();

    for history in &changelog.histories {
        let Some(created) = history.created.as_deref() else {
            continue;
        };
        let at = match parse_date(created) {
            Ok(at) => at,
            Err(err) => {
                tracing::warn!(created, %err, "skipping changelog entry with unparseable timestamp");
                continue;
            }
        };

        for item in &history.items {
            if item.field != "status" {
                continue;
            }
            let Some(to_status) = item.to_string.clone() else {
                continue;
            };
            transitions.push(StatusTransition {
                at,
                from_status: item.from_string.clone(),
                to_status,
                actor: history
                    .author
                    .as_ref()
                    .and_then(|a| a.email_address.clone()),
            });
        }
    }

    transitions.sort_by_key(|t| t.at);
    transitions
}

/// Whether a transition list (sorted by timestamp) shows the issue going
/// back to an active state after reaching a resolved one. An issue counts
/// at most once no matter how often it flip-flops.
pub fn was_reopened(transitions: &[StatusTransition]) -> bool {
    let mut was_resolved = false;
    for transition in transitions {
        let to_status = transition.to_status.as_str();
        if RESOLVED_STATUSES.contains(&to_status) {
            was_resolved = true;
        } else if was_resolved && ACTIVE_STATUSES.contains(&to_status) {
            return true;
        }
    }
    false
}

/// Hours from creation to resolution for every issue carrying both
/// timestamps. Items whose resolution precedes creation are dropped, not
/// clamped, so clock-skewed data cannot distort the average.
pub fn lead_times(issues: &[Issue]) -> Vec<f64> {
    let mut lead_times = Vec::new();

    for issue in issues {
        let (Some(created), Some(resolved)) = (
            issue.fields.created.as_deref(),
            issue.fields.resolution_date.as_deref(),
        ) else {
            continue;
        };

        let (created, resolved) = match (parse_date(created), parse_date(resolved)) {
            (Ok(c), Ok(r)) => (c, r),
            _ => {
                tracing::warn!(key = %issue.key, "skipping issue with unparseable timestamps");
                continue;
            }
        };

        let hours = hours_between(created, resolved);
        if hours >= 0.0 {
            lead_times.push(hours);
        }
    }

    lead_times
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::jira::{ChangeHistory, ChangeItem, IssueFields};

    fn transition_history(at: &str, from: &str, to: &str) -> ChangeHistory {
        ChangeHistory {
            created: Some(at.to_string()),
            author: None,
            items: vec![ChangeItem {
                field: "status".to_string(),
                from_string: Some(from.to_string()),
                to_string: Some(to.to_string()),
            }],
        }
    }

    fn changelog(histories: Vec<ChangeHistory>) -> Changelog {
        Changelog { histories }
    }

    fn issue(key: &str, created: Option<&str>, resolved: Option<&str>) -> Issue {
        Issue {
            key: key.to_string(),
            fields: IssueFields {
                created: created.map(String::from),
                resolution_date: resolved.map(String::from),
                ..Default::default()
            },
            changelog: None,
        }
    }

    #[test]
    fn test_transitions_sorted_and_non_status_items_ignored() {
        let log = changelog(vec![
            transition_history("2024-01-03T10:00:00Z", "Open", "Done"),
            ChangeHistory {
                created: Some("2024-01-01T10:00:00Z".to_string()),
                author: None,
                items: vec![ChangeItem {
                    field: "assignee".to_string(),
                    from_string: None,
                    to_string: Some("alice".to_string()),
                }],
            },
            transition_history("2024-01-02T10:00:00Z", "To Do", "Open"),
        ]);

        let transitions = extract_transitions(&log);
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].to_status, "Open");
        assert_eq!(transitions[1].to_status, "Done");
    }

    #[test]
    fn test_reopened_once() {
        let log = changelog(vec![
            transition_history("2024-01-01T00:00:00Z", "To Do", "Open"),
            transition_history("2024-01-02T00:00:00Z", "Open", "Done"),
            transition_history("2024-01-03T00:00:00Z", "Done", "Open"),
        ]);
        assert!(was_reopened(&extract_transitions(&log)));
    }

    #[test]
    fn test_flip_flop_counts_once() {
        // Open→Done→Open→Done→Open is still one reopened issue
        let log = changelog(vec![
            transition_history("2024-01-01T00:00:00Z", "To Do", "Open"),
            transition_history("2024-01-02T00:00:00Z", "Open", "Done"),
            transition_history("2024-01-03T00:00:00Z", "Done", "Open"),
            transition_history("2024-01-04T00:00:00Z", "Open", "Done"),
            transition_history("2024-01-05T00:00:00Z", "Done", "Open"),
        ]);
        assert!(was_reopened(&extract_transitions(&log)));
    }

    #[test]
    fn test_never_resolved_is_not_reopened() {
        let log = changelog(vec![
            transition_history("2024-01-01T00:00:00Z", "To Do", "Open"),
            transition_history("2024-01-02T00:00:00Z", "Open", "In Progress"),
            transition_history("2024-01-03T00:00:00Z", "In Progress", "Open"),
        ]);
        assert!(!was_reopened(&extract_transitions(&log)));
    }

    #[test]
    fn test_unknown_states_are_inert() {
        // Done→Blocked→Waiting never touches an active state
        let log = changelog(vec![
            transition_history("2024-01-01T00:00:00Z", "Open", "Done"),
            transition_history("2024-01-02T00:00:00Z", "Done", "Blocked"),
            transition_history("2024-01-03T00:00:00Z", "Blocked", "Waiting"),
        ]);
        assert!(!was_reopened(&extract_transitions(&log)));
    }

    #[test]
    fn test_lead_times_average_inputs() {
        let issues = vec![
            issue("DEV-1", Some("2024-01-01T00:00:00Z"), Some("2024-01-01T05:00:00Z")),
            issue("DEV-2", Some("2024-01-01T00:00:00Z"), Some("2024-01-01T15:00:00Z")),
        ];
        let times = lead_times(&issues);
        assert_eq!(times, vec![5.0, 15.0]);
    }

    #[test]
    fn test_negative_lead_time_excluded() {
        let issues = vec![
            issue("DEV-1", Some("2024-01-02T00:00:00Z"), Some("2024-01-01T00:00:00Z")),
            issue("DEV-2", Some("2024-01-01T00:00:00Z"), Some("2024-01-01T10:00:00Z")),
        ];
        let times = lead_times(&issues);
        assert_eq!(times, vec![10.0]);
    }

    #[test]
    fn test_unresolved_issue_contributes_no_sample() {
        let issues = vec![issue("DEV-1", Some("2024-01-01T00:00:00Z"), None)];
        assert!(lead_times(&issues).is_empty());
    }
}
