use crate::dates::DateRange;
use crate::jira::changelog::RESOLVED_STATUSES;

/// JQL builder assembling typed clauses joined with `AND`. Escaping and
/// date bounds live here so they are tested away from the metric logic.
#[derive(Debug, Clone, Default)]
pub struct JqlQuery {
    clauses: Vec<String>,
}

impl JqlQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assignee(mut self, subject: &str) -> Self {
        self.clauses.push(format!("assignee = {}", escape_jql_value(subject)));
        self
    }

    /// `created` bounded to the inclusive range; the upper bound is the day
    /// after `to`, compared with `<`, so the whole `to` day is included.
    pub fn created_in(mut self, range: &DateRange) -> Self {
        self.clauses.push(format!("created >= \"{}\"", range.lower_bound()));
        self.clauses
            .push(format!("created < \"{}\"", range.upper_bound_exclusive()));
        self
    }

    /// Same bounds on the `resolved` date.
    pub fn resolved_in(mut self, range: &DateRange) -> Self {
        self.clauses.push(format!("resolved >= \"{}\"", range.lower_bound()));
        self.clauses
            .push(format!("resolved < \"{}\"", range.upper_bound_exclusive()));
        self
    }

    /// Restrict to workflow states representing completion.
    pub fn resolved_statuses(mut self) -> Self {
        let statuses = RESOLVED_STATUSES
            .iter()
            .map(|s| escape_jql_value(s))
            .collect::<Vec<_>>()
            .join(", ");
        self.clauses.push(format!("status in ({statuses})"));
        self
    }

    /// Append a caller-supplied JQL clause verbatim (project, labels, ...).
    pub fn extra(mut self, clause: Option<&str>) -> Self {
        if let Some(clause) = clause {
            let clause = clause.trim();
            if !clause.is_empty() {
                self.clauses.push(clause.to_string());
            }
        }
        self
    }

    pub fn build(self) -> String {
        self.clauses.join(" AND ")
    }
}

/// Quote a JQL value unless it is plain alphanumeric.
fn escape_jql_value(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
