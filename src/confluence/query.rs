use crate::dates::DateRange;

/// CQL builder assembling typed clauses joined with `AND`.
#[derive(Debug, Clone, Default)]
pub struct CqlQuery {
    clauses: Vec<String>,
}

impl CqlQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn creator(mut self, subject: &str) -> Self {
        self.clauses.push(format!("creator = {}", quote_cql(subject)));
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

    /// Same bounds on `lastModified`. CQL cannot filter by who modified;
    /// callers must post-filter by the actual last modifier.
    pub fn last_modified_in(mut self, range: &DateRange) -> Self {
        self.clauses
            .push(format!("lastModified >= \"{}\"", range.lower_bound()));
        self.clauses
            .push(format!("lastModified < \"{}\"", range.upper_bound_exclusive()));
        self
    }

    pub fn content_type(mut self, kind: &str) -> Self {
        self.clauses.push(format!("type = {kind}"));
        self
    }

    pub fn space(mut self, space_key: Option<&str>) -> Self {
        if let Some(key) = space_key {
            self.clauses.push(format!("space = {}", quote_cql(key)));
        }
        self
    }

    pub fn build(self) -> String {
        self.clauses.join(" AND ")
    }
}

fn quote_cql(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
