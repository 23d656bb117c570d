use crate::dates::DateRange;

/// GitHub search-qualifier builder. Qualifiers are space-joined; repeated
/// `repo:` qualifiers inside one group act as alternatives.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    qualifiers: Vec<String>,
}

impl SearchQuery {
    /// Base query for pull requests created inside the range.
    pub fn pull_requests(range: &DateRange) -> Self {
        Self {
            qualifiers: vec!["type:pr".to_string(), range.query_fragment("created")],
        }
    }

    pub fn author(mut self, login: &str) -> Self {
        self.qualifiers.push(format!("author:{login}"));
        self
    }

    /// Restrict to a set of `owner/name` repositories; `None` or an empty
    /// slice leaves the query unscoped.
    pub fn repos(mut self, repos: Option<&[String]>) -> Self {
        if let Some(repos) = repos {
            if !repos.is_empty() {
                let group = repos
                    .iter()
                    .map(|r| format!("repo:{r}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                self.qualifiers.push(format!("({group})"));
            }
        }
        self
    }

    pub fn build(self) -> String {
        self.qualifiers.join(" ")
    }
}
