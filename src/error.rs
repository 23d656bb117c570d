use std::fmt;

use thiserror::Error;

/// The upstream platform an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GitHub,
    Jira,
    Confluence,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::GitHub => write!(f, "GitHub"),
            Provider::Jira => write!(f, "Jira"),
            Provider::Confluence => write!(f, "Confluence"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{provider} authentication failed, check your credentials")]
    Authentication { provider: Provider },

    #[error("{provider} access forbidden")]
    Permission { provider: Provider },

    #[error("{provider} resource not found")]
    NotFound { provider: Provider },

    #[error("{provider} rate limit exceeded{}", .retry_after.map(|s| format!(", retry after {s} seconds")).unwrap_or_default())]
    RateLimited {
        provider: Provider,
        retry_after: Option<u64>,
    },

    #[error("{provider} network error: {source}")]
    Network {
        provider: Provider,
        source: reqwest::Error,
    },

    #[error("{provider} API request failed with status {status}: {body}")]
    Api {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {provider} response: {source}")]
    Decode {
        provider: Provider,
        source: reqwest::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Numeric `Retry-After` seconds, if the response carries one.
pub(crate) fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

impl Error {
    /// Map a non-2xx status to the most specific error kind.
    pub fn from_status(
        provider: Provider,
        status: u16,
        retry_after: Option<u64>,
        body: String,
    ) -> Self {
        match status {
            401 => Error::Authentication { provider },
            403 => Error::Permission { provider },
            404 => Error::NotFound { provider },
            429 => Error::RateLimited {
                provider,
                retry_after,
            },
            _ => Error::Api {
                provider,
                status,
                body,
            },
        }
    }

    pub fn network(provider: Provider, source: reqwest::Error) -> Self {
        Error::Network { provider, source }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimited { .. } | Error::Network { .. })
    }

    pub fn provider(&self) -> Option<Provider> {
        match self {
            Error::Authentication { provider }
            | Error::Permission { provider }
            | Error::NotFound { provider }
            | Error::RateLimited { provider, .. }
            | Error::Network { provider, .. }
            | Error::Api { provider, .. }
            | Error::Decode { provider, .. } => Some(*provider),
            _ => None,
        }
    }
}
