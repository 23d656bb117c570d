use std::env;

use crate::error::{Error, Result};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials and endpoints for all three providers. Each block is
/// optional at load time; a provider client refuses construction without
/// its block (raised as a `Config` error before any query runs).
#[derive(Debug, Clone)]
pub struct Config {
    pub github: Option<GitHubConfig>,
    pub jira: Option<AtlassianConfig>,
    pub confluence: Option<AtlassianConfig>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
}

/// Jira and Confluence share the same credential shape: site base URL plus
/// email + API token presented as basic auth.
#[derive(Debug, Clone)]
pub struct AtlassianConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        let github = env::var("GITHUB_TOKEN")
            .ok()
            .map(|token| GitHubConfig { token });

        let jira = atlassian_from_env("JIRA_BASE_URL", "JIRA_EMAIL", "JIRA_API_TOKEN");
        let confluence = atlassian_from_env(
            "CONFLUENCE_BASE_URL",
            "CONFLUENCE_EMAIL",
            "CONFLUENCE_API_TOKEN",
        );

        let timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            github,
            jira,
            confluence,
            timeout_secs,
        }
    }

    pub fn github(&self) -> Result<&GitHubConfig> {
        self.github
            .as_ref()
            .ok_or_else(|| Error::Config("GITHUB_TOKEN environment variable not set".to_string()))
    }

    pub fn jira(&self) -> Result<&AtlassianConfig> {
        self.jira.as_ref().ok_or_else(|| {
            Error::Config(
                "JIRA_BASE_URL, JIRA_EMAIL and JIRA_API_TOKEN environment variables are required"
                    .to_string(),
            )
        })
    }

    pub fn confluence(&self) -> Result<&AtlassianConfig> {
        self.confluence.as_ref().ok_or_else(|| {
            Error::Config(
                "CONFLUENCE_BASE_URL, CONFLUENCE_EMAIL and CONFLUENCE_API_TOKEN environment variables are required"
                    .to_string(),
            )
        })
    }
}

fn atlassian_from_env(url_var: &str, email_var: &str, token_var: &str) -> Option<AtlassianConfig> {
    let base_url = env::var(url_var).ok()?;
    let email = env::var(email_var).ok()?;
    let api_token = env::var(token_var).ok()?;
    Some(AtlassianConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        email,
        api_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env vars are process-global; serialize tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_missing_github_block_is_config_error() {
        let _g = ENV_LOCK.lock().unwrap();
        env::remove_var("GITHUB_TOKEN");
        let config = Config::from_env();
        assert!(matches!(config.github(), Err(Error::Config(_))));
    }

    #[test]
    fn test_partial_atlassian_block_is_ignored() {
        let _g = ENV_LOCK.lock().unwrap();
        env::set_var("JIRA_BASE_URL", "https://example.atlassian.net");
        env::remove_var("JIRA_EMAIL");
        env::remove_var("JIRA_API_TOKEN");
        let config = Config::from_env();
        assert!(config.jira.is_none());
        env::remove_var("JIRA_BASE_URL");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let _g = ENV_LOCK.lock().unwrap();
        env::set_var("CONFLUENCE_BASE_URL", "https://example.atlassian.net/wiki/");
        env::set_var("CONFLUENCE_EMAIL", "a@b.com");
        env::set_var("CONFLUENCE_API_TOKEN", "tok");
        let config = Config::from_env();
        assert_eq!(
            config.confluence().unwrap().base_url,
            "https://example.atlassian.net/wiki"
        );
        env::remove_var("CONFLUENCE_BASE_URL");
        env::remove_var("CONFLUENCE_EMAIL");
        env::remove_var("CONFLUENCE_API_TOKEN");
    }
}
