//! Configuration for the Jira client
//!
//! Settings come from a TOML table and may be overridden by the
//! `JIRA_BASE_URL`, `JIRA_EMAIL` and `JIRA_API_TOKEN` environment variables.
//! Missing credentials are not fatal: [`JiraConfig::check`] reports them so the
//! caller can decide what to surface.

use crate::criteria::DEFAULT_CRITERIA_FIELDS;
use crate::error::JiraError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Environment variable holding the Jira base URL
pub const ENV_BASE_URL: &str = "JIRA_BASE_URL";
/// Environment variable holding the account email
pub const ENV_EMAIL: &str = "JIRA_EMAIL";
/// Environment variable holding the API token
pub const ENV_API_TOKEN: &str = "JIRA_API_TOKEN";

/// Jira connection settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Site URL, e.g. "https://example.atlassian.net"
    #[serde(default)]
    pub base_url: String,

    /// Account email used for basic auth
    #[serde(default)]
    pub email: String,

    /// API token used for basic auth
    #[serde(default, skip_serializing)]
    pub api_token: String,

    /// Custom fields probed for acceptance criteria, in priority order
    #[serde(default = "default_criteria_fields")]
    pub criteria_fields: Vec<String>,
}

fn default_criteria_fields() -> Vec<String> {
    DEFAULT_CRITERIA_FIELDS.iter().map(|f| f.to_string()).collect()
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("criteria_fields", &self.criteria_fields)
            .finish()
    }
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            email: String::new(),
            api_token: String::new(),
            criteria_fields: default_criteria_fields(),
        }
    }
}

impl JiraConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, JiraError> {
        toml::from_str(toml_str)
            .map_err(|e| JiraError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, JiraError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            JiraError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Configuration from the environment only
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Replace settings with any non-empty environment variables
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Replace settings using a variable lookup.
    ///
    /// Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(email) = get(ENV_EMAIL) {
            self.email = email;
        }
        if let Some(token) = get(ENV_API_TOKEN) {
            self.api_token = token;
        }
        self
    }

    /// Validate the configuration without failing
    pub fn check(&self) -> ConfigCheck {
        let mut issues = Vec::new();

        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::MissingBaseUrl);
        } else if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            issues.push(ConfigIssue::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.email.trim().is_empty() {
            issues.push(ConfigIssue::MissingEmail);
        }
        if self.api_token.trim().is_empty() {
            issues.push(ConfigIssue::MissingApiToken);
        }
        if self.criteria_fields.is_empty() {
            issues.push(ConfigIssue::NoCriteriaFields);
        }

        ConfigCheck { issues }
    }
}

/// A single configuration problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConfigIssue {
    /// No base URL configured
    MissingBaseUrl,
    /// Base URL is not http(s)
    InvalidBaseUrl(String),
    /// No account email configured
    MissingEmail,
    /// No API token configured
    MissingApiToken,
    /// Custom field probing disabled
    NoCriteriaFields,
}

impl ConfigIssue {
    /// Operator-facing explanation
    pub fn message(&self) -> String {
        match self {
            ConfigIssue::MissingBaseUrl => format!(
                "{} is not set; Jira requests will fail until it points at your site",
                ENV_BASE_URL
            ),
            ConfigIssue::InvalidBaseUrl(url) => format!(
                "{} '{}' should start with https:// (e.g. https://your-site.atlassian.net)",
                ENV_BASE_URL, url
            ),
            ConfigIssue::MissingEmail => format!(
                "{} is not set; Jira will reject requests as unauthenticated",
                ENV_EMAIL
            ),
            ConfigIssue::MissingApiToken => format!(
                "{} is not set; create one at id.atlassian.com and export it",
                ENV_API_TOKEN
            ),
            ConfigIssue::NoCriteriaFields => {
                "criteria_fields is empty; acceptance criteria will only be found by label or description"
                    .to_string()
            }
        }
    }

    /// Whether Jira calls will fail outright because of this issue
    pub fn is_blocking(&self) -> bool {
        !matches!(self, ConfigIssue::NoCriteriaFields)
    }
}

/// Result of validating a [`JiraConfig`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigCheck {
    /// Problems found, empty when fully configured
    pub issues: Vec<ConfigIssue>,
}

impl ConfigCheck {
    /// Whether Jira calls can be expected to authenticate
    pub fn is_ready(&self) -> bool {
        !self.issues.iter().any(ConfigIssue::is_blocking)
    }

    /// Explanations for every issue
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ConfigIssue::message).collect()
    }
}
