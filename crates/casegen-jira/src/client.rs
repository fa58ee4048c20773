//! Jira client: version fallback, status mapping and story normalization.

use crate::config::JiraConfig;
use crate::criteria::CriteriaLocator;
use crate::error::JiraError;
use crate::fields::description_text;
use crate::issue::RawIssue;
use crate::transport::{ApiRequest, ApiResponse, ApiVersion, HttpTransport, ReqwestTransport};
use casegen_domain::report::PROBE_ISSUE_LIMIT;
use casegen_domain::{ConnectionReport, NormalizedStory, RecentIssue};
use serde_json::{json, Value};
use tracing::{info, warn};

/// HTTP status Jira uses for endpoints that have been removed
pub const STATUS_GONE: u16 = 410;

/// Query used by the connection probe: newest issues, no filter
pub const PROBE_JQL: &str = "ORDER BY created DESC";

/// Fields requested by the connection probe
pub const PROBE_FIELDS: [&str; 2] = ["summary", "status"];

/// Client for the Jira REST API
#[derive(Debug, Clone)]
pub struct JiraClient<T> {
    transport: T,
    locator: CriteriaLocator,
}

impl JiraClient<ReqwestTransport> {
    /// Create a client talking to a real Jira site
    pub fn from_config(config: &JiraConfig) -> Result<Self, JiraError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(
            transport,
            CriteriaLocator::new(config.criteria_fields.clone()),
        ))
    }
}

impl<T: HttpTransport> JiraClient<T> {
    /// Create a client over any transport
    pub fn new(transport: T, locator: CriteriaLocator) -> Self {
        Self { transport, locator }
    }

    /// Create a client with the default acceptance-criteria fields
    pub fn with_transport(transport: T) -> Self {
        Self::new(transport, CriteriaLocator::default())
    }

    /// Fetch an issue record.
    ///
    /// Uses API v3 with field labels. When v3 answers 410 Gone the request is
    /// retried once on v2, which returns no labels.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the key does not exist or is not visible
    /// - `AuthFailure` on 401/403
    /// - `Transport` on any other non-success status
    /// - `Connectivity` when no response was received
    /// - `MalformedResponse` when the body is not an issue
    pub async fn fetch_issue(&self, key: &str) -> Result<RawIssue, JiraError> {
        let key = key.trim();
        if !is_valid_key(key) {
            return Err(JiraError::NotFound {
                resource: key.to_string(),
            });
        }

        info!("Fetching Jira issue {}", key);

        let primary = ApiRequest::get(ApiVersion::V3.issue_path(key)).with_query("expand", "names");
        let mut response = self.send(&primary).await?;

        if response.status == STATUS_GONE {
            warn!("Jira API v3 returned 410 for {}, retrying on API v2", key);
            let legacy = ApiRequest::get(ApiVersion::V2.issue_path(key));
            response = self.send(&legacy).await?;
        }

        if !response.is_success() {
            return Err(JiraError::from_status(response.status, key, &response.body));
        }

        RawIssue::from_json(&response.body, key)
    }

    /// Fetch an issue and flatten it to a story
    pub async fn fetch_story(&self, key: &str) -> Result<NormalizedStory, JiraError> {
        let issue = self.fetch_issue(key).await?;
        Ok(self.normalize(&issue))
    }

    /// Flatten a raw issue to a story
    pub fn normalize(&self, issue: &RawIssue) -> NormalizedStory {
        let description = description_text(issue.description());
        let acceptance_criteria = self.locator.locate(issue, &description);

        let story = NormalizedStory {
            key: issue.key.clone(),
            title: issue.summary().to_string(),
            description,
            acceptance_criteria,
        };
        if !story.has_acceptance_criteria() {
            info!("No acceptance criteria found for {}", story.key);
        }
        story
    }

    /// Probe the configured credentials by listing the newest issues.
    ///
    /// Read-only. Falls back to the legacy search endpoint on any failure of
    /// the primary one.
    pub async fn test_connection(&self) -> Result<ConnectionReport, JiraError> {
        let primary = ApiRequest::post(
            ApiVersion::V3.path("/search/jql"),
            json!({
                "jql": PROBE_JQL,
                "maxResults": PROBE_ISSUE_LIMIT,
                "fields": PROBE_FIELDS,
            }),
        );

        let issues = match self.search(&primary).await {
            Ok(issues) => issues,
            Err(e) => {
                warn!("Jira search on API v3 failed ({}), retrying on API v2", e);
                let legacy = ApiRequest::get(ApiVersion::V2.path("/search"))
                    .with_query("jql", PROBE_JQL)
                    .with_query("maxResults", PROBE_ISSUE_LIMIT.to_string())
                    .with_query("fields", PROBE_FIELDS.join(","));
                self.search(&legacy).await?
            }
        };

        info!("Jira connection probe returned {} issues", issues.len());
        Ok(ConnectionReport::from_issues(issues))
    }

    async fn search(&self, request: &ApiRequest) -> Result<Vec<RecentIssue>, JiraError> {
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(JiraError::from_status(
                response.status,
                &request.path,
                &response.body,
            ));
        }
        parse_search(&response.body)
    }

    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, JiraError> {
        self.transport.execute(request).await.map_err(JiraError::from)
    }
}

/// Parse a search response into abbreviated issues
pub fn parse_search(body: &str) -> Result<Vec<RecentIssue>, JiraError> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| JiraError::MalformedResponse(format!("search result is not valid JSON: {}", e)))?;

    let issues = root
        .get("issues")
        .and_then(Value::as_array)
        .ok_or_else(|| JiraError::MalformedResponse("search result has no 'issues' array".to_string()))?;

    Ok(issues
        .iter()
        .take(PROBE_ISSUE_LIMIT)
        .map(|issue| {
            let text = |pointer: &str| {
                issue
                    .pointer(pointer)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            RecentIssue {
                key: text("/key"),
                summary: text("/fields/summary"),
                status: text("/fields/status/name"),
            }
        })
        .collect())
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
