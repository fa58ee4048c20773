//! Error types for the Jira integration
//!
//! Messages are shown to operators as-is, so each one names the setting most
//! likely to be wrong.

use thiserror::Error;

/// Errors that can occur while talking to Jira
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JiraError {
    /// Issue or resource does not exist or is not visible to the account
    #[error("Jira resource '{resource}' was not found. Check the key and that JIRA_EMAIL can browse its project.")]
    NotFound {
        /// Issue key or endpoint that was requested
        resource: String,
    },

    /// Credentials were rejected
    #[error("Jira rejected the credentials: {message}. Check JIRA_EMAIL and JIRA_API_TOKEN.")]
    AuthFailure {
        /// Upstream explanation
        message: String,
    },

    /// Any other non-success response
    #[error("Jira returned HTTP {status}: {message}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// Upstream explanation
        message: String,
    },

    /// The request never completed
    #[error("Could not reach Jira: {0}. Check JIRA_BASE_URL and network access.")]
    Connectivity(String),

    /// Response could not be mapped to an issue
    #[error("Unexpected response from Jira: {0}")]
    MalformedResponse(String),

    /// Client could not be constructed
    #[error("Jira client configuration error: {0}")]
    Config(String),
}

impl JiraError {
    /// Map a non-success HTTP status to a domain error.
    ///
    /// `resource` names what was requested, `body` is the raw response text.
    pub fn from_status(status: u16, resource: &str, body: &str) -> Self {
        match status {
            404 => JiraError::NotFound {
                resource: resource.to_string(),
            },
            401 | 403 => JiraError::AuthFailure {
                message: format!("HTTP {} ({})", status, upstream_message(body)),
            },
            _ => JiraError::Transport {
                status,
                message: upstream_message(body),
            },
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            JiraError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Longest raw body quoted in an error message
pub const MAX_BODY_CHARS: usize = 300;

/// Summarise a Jira error body.
///
/// Jira reports problems as `{"errorMessages": [...], "errors": {...}}`;
/// anything else is returned trimmed and capped at [`MAX_BODY_CHARS`], or a
/// placeholder when empty.
pub fn upstream_message(body: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Ok(serde_json::Value::Object(root)) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(messages) = root.get("errorMessages").and_then(|m| m.as_array()) {
            parts.extend(messages.iter().filter_map(|m| m.as_str()).map(str::to_string));
        }
        if let Some(errors) = root.get("errors").and_then(|e| e.as_object()) {
            parts.extend(
                errors
                    .iter()
                    .filter_map(|(field, msg)| msg.as_str().map(|m| format!("{}: {}", field, m))),
            );
        }
    }

    if parts.is_empty() {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "no details provided".to_string()
        } else if trimmed.chars().count() > MAX_BODY_CHARS {
            let head: String = trimmed.chars().take(MAX_BODY_CHARS).collect();
            format!("{}... (truncated)", head)
        } else {
            trimmed.to_string()
        }
    } else {
        parts.join("; ")
    }
}
