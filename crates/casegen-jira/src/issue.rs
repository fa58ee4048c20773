//! Raw issue records as returned by the issue endpoint.

use crate::error::JiraError;
use serde_json::{Map, Value};

/// An issue exactly as the tracker returned it.
///
/// Only the envelope is checked. Field contents are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RawIssue {
    /// Issue key
    pub key: String,

    /// All fields, standard and custom, by identifier
    pub fields: Map<String, Value>,

    /// Field identifier to display label, present only when requested
    pub names: Option<Map<String, Value>>,
}

impl RawIssue {
    /// Parse an issue response body.
    ///
    /// `requested_key` is used when the body carries no key of its own.
    pub fn from_json(body: &str, requested_key: &str) -> Result<Self, JiraError> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            JiraError::MalformedResponse(format!("issue {} is not valid JSON: {}", requested_key, e))
        })?;
        Self::from_value(value, requested_key)
    }

    /// Build from an already parsed response body
    pub fn from_value(value: Value, requested_key: &str) -> Result<Self, JiraError> {
        let Value::Object(mut root) = value else {
            return Err(JiraError::MalformedResponse(format!(
                "issue {} response is not a JSON object",
                requested_key
            )));
        };

        let fields = match root.remove("fields") {
            Some(Value::Object(fields)) => fields,
            _ => {
                return Err(JiraError::MalformedResponse(format!(
                    "issue {} response has no 'fields' object",
                    requested_key
                )))
            }
        };

        let key = match root.remove("key") {
            Some(Value::String(key)) if !key.is_empty() => key,
            _ => requested_key.to_string(),
        };

        let names = match root.remove("names") {
            Some(Value::Object(names)) => Some(names),
            _ => None,
        };

        Ok(Self { key, fields, names })
    }

    /// Issue summary, empty when absent
    pub fn summary(&self) -> &str {
        self.fields
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Raw description field
    pub fn description(&self) -> Option<&Value> {
        self.fields.get("description")
    }
}
