//! Connection probe results.

use serde::{Deserialize, Serialize};

/// Maximum number of issues a connection probe asks for
pub const PROBE_ISSUE_LIMIT: usize = 5;

/// Summary of a read-only connection probe against the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    /// Whether the probe reached the tracker and was accepted
    pub success: bool,

    /// Number of issues returned by the probe
    pub issues_found: usize,

    /// Abbreviated view of the returned issues
    pub recent_issues: Vec<RecentIssue>,

    /// Human-readable hint listing keys that can be fetched
    pub hint: String,
}

/// One issue returned by a connection probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentIssue {
    /// Issue key
    pub key: String,

    /// Issue summary
    pub summary: String,

    /// Workflow status name
    pub status: String,
}

impl ConnectionReport {
    /// Build a successful report from the issues a probe returned
    pub fn from_issues(recent_issues: Vec<RecentIssue>) -> Self {
        let hint = if recent_issues.is_empty() {
            "Connected, but no issues are visible to this account".to_string()
        } else {
            let keys: Vec<&str> = recent_issues.iter().map(|i| i.key.as_str()).collect();
            format!("Try fetching one of: {}", keys.join(", "))
        };

        Self {
            success: true,
            issues_found: recent_issues.len(),
            recent_issues,
            hint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(key: &str) -> RecentIssue {
        RecentIssue {
            key: key.to_string(),
            summary: format!("Summary of {}", key),
            status: "To Do".to_string(),
        }
    }

    #[test]
    fn test_report_counts_issues() {
        let report = ConnectionReport::from_issues(vec![issue("A-1"), issue("A-2")]);
        assert!(report.success);
        assert_eq!(report.issues_found, 2);
        assert_eq!(report.recent_issues.len(), report.issues_found);
        assert_eq!(report.hint, "Try fetching one of: A-1, A-2");
    }

    #[test]
    fn test_report_with_no_issues() {
        let report = ConnectionReport::from_issues(Vec::new());
        assert!(report.success);
        assert_eq!(report.issues_found, 0);
        assert!(report.hint.contains("no issues"));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = ConnectionReport::from_issues(vec![issue("A-1")]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["issuesFound"], 1);
        assert_eq!(json["recentIssues"][0]["key"], "A-1");
    }
}
