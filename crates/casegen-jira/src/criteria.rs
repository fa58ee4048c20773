//! Acceptance-criteria location.
//!
//! Criteria may live in one of several custom fields, in a field whose label
//! mentions them, or under a heading in the description. Strategies run in
//! that order and the first non-empty result wins. Finding nothing is a valid
//! outcome and yields an empty string.

use crate::fields::field_to_text;
use crate::issue::RawIssue;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

/// Custom fields historically used for acceptance criteria, in priority order
pub const DEFAULT_CRITERIA_FIELDS: [&str; 3] =
    ["customfield_10026", "customfield_10037", "customfield_10100"];

static LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)acceptance.*criteria").expect("valid label pattern"));

static INLINE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)acceptance criteria[:\s\-]*(.*?)(?:\n\n|\z)")
        .expect("valid section pattern")
});

static INLINE_AC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bAC\b[:\s\-]*(.*?)(?:\n\n|\z)").expect("valid AC pattern")
});

static HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^acceptance criteria\s*[:\-]?$").expect("valid heading pattern")
});

/// Everything a strategy may look at
#[derive(Debug, Clone, Copy)]
pub struct IssueView<'a> {
    /// Issue fields by identifier
    pub fields: &'a Map<String, Value>,
    /// Field labels, when the fetch included them
    pub names: Option<&'a Map<String, Value>>,
    /// Description already rendered to text
    pub description: &'a str,
    /// Custom field identifiers to probe first
    pub custom_fields: &'a [String],
}

/// A single way of finding acceptance criteria
pub type Strategy = fn(&IssueView<'_>) -> Option<String>;

/// Strategies in priority order
pub const STRATEGIES: [(&str, Strategy); 5] = [
    ("custom_field", from_custom_fields),
    ("field_label", from_labelled_field),
    ("description_section", from_description_section),
    ("description_marker", from_description_marker),
    ("description_heading", from_description_heading),
];

/// Finds acceptance criteria on a raw issue
#[derive(Debug, Clone)]
pub struct CriteriaLocator {
    custom_fields: Vec<String>,
}

impl Default for CriteriaLocator {
    fn default() -> Self {
        Self::new(DEFAULT_CRITERIA_FIELDS.iter().map(|f| f.to_string()).collect())
    }
}

impl CriteriaLocator {
    /// Create a locator probing the given custom fields first
    pub fn new(custom_fields: Vec<String>) -> Self {
        Self { custom_fields }
    }

    /// Locate acceptance criteria, or return `""` when there are none.
    pub fn locate(&self, issue: &RawIssue, rendered_description: &str) -> String {
        let view = IssueView {
            fields: &issue.fields,
            names: issue.names.as_ref(),
            description: rendered_description,
            custom_fields: &self.custom_fields,
        };
        locate_in(&view)
    }
}

/// Run every strategy in order against a view.
pub fn locate_in(view: &IssueView<'_>) -> String {
    STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            strategy(view).map(|text| {
                debug!("Acceptance criteria found via {}", name);
                text
            })
        })
        .unwrap_or_default()
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn field_text(fields: &Map<String, Value>, id: &str) -> Option<String> {
    fields.get(id).map(field_to_text).and_then(non_empty)
}

/// Known custom fields, in priority order
pub fn from_custom_fields(view: &IssueView<'_>) -> Option<String> {
    view.custom_fields
        .iter()
        .find_map(|id| field_text(view.fields, id))
}

/// Any field whose label reads like "acceptance ... criteria"
pub fn from_labelled_field(view: &IssueView<'_>) -> Option<String> {
    view.names?
        .iter()
        .filter(|(_, label)| label.as_str().is_some_and(|l| LABEL_PATTERN.is_match(l)))
        .find_map(|(id, _)| field_text(view.fields, id))
}

/// Single line following "acceptance criteria", ending at a blank line or end of text
pub fn from_description_section(view: &IssueView<'_>) -> Option<String> {
    capture_trimmed(&INLINE_SECTION, view.description)
}

/// Single line following a standalone "AC" marker, ending at a blank line or end of text
pub fn from_description_marker(view: &IssueView<'_>) -> Option<String> {
    capture_trimmed(&INLINE_AC, view.description)
}

/// Lines under an "Acceptance Criteria" heading line, up to the first blank line
pub fn from_description_heading(view: &IssueView<'_>) -> Option<String> {
    let mut lines = view.description.lines().map(str::trim);
    lines.find(|line| HEADING_LINE.is_match(line))?;

    let collected: Vec<&str> = lines.take_while(|line| !line.is_empty()).collect();
    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

fn capture_trimmed(pattern: &Regex, text: &str) -> Option<String> {
    let captured = pattern.captures(text)?.get(1)?.as_str().trim();
    if captured.is_empty() {
        None
    } else {
        Some(captured.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue(fields: Value, names: Option<Value>) -> RawIssue {
        RawIssue {
            key: "PROJ-1".to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
            names: names.and_then(|n| n.as_object().cloned()),
        }
    }

    #[test]
    fn test_custom_field_wins_over_description() {
        let issue = issue(
            json!({ "customfield_10037": "Given X\nThen Y" }),
            None,
        );
        let locator = CriteriaLocator::default();

        let found = locator.locate(&issue, "Acceptance Criteria: something else");
        assert_eq!(found, "Given X\nThen Y");
    }

    #[test]
    fn test_custom_field_priority_order() {
        let issue = issue(
            json!({
                "customfield_10026": null,
                "customfield_10037": "",
                "customfield_10100": ["one", "two"],
            }),
            None,
        );

        assert_eq!(CriteriaLocator::default().locate(&issue, ""), "one\ntwo");
    }

    #[test]
    fn test_custom_field_document() {
        let issue = issue(
            json!({ "customfield_10026": {
                "type": "doc",
                "content": [{ "type": "bulletList", "content": [
                    { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "a" }] }] },
                    { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "b" }] }] }
                ]}]
            }}),
            None,
        );

        assert_eq!(CriteriaLocator::default().locate(&issue, ""), "a\nb");
    }

    #[test]
    fn test_configured_custom_fields() {
        let issue = issue(json!({ "customfield_55555": "custom AC" }), None);
        let locator = CriteriaLocator::new(vec!["customfield_55555".to_string()]);
        assert_eq!(locator.locate(&issue, ""), "custom AC");
        assert_eq!(CriteriaLocator::default().locate(&issue, ""), "");
    }

    #[test]
    fn test_labelled_field() {
        let issue = issue(
            json!({ "customfield_20000": "Done when shipped" }),
            Some(json!({
                "summary": "Summary",
                "customfield_20000": "Acceptance Criteria (Definition of Done)"
            })),
        );

        let found = CriteriaLocator::default().locate(&issue, "no markers here");
        assert_eq!(found, "Done when shipped");
    }

    #[test]
    fn test_labelled_field_case_and_gap() {
        let issue = issue(
            json!({ "customfield_1": "yes" }),
            Some(json!({ "customfield_1": "ACCEPTANCE test CRITERIA" })),
        );
        assert_eq!(CriteriaLocator::default().locate(&issue, ""), "yes");
    }

    #[test]
    fn test_labelled_field_skipped_without_names() {
        let issue = issue(json!({ "customfield_20000": "Done when shipped" }), None);
        assert_eq!(CriteriaLocator::default().locate(&issue, ""), "");
    }

    #[test]
    fn test_labelled_field_empty_value_falls_through() {
        let issue = issue(
            json!({ "customfield_20000": null }),
            Some(json!({ "customfield_20000": "Acceptance Criteria" })),
        );
        let found = CriteriaLocator::default().locate(&issue, "AC: from description");
        assert_eq!(found, "from description");
    }

    #[test]
    fn test_heading_with_list_lines() {
        let description = "Intro text\n\nAcceptance Criteria:\n- step one\n- step two\n\nNotes";
        let found = CriteriaLocator::default().locate(&issue(json!({}), None), description);
        assert_eq!(found, "- step one\n- step two");
    }

    #[test]
    fn test_inline_section() {
        let description = "Story\nacceptance criteria - user sees a banner\n\nOther";
        let found = CriteriaLocator::default().locate(&issue(json!({}), None), description);
        assert_eq!(found, "user sees a banner");
    }

    #[test]
    fn test_section_runs_to_end_of_text() {
        let description = "Intro\nAcceptance criteria: works offline";
        let found = CriteriaLocator::default().locate(&issue(json!({}), None), description);
        assert_eq!(found, "works offline");
    }

    #[test]
    fn test_section_separator_swallows_dash() {
        let description = "Acceptance criteria: - works offline";
        let found = CriteriaLocator::default().locate(&issue(json!({}), None), description);
        assert_eq!(found, "works offline");
    }

    #[test]
    fn test_multi_line_section_is_not_captured_inline() {
        let description = "Acceptance criteria: works offline\nsyncs later";
        let found = CriteriaLocator::default().locate(&issue(json!({}), None), description);
        assert_eq!(found, "");
    }

    #[test]
    fn test_multi_line_ac_marker_is_not_captured() {
        let fields = Map::new();
        let custom: Vec<String> = Vec::new();
        let view = IssueView {
            fields: &fields,
            names: None,
            description: "AC: first\nsecond\n\nNotes",
            custom_fields: &custom,
        };
        assert_eq!(from_description_marker(&view), None);
    }

    #[test]
    fn test_heading_followed_by_lines_uses_heading_scan() {
        let fields = Map::new();
        let custom: Vec<String> = Vec::new();
        let view = IssueView {
            fields: &fields,
            names: None,
            description: "Acceptance Criteria:\n- step one\n- step two\n\nNotes",
            custom_fields: &custom,
        };

        assert_eq!(from_description_section(&view), None);
        assert_eq!(from_description_marker(&view), None);
        assert_eq!(
            from_description_heading(&view),
            Some("- step one\n- step two".to_string())
        );
        assert_eq!(locate_in(&view), "- step one\n- step two");
    }

    #[test]
    fn test_indented_heading_lines_trimmed_per_line() {
        let fields = Map::new();
        let custom: Vec<String> = Vec::new();
        let view = IssueView {
            fields: &fields,
            names: None,
            description: "Acceptance Criteria:\n  - step one\n  - step two\n\nNotes",
            custom_fields: &custom,
        };

        assert_eq!(from_description_section(&view), None);
        assert_eq!(locate_in(&view), "- step one\n- step two");
    }

    #[test]
    fn test_ac_marker() {
        let description = "Background\nAC: totals add up\n\nMore";
        let found = CriteriaLocator::default().locate(&issue(json!({}), None), description);
        assert_eq!(found, "totals add up");
    }

    #[test]
    fn test_ac_marker_must_be_standalone() {
        let description = "Accurate totals are shown";
        let found = CriteriaLocator::default().locate(&issue(json!({}), None), description);
        assert_eq!(found, "");
    }

    #[test]
    fn test_heading_scan_after_empty_inline_match() {
        let view_fields = Map::new();
        let custom: Vec<String> = Vec::new();
        let description = "See acceptance criteria\n\nAcceptance Criteria -\n  first  \nsecond\n\nthird";
        let view = IssueView {
            fields: &view_fields,
            names: None,
            description,
            custom_fields: &custom,
        };

        assert_eq!(from_description_section(&view), None);
        assert_eq!(from_description_marker(&view), None);
        assert_eq!(from_description_heading(&view), Some("first\nsecond".to_string()));
        assert_eq!(locate_in(&view), "first\nsecond");
    }

    #[test]
    fn test_heading_scan_stops_at_blank_line() {
        let fields = Map::new();
        let custom: Vec<String> = Vec::new();
        let view = IssueView {
            fields: &fields,
            names: None,
            description: "ACCEPTANCE CRITERIA\n\n- grouped later",
            custom_fields: &custom,
        };
        assert_eq!(from_description_heading(&view), None);
    }

    #[test]
    fn test_no_markers() {
        let description = "As a shopper I want to pay by card.";
        let found = CriteriaLocator::default().locate(&issue(json!({}), None), description);
        assert_eq!(found, "");
    }
}
