//! User stories, as fetched and as submitted.

use serde::{Deserialize, Serialize};

/// A story flattened to plain text.
///
/// `description` and `acceptance_criteria` are always strings, never the
/// tracker's document objects. Either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStory {
    /// Tracker key (e.g. "PROJ-123")
    pub key: String,

    /// Issue summary
    pub title: String,

    /// Description rendered to plain text
    pub description: String,

    /// Acceptance criteria text, empty when none could be located
    pub acceptance_criteria: String,
}

impl NormalizedStory {
    /// Whether any acceptance criteria were found
    pub fn has_acceptance_criteria(&self) -> bool {
        !self.acceptance_criteria.trim().is_empty()
    }
}

/// A story as submitted by a user.
///
/// Every text field may be left blank when `jira_key` is given; blanks are
/// then filled from the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryInput {
    /// Story title
    #[serde(default)]
    pub title: String,

    /// Story description
    #[serde(default)]
    pub description: String,

    /// Acceptance criteria
    #[serde(default)]
    pub acceptance_criteria: String,

    /// Extra free-form context for test generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Tracker key to hydrate from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_key: Option<String>,
}

impl StoryInput {
    /// Fill blank fields from a fetched story.
    ///
    /// Text the user typed always wins over tracker text.
    pub fn hydrate(mut self, story: NormalizedStory) -> Self {
        fill_blank(&mut self.title, story.title);
        fill_blank(&mut self.description, story.description);
        fill_blank(&mut self.acceptance_criteria, story.acceptance_criteria);
        if self.jira_key.is_none() && !story.key.is_empty() {
            self.jira_key = Some(story.key);
        }
        self
    }

    /// Whether the tracker needs to be consulted
    pub fn needs_hydration(&self) -> bool {
        self.jira_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

fn fill_blank(slot: &mut String, fetched: String) {
    if slot.trim().is_empty() {
        *slot = fetched;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched() -> NormalizedStory {
        NormalizedStory {
            key: "PROJ-7".to_string(),
            title: "Reset password".to_string(),
            description: "As a user I want to reset my password".to_string(),
            acceptance_criteria: "- email is sent".to_string(),
        }
    }

    #[test]
    fn test_hydrate_fills_blank_fields() {
        let input = StoryInput {
            jira_key: Some("PROJ-7".to_string()),
            ..Default::default()
        };

        let hydrated = input.hydrate(fetched());
        assert_eq!(hydrated.title, "Reset password");
        assert_eq!(hydrated.description, "As a user I want to reset my password");
        assert_eq!(hydrated.acceptance_criteria, "- email is sent");
    }

    #[test]
    fn test_hydrate_keeps_user_text() {
        let input = StoryInput {
            title: "My own title".to_string(),
            acceptance_criteria: "   ".to_string(),
            context: Some("mobile only".to_string()),
            jira_key: Some("PROJ-7".to_string()),
            ..Default::default()
        };

        let hydrated = input.hydrate(fetched());
        assert_eq!(hydrated.title, "My own title");
        assert_eq!(hydrated.acceptance_criteria, "- email is sent");
        assert_eq!(hydrated.context.as_deref(), Some("mobile only"));
    }

    #[test]
    fn test_needs_hydration() {
        let mut input = StoryInput::default();
        assert!(!input.needs_hydration());

        input.jira_key = Some("  ".to_string());
        assert!(!input.needs_hydration());

        input.jira_key = Some("PROJ-1".to_string());
        assert!(input.needs_hydration());
    }

    #[test]
    fn test_story_serializes_camel_case() {
        let json = serde_json::to_value(fetched()).unwrap();
        assert_eq!(json["acceptanceCriteria"], "- email is sent");
        assert!(json.get("acceptance_criteria").is_none());
    }

    #[test]
    fn test_has_acceptance_criteria() {
        let mut story = fetched();
        assert!(story.has_acceptance_criteria());
        story.acceptance_criteria = "\n".to_string();
        assert!(!story.has_acceptance_criteria());
    }
}
