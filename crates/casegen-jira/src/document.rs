//! Rich-text document to plain text.
//!
//! Jira stores descriptions and many custom fields as nested block documents
//! (Atlassian Document Format). Only the text needed for prompting is kept:
//! one line per top-level block, list items on their own lines.
//!
//! Conversion from JSON never fails. Missing or mistyped fields at any depth
//! degrade to empty text.

use serde_json::Value;

/// A parsed rich-text document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level blocks in document order
    pub blocks: Vec<Block>,
}

/// A top-level block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Paragraph of inline runs
    Paragraph(Vec<Inline>),
    /// Heading of inline runs (level is irrelevant for plain text)
    Heading(Vec<Inline>),
    /// Bullet or numbered list
    List {
        /// Numbered list when true
        ordered: bool,
        /// Items in list order
        items: Vec<ListItem>,
    },
    /// Any block type without a text rendering
    Other,
}

/// One list item: the inline runs of each paragraph it contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem(pub Vec<Vec<Inline>>);

/// A run of inline text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inline {
    /// Run text, empty for non-text nodes such as hard breaks
    pub text: String,
}

impl Document {
    /// Build a document from its JSON form.
    pub fn from_value(value: &Value) -> Self {
        let blocks = children(value).iter().map(Block::from_value).collect();
        Self { blocks }
    }

    /// Render to plain text, one line per top-level block.
    pub fn render(&self) -> String {
        self.blocks
            .iter()
            .map(Block::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Block {
    fn from_value(value: &Value) -> Self {
        match value.get("type").and_then(Value::as_str) {
            Some("paragraph") => Block::Paragraph(inlines(value)),
            Some("heading") => Block::Heading(inlines(value)),
            Some("bulletList") => Block::List {
                ordered: false,
                items: list_items(value),
            },
            Some("orderedList") => Block::List {
                ordered: true,
                items: list_items(value),
            },
            _ => Block::Other,
        }
    }

    fn render(&self) -> String {
        match self {
            Block::Paragraph(runs) | Block::Heading(runs) => concat(runs),
            Block::List { items, .. } => items
                .iter()
                .map(ListItem::render)
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Other => String::new(),
        }
    }
}

impl ListItem {
    fn render(&self) -> String {
        self.0.iter().map(|runs| concat(runs)).collect()
    }
}

fn children(value: &Value) -> &[Value] {
    value
        .get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn inlines(value: &Value) -> Vec<Inline> {
    children(value)
        .iter()
        .map(|run| Inline {
            text: run
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
        .collect()
}

fn list_items(value: &Value) -> Vec<ListItem> {
    children(value)
        .iter()
        .map(|item| ListItem(children(item).iter().map(inlines).collect()))
        .collect()
}

fn concat(runs: &[Inline]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

/// Render an optional rich-text document to plain text.
///
/// Absent, `null`, empty or malformed documents give `""`.
pub fn render_to_text(doc: Option<&Value>) -> String {
    match doc {
        Some(value @ Value::Object(_)) => Document::from_value(value).render(),
        _ => String::new(),
    }
}
