//! Casegen Domain Layer
//!
//! Value types shared by the tracker integration and the HTTP surface.
//!
//! ## Key Concepts
//!
//! - **NormalizedStory**: a user story reduced to plain text, ready for prompting
//! - **StoryInput**: what a user submits, optionally hydrated from the tracker
//! - **ConnectionReport**: the result of a read-only credentials probe
//!
//! Nothing in this crate performs I/O. Fetching and extraction live in
//! `casegen-jira`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod report;
pub mod story;

// Re-exports for convenience
pub use report::{ConnectionReport, RecentIssue};
pub use story::{NormalizedStory, StoryInput};
