//! Casegen Jira Integration
//!
//! Fetches user stories from Jira and flattens them to plain text for test
//! case generation.
//!
//! # Architecture
//!
//! ```text
//! JiraClient → HttpTransport → raw issue
//!     → document renderer (description)
//!     → criteria locator (custom fields → field labels → description text)
//!     → NormalizedStory
//! ```
//!
//! Rendering and locating never fail: malformed documents degrade to empty
//! text. Only the client returns [`JiraError`].
//!
//! # Example Usage
//!
//! ```no_run
//! use casegen_jira::{JiraClient, JiraConfig};
//!
//! # async fn example() -> Result<(), casegen_jira::JiraError> {
//! let config = JiraConfig::from_env();
//! for issue in config.check().messages() {
//!     eprintln!("warning: {}", issue);
//! }
//!
//! let client = JiraClient::from_config(&config)?;
//! let story = client.fetch_story("PROJ-123").await?;
//! println!("{}: {}", story.key, story.acceptance_criteria);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod criteria;
pub mod document;
mod error;
pub mod fields;
mod issue;
pub mod transport;

pub use client::JiraClient;
pub use config::{ConfigCheck, ConfigIssue, JiraConfig};
pub use criteria::{CriteriaLocator, DEFAULT_CRITERIA_FIELDS};
pub use document::{render_to_text, Document};
pub use error::{upstream_message, JiraError};
pub use fields::{description_text, field_to_text};
pub use issue::RawIssue;
pub use transport::{
    ApiRequest, ApiResponse, ApiVersion, HttpTransport, Method, MockTransport, ReqwestTransport,
    TransportFailure,
};
