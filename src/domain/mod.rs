//! Core types: filename sanitizing, categories, URL normalization

mod category;
mod filename;
mod url;

pub use category::{
    Category, Classifier, DEFAULT_PROJECTS, DEFAULT_SECONDARY_PREFIX, ISSUE_SUFFIX, LinkedIssue,
    NO_ISSUE_MARKER, PULL_REQUEST_PREFIX,
};
pub use filename::{NOTE_EXTENSION, sanitize, stem};
pub use url::{board_issue_key, issue_url, strip_query};
