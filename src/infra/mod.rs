//! File I/O, templates, issue tracker

mod fs;
mod template;
mod tracker;

pub use fs::{FsError, ensure_dir, find_any, find_by_key_prefix, rename_in_place, to_posix};
pub use template::{
    ISSUE_LINK_PLACEHOLDER, PULL_REQUEST_LINK_PLACEHOLDER, STORY_POINTS_PLACEHOLDER,
    Substitutions, TemplateError, front_matter_header, materialize, write_plain_note,
};
pub use tracker::{
    DEFAULT_STORY_POINTS_FIELD, Issue, IssueTracker, JiraTracker, NoTracker, parse_issue,
};
