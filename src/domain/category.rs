//! Category classification of note filenames.
//!
//! The category decides which template a new note is created from and
//! which subdirectory it lives in. It is derived from the filename only.

use std::fmt;

use super::filename::NOTE_EXTENSION;

/// Title suffix marking a tracked-issue page.
pub const ISSUE_SUFFIX: &str = "- Jira";

/// Title prefix marking a pull-request page.
pub const PULL_REQUEST_PREFIX: &str = "Pull request";

/// Default prefix marking the secondary issue type.
pub const DEFAULT_SECONDARY_PREFIX: &str = "SUP";

/// Default project keys recognised in issue keys.
pub const DEFAULT_PROJECTS: &[&str] = &["OPA", "SUP"];

/// Marker linked from a pull request that references no issue.
pub const NO_ISSUE_MARKER: &str = "#NOISSUE-PR";

/// Closed classification of a desired note filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Plain,
    Issue,
    IssueSecondary,
    PullRequest,
}

impl Category {
    /// Returns true if files of this category are anchored by an issue key.
    pub fn is_keyed(self) -> bool {
        matches!(self, Category::Issue | Category::IssueSecondary)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Plain => "plain",
            Category::Issue => "issue",
            Category::IssueSecondary => "issue-secondary",
            Category::PullRequest => "pull-request",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue a pull request refers to, read from its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkedIssue {
    /// The title mentions `noissue`.
    NoIssue,
    /// An issue key such as `OPA-42`.
    Key(String),
}

/// Classifies filenames into categories.
///
/// A templated category is only recognised when it has been enabled;
/// otherwise matching filenames classify as [`Category::Plain`].
#[derive(Debug, Clone)]
pub struct Classifier {
    issue: bool,
    secondary_prefix: Option<String>,
    pull_request: bool,
    projects: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            issue: false,
            secondary_prefix: None,
            pull_request: false,
            projects: DEFAULT_PROJECTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Classifier {
    /// Creates a classifier with every templated category disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the primary issue category.
    pub fn with_issue(mut self) -> Self {
        self.issue = true;
        self
    }

    /// Enables the secondary issue category with the given filename prefix.
    pub fn with_secondary(mut self, prefix: impl Into<String>) -> Self {
        self.secondary_prefix = Some(prefix.into());
        self
    }

    /// Enables the pull-request category.
    pub fn with_pull_request(mut self) -> Self {
        self.pull_request = true;
        self
    }

    /// Replaces the project keys used to recognise issue keys.
    pub fn with_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projects = projects.into_iter().map(Into::into).collect();
        self
    }

    /// Classifies a desired filename.
    ///
    /// Order: secondary issue, issue, pull request, plain.
    pub fn classify(&self, filename: &str) -> Category {
        let trimmed = filename.trim();

        if let Some(prefix) = &self.secondary_prefix
            && trimmed.starts_with(prefix.as_str())
        {
            return Category::IssueSecondary;
        }
        if self.issue && trimmed.ends_with(&format!("{ISSUE_SUFFIX}{NOTE_EXTENSION}")) {
            return Category::Issue;
        }
        if self.pull_request && filename.starts_with(PULL_REQUEST_PREFIX) {
            return Category::PullRequest;
        }
        Category::Plain
    }

    /// Extracts the issue key a filename is anchored by.
    ///
    /// The key is the first whitespace-delimited token, and only counts
    /// when it contains one of the configured project keys.
    pub fn issue_key<'a>(&self, filename: &'a str) -> Option<&'a str> {
        let token = filename.split_whitespace().next()?;
        self.projects
            .iter()
            .any(|p| token.contains(p.as_str()))
            .then_some(token)
    }

    /// Finds the issue a pull-request title links to.
    ///
    /// The key is `<PROJECT>-<digits>`; anything after the digits, such as
    /// a file extension, is not part of it.
    pub fn linked_issue(&self, filename: &str) -> Option<LinkedIssue> {
        if filename.to_lowercase().contains("noissue") {
            return Some(LinkedIssue::NoIssue);
        }

        for project in &self.projects {
            let marker = format!("{project}-");
            let Some((_, rest)) = filename.split_once(&marker) else {
                continue;
            };
            let digits = rest.chars().take_while(char::is_ascii_digit).count();
            if digits == 0 {
                continue;
            }
            return Some(LinkedIssue::Key(format!("{marker}{}", &rest[..digits])));
        }
        None
    }
}
