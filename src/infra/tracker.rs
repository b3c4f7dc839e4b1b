//! Issue-tracker lookups used when creating issue notes.
//!
//! Lookups never fail loudly: any transport or decode problem is logged
//! and reported as absence, and callers fall back to a default.

use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use crate::domain::ISSUE_SUFFIX;

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Custom field holding story points on a default Jira Cloud site.
pub const DEFAULT_STORY_POINTS_FIELD: &str = "customfield_10013";

/// Issue data returned by a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub story_points: Option<String>,
}

impl Issue {
    /// Page title the tracker shows for this issue, e.g. `[OPA-1] Login - Jira`.
    pub fn page_title(&self) -> String {
        format!("[{}] {} {}", self.key, self.summary, ISSUE_SUFFIX)
    }
}

/// Source of issue data.
pub trait IssueTracker {
    /// Looks up an issue by key.
    fn lookup_issue(&self, key: &str) -> Option<Issue>;

    /// Fetches the page title of an issue.
    fn fetch_page_title(&self, key: &str) -> Option<String> {
        self.lookup_issue(key).map(|issue| issue.page_title())
    }
}

impl<T: IssueTracker + ?Sized> IssueTracker for Box<T> {
    fn lookup_issue(&self, key: &str) -> Option<Issue> {
        (**self).lookup_issue(key)
    }

    fn fetch_page_title(&self, key: &str) -> Option<String> {
        (**self).fetch_page_title(key)
    }
}

/// Tracker that knows nothing; every lookup is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTracker;

impl IssueTracker for NoTracker {
    fn lookup_issue(&self, _key: &str) -> Option<Issue> {
        None
    }
}

/// Jira Cloud REST client.
#[derive(Debug, Clone)]
pub struct JiraTracker {
    base_url: String,
    email: String,
    token: String,
    story_points_field: String,
}

impl JiraTracker {
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            email: email.into(),
            token: token.into(),
            story_points_field: DEFAULT_STORY_POINTS_FIELD.to_string(),
        }
    }

    /// Overrides the custom field story points are read from.
    pub fn with_story_points_field(mut self, field: impl Into<String>) -> Self {
        self.story_points_field = field.into();
        self
    }

    fn fetch(&self, key: &str) -> Result<Value, reqwest::Error> {
        let url = format!(
            "{}/rest/api/3/issue/{}",
            self.base_url.trim_end_matches('/'),
            key
        );
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        client
            .get(&url)
            .basic_auth(&self.email, Some(&self.token))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?
            .error_for_status()?
            .json()
    }
}

impl IssueTracker for JiraTracker {
    fn lookup_issue(&self, key: &str) -> Option<Issue> {
        match self.fetch(key) {
            Ok(json) => {
                let issue = parse_issue(&json, &self.story_points_field);
                if issue.is_none() {
                    log::warn!("issue {key} response is missing key or summary");
                }
                issue
            }
            Err(e) => {
                log::warn!("failed to look up issue {key}: {e}");
                None
            }
        }
    }
}

/// Extracts issue data from a Jira issue response.
///
/// Returns `None` unless both the key and the summary are present.
pub fn parse_issue(json: &Value, story_points_field: &str) -> Option<Issue> {
    let key = json.get("key").and_then(Value::as_str)?;
    let fields = json.get("fields")?;
    let summary = fields.get("summary").and_then(Value::as_str)?;
    let story_points = fields.get(story_points_field).and_then(story_points_text);

    Some(Issue {
        key: key.to_string(),
        summary: summary.to_string(),
        story_points,
    })
}

/// Renders story points as an integer string, dropping any fraction.
fn story_points_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return None,
    };
    let whole = text.split('.').next().unwrap_or(&text);
    Some(whole.to_string())
}
