//! URL normalization for index keys.

/// Query parameter a tracker board uses for the issue opened in its side panel.
const SELECTED_ISSUE_PARAM: &str = "selectedIssue=";

/// Strips a query string (`?...`) from a URL.
///
/// Index keys are always stored in this form, so a URL matches its entry
/// whichever form was last seen.
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Extracts the issue key from a board link.
///
/// A board link starts with the tracker base URL and carries the open
/// issue as its last `&`-separated segment, e.g.
/// `https://example.atlassian.net/jira/board?issueLimit=100&selectedIssue=OPA-1`.
pub fn board_issue_key<'a>(url: &'a str, base_url: &str) -> Option<&'a str> {
    if base_url.is_empty() || !url.starts_with(base_url) {
        return None;
    }
    let last = url.rsplit('&').next()?;
    let key = last.strip_prefix(SELECTED_ISSUE_PARAM)?;
    (!key.is_empty()).then_some(key)
}

/// Builds the canonical browse URL of an issue.
pub fn issue_url(base_url: &str, key: &str) -> String {
    format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
}
