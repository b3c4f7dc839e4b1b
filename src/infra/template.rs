//! Creating notes from category templates.

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder replaced with the issue URL.
pub const ISSUE_LINK_PLACEHOLDER: &str = "漢JIRA_LINK漢";

/// Placeholder replaced with the pull-request URL.
pub const PULL_REQUEST_LINK_PLACEHOLDER: &str = "漢JIRA_PR_LINK漢";

/// Placeholder replaced with the issue's story points.
pub const STORY_POINTS_PLACEHOLDER: &str = "漢STORY_POINTS漢";

/// Errors materializing a note from a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template file not found: {path}")]
    MissingTemplate { path: PathBuf },

    #[error("failed to copy template {template} to {dest}: {source}")]
    Copy {
        template: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render front matter: {0}")]
    Header(#[from] serde_yaml::Error),
}

/// Placeholder/value pairs applied to a copied template.
///
/// Pairs without a value are left untouched in the file.
#[derive(Debug, Default, Clone)]
pub struct Substitutions {
    pairs: Vec<(&'static str, Option<String>)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a placeholder; `None` keeps the placeholder text as-is.
    pub fn set(mut self, placeholder: &'static str, value: Option<String>) -> Self {
        self.pairs.push((placeholder, value));
        self
    }

    /// Replaces every placeholder that has a value.
    pub fn apply(&self, text: &str) -> String {
        self.pairs
            .iter()
            .filter_map(|(placeholder, value)| value.as_deref().map(|v| (*placeholder, v)))
            .fold(text.to_string(), |acc, (placeholder, value)| {
                acc.replace(placeholder, value)
            })
    }
}

/// Copies `template` to `dest` and fills in placeholders.
///
/// The parent directory of `dest` is created if needed. A crash between
/// the copy and the final write leaves an unsubstituted copy behind.
///
/// # Errors
///
/// Returns `TemplateError::MissingTemplate` if the template doesn't exist.
/// Returns `TemplateError::Copy` or `TemplateError::Io` on I/O failure.
pub fn materialize(
    template: &Path,
    dest: &Path,
    substitutions: &Substitutions,
) -> Result<(), TemplateError> {
    if !template.is_file() {
        return Err(TemplateError::MissingTemplate {
            path: template.to_path_buf(),
        });
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TemplateError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::copy(template, dest).map_err(|e| TemplateError::Copy {
        template: template.to_path_buf(),
        dest: dest.to_path_buf(),
        source: e,
    })?;

    let io_err = |source| TemplateError::Io {
        path: dest.to_path_buf(),
        source,
    };
    let contents = std::fs::read_to_string(dest).map_err(io_err)?;
    std::fs::write(dest, substitutions.apply(&contents)).map_err(io_err)?;

    Ok(())
}

#[derive(Serialize)]
struct Header<'a> {
    link: &'a str,
}

/// Renders the front matter written into a plain note.
///
/// # Examples
///
/// ```
/// use webnotes::infra::front_matter_header;
///
/// assert_eq!(
///     front_matter_header("http://x.com").unwrap(),
///     "---\nlink: http://x.com\n---"
/// );
/// ```
pub fn front_matter_header(url: &str) -> Result<String, TemplateError> {
    let yaml = serde_yaml::to_string(&Header { link: url })?;
    Ok(format!("---\n{yaml}---"))
}

/// Writes a plain note containing only its front matter.
///
/// # Errors
///
/// Returns `TemplateError::Io` if the file cannot be written.
pub fn write_plain_note(dest: &Path, url: &str) -> Result<(), TemplateError> {
    let header = front_matter_header(url)?;
    std::fs::write(dest, header).map_err(|e| TemplateError::Io {
        path: dest.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "---\njira-link: 漢JIRA_LINK漢\nTotal-SP: 漢STORY_POINTS漢\n---\n# Notes\n";

    #[test]
    fn substitutions_replace_all_occurrences() {
        let subs = Substitutions::new().set(ISSUE_LINK_PLACEHOLDER, Some("http://x".into()));
        assert_eq!(
            subs.apply("a 漢JIRA_LINK漢 b 漢JIRA_LINK漢"),
            "a http://x b http://x"
        );
    }

    #[test]
    fn substitutions_without_value_leave_placeholder() {
        let subs = Substitutions::new()
            .set(ISSUE_LINK_PLACEHOLDER, Some("http://x".into()))
            .set(STORY_POINTS_PLACEHOLDER, None);
        assert_eq!(
            subs.apply(TEMPLATE),
            "---\njira-link: http://x\nTotal-SP: 漢STORY_POINTS漢\n---\n# Notes\n"
        );
    }

    #[test]
    fn materialize_copies_and_substitutes() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("Jira Template.md");
        fs::write(&template, TEMPLATE).unwrap();
        let dest = dir.path().join("jira").join("OPA-1 Story - Jira.md");

        let subs = Substitutions::new()
            .set(ISSUE_LINK_PLACEHOLDER, Some("http://x/browse/OPA-1".into()))
            .set(STORY_POINTS_PLACEHOLDER, Some("5".into()));
        materialize(&template, &dest, &subs).unwrap();

        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "---\njira-link: http://x/browse/OPA-1\nTotal-SP: 5\n---\n# Notes\n"
        );
        assert_eq!(fs::read_to_string(&template).unwrap(), TEMPLATE);
    }

    #[test]
    fn materialize_missing_template_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = materialize(
            &dir.path().join("missing.md"),
            &dir.path().join("out.md"),
            &Substitutions::new(),
        );
        assert!(matches!(result, Err(TemplateError::MissingTemplate { .. })));
        assert!(!dir.path().join("out.md").exists());
    }

    #[test]
    fn front_matter_header_contains_link() {
        assert_eq!(
            front_matter_header("http://x.com").unwrap(),
            "---\nlink: http://x.com\n---"
        );
    }

    #[test]
    fn write_plain_note_writes_header() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("My Title.md");

        write_plain_note(&dest, "http://x.com").unwrap();

        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "---\nlink: http://x.com\n---"
        );
    }
}
