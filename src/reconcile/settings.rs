//! Immutable engine settings.

use std::path::{Path, PathBuf};

use crate::domain::{Category, Classifier, DEFAULT_PROJECTS, DEFAULT_SECONDARY_PREFIX};
use crate::index::IndexStore;

/// Template and subdirectory used for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    /// Template file copied for new notes.
    pub template: PathBuf,
    /// Subdirectory of the notes root holding notes of this category.
    pub folder: String,
}

impl TemplateSpec {
    pub fn new(template: impl Into<PathBuf>, folder: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            folder: folder.into(),
        }
    }
}

/// Everything the reconciler needs to know about the notes layout.
///
/// Built once (usually from the config file) and handed to
/// [`Reconciler::new`](super::Reconciler::new).
#[derive(Debug, Clone)]
pub struct Settings {
    root: PathBuf,
    index_dir: Option<PathBuf>,
    issue: Option<TemplateSpec>,
    issue_secondary: Option<TemplateSpec>,
    pull_request: Option<TemplateSpec>,
    secondary_prefix: String,
    projects: Vec<String>,
    tracker_base_url: Option<String>,
}

impl Settings {
    /// Creates settings for a notes root with no templated categories.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index_dir: None,
            issue: None,
            issue_secondary: None,
            pull_request: None,
            secondary_prefix: DEFAULT_SECONDARY_PREFIX.to_string(),
            projects: DEFAULT_PROJECTS.iter().map(|p| p.to_string()).collect(),
            tracker_base_url: None,
        }
    }

    /// Stores the index file in `dir` instead of the notes root.
    pub fn index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.index_dir = Some(dir.into());
        self
    }

    pub fn issue(mut self, spec: TemplateSpec) -> Self {
        self.issue = Some(spec);
        self
    }

    pub fn issue_secondary(mut self, spec: TemplateSpec) -> Self {
        self.issue_secondary = Some(spec);
        self
    }

    pub fn pull_request(mut self, spec: TemplateSpec) -> Self {
        self.pull_request = Some(spec);
        self
    }

    /// Filename prefix marking secondary issues (default `SUP`).
    pub fn secondary_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.secondary_prefix = prefix.into();
        self
    }

    /// Project keys recognised in issue keys (default `OPA`, `SUP`).
    pub fn projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projects = projects.into_iter().map(Into::into).collect();
        self
    }

    /// Base URL of the issue tracker, e.g. `https://example.atlassian.net`.
    pub fn tracker_base_url(mut self, url: impl Into<String>) -> Self {
        self.tracker_base_url = Some(url.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tracker_url(&self) -> Option<&str> {
        self.tracker_base_url.as_deref()
    }

    /// Store for the index file, in the index directory or the notes root.
    pub fn index_store(&self) -> IndexStore {
        IndexStore::in_dir(self.index_dir.as_deref().unwrap_or(&self.root))
    }

    /// Template and folder for a category, if it is configured.
    pub fn template(&self, category: Category) -> Option<&TemplateSpec> {
        match category {
            Category::Plain => None,
            Category::Issue => self.issue.as_ref(),
            Category::IssueSecondary => self.issue_secondary.as_ref(),
            Category::PullRequest => self.pull_request.as_ref(),
        }
    }

    /// Builds the classifier for the configured categories.
    pub fn classifier(&self) -> Classifier {
        let mut classifier = Classifier::new().with_projects(self.projects.iter().cloned());
        if self.issue.is_some() {
            classifier = classifier.with_issue();
        }
        if self.issue_secondary.is_some() {
            classifier = classifier.with_secondary(self.secondary_prefix.clone());
        }
        if self.pull_request.is_some() {
            classifier = classifier.with_pull_request();
        }
        classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn index_defaults_to_notes_root() {
        let settings = Settings::new("/notes");
        assert_eq!(settings.index_store().path(), Path::new("/notes/index.txt"));
    }

    #[test]
    fn index_dir_overrides_root() {
        let settings = Settings::new("/notes").index_dir("/state");
        assert_eq!(settings.index_store().path(), Path::new("/state/index.txt"));
    }

    #[test]
    fn classifier_only_knows_configured_categories() {
        let settings = Settings::new("/notes").issue(TemplateSpec::new("/t/jira.md", "jira"));
        let classifier = settings.classifier();

        assert_eq!(classifier.classify("OPA-1 X - Jira.md"), Category::Issue);
        assert_eq!(classifier.classify("Pull request 1.md"), Category::Plain);
        assert_eq!(classifier.classify("SUP-1 X.md"), Category::Plain);
    }

    #[test]
    fn classifier_uses_secondary_prefix() {
        let settings = Settings::new("/notes")
            .issue_secondary(TemplateSpec::new("/t/sup.md", "support"))
            .secondary_prefix("HELP");
        let classifier = settings.classifier();

        assert_eq!(classifier.classify("HELP-3 Crash.md"), Category::IssueSecondary);
        assert_eq!(classifier.classify("SUP-3 Crash.md"), Category::Plain);
    }

    #[test]
    fn template_lookup_by_category() {
        let spec = TemplateSpec::new("/t/pr.md", "prs");
        let settings = Settings::new("/notes").pull_request(spec.clone());

        assert_eq!(settings.template(Category::PullRequest), Some(&spec));
        assert_eq!(settings.template(Category::Issue), None);
        assert_eq!(settings.template(Category::Plain), None);
    }
}
