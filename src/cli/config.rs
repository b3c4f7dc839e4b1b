//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::infra::{IssueTracker, JiraTracker, NoTracker};
use crate::reconcile::{Settings, TemplateSpec};

/// Environment variable that overrides the tracker API token.
pub const TOKEN_ENV_VAR: &str = "WEBNOTES_TRACKER_TOKEN";

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "WEBNOTES_CONFIG";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Notes root directory
    pub dir: Option<PathBuf>,

    /// Directory holding `index.txt` (defaults to the notes root)
    pub index_dir: Option<PathBuf>,

    /// Tracked-issue notes (`... - Jira`)
    pub issue: Option<CategoryConfig>,

    /// Secondary issue notes (filename prefix, default `SUP`)
    pub issue_secondary: Option<CategoryConfig>,

    /// Pull-request notes (`Pull request ...`)
    pub pull_request: Option<CategoryConfig>,

    /// Issue tracker access
    pub tracker: Option<TrackerConfig>,
}

/// Template and folder of one note category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Template file; relative paths are taken from the notes root
    pub template: PathBuf,

    /// Subdirectory of the notes root
    pub folder: String,

    /// Filename prefix (secondary issues only)
    pub prefix: Option<String>,
}

/// Issue tracker settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerConfig {
    /// Base URL, e.g. `https://example.atlassian.net`
    pub base_url: Option<String>,

    pub email: Option<String>,

    pub token: Option<String>,

    /// Project keys recognised in issue keys
    pub projects: Option<Vec<String>>,

    /// Custom field holding story points
    pub story_points_field: Option<String>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// `$WEBNOTES_CONFIG` if set, otherwise `~/.config/webnotes/config.toml`
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("webnotes")
            .join("config.toml")
    }

    /// Resolve the notes directory, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--dir` argument
    /// 2. Config file `dir` setting
    /// 3. Current working directory
    pub fn notes_dir(&self, cli_dir: Option<&PathBuf>) -> PathBuf {
        cli_dir
            .cloned()
            .or_else(|| self.dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Builds the reconciler settings for a notes directory.
    ///
    /// The CLI `--index-dir` argument takes precedence over the config file.
    pub fn settings(&self, notes_dir: &Path, cli_index_dir: Option<&PathBuf>) -> Settings {
        let mut settings = Settings::new(notes_dir);

        if let Some(dir) = cli_index_dir.or(self.index_dir.as_ref()) {
            settings = settings.index_dir(dir);
        }
        if let Some(issue) = &self.issue {
            settings = settings.issue(issue.spec(notes_dir));
        }
        if let Some(secondary) = &self.issue_secondary {
            settings = settings.issue_secondary(secondary.spec(notes_dir));
            if let Some(prefix) = &secondary.prefix {
                settings = settings.secondary_prefix(prefix);
            }
        }
        if let Some(pr) = &self.pull_request {
            settings = settings.pull_request(pr.spec(notes_dir));
        }
        if let Some(tracker) = &self.tracker {
            if let Some(projects) = &tracker.projects {
                settings = settings.projects(projects.iter().cloned());
            }
            if let Some(base_url) = &tracker.base_url {
                settings = settings.tracker_base_url(base_url);
            }
        }

        settings
    }

    /// Builds the issue tracker client.
    ///
    /// Falls back to a tracker that knows nothing unless base URL, email,
    /// and token are all set. The token may come from `WEBNOTES_TRACKER_TOKEN`.
    pub fn tracker(&self) -> Box<dyn IssueTracker> {
        let Some(tracker) = &self.tracker else {
            return Box::new(NoTracker);
        };

        let token = std::env::var(TOKEN_ENV_VAR)
            .ok()
            .or_else(|| tracker.token.clone());

        match (&tracker.base_url, &tracker.email, token) {
            (Some(base_url), Some(email), Some(token)) => {
                let mut jira = JiraTracker::new(base_url, email, token);
                if let Some(field) = &tracker.story_points_field {
                    jira = jira.with_story_points_field(field);
                }
                Box::new(jira)
            }
            _ => {
                log::debug!("tracker credentials incomplete; lookups disabled");
                Box::new(NoTracker)
            }
        }
    }
}

impl CategoryConfig {
    fn spec(&self, notes_dir: &Path) -> TemplateSpec {
        let template = if self.template.is_relative() {
            notes_dir.join(&self.template)
        } else {
            self.template.clone()
        };
        TemplateSpec::new(template, self.folder.clone())
    }
}
