//! Isolated test environment with temp directory.

// Allow dead code since this is a test utility shared by several test files
#![allow(dead_code)]

use super::NotesCommand;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Issue template used by [`TestEnv::with_issue_templates`].
pub const ISSUE_TEMPLATE: &str = "---\njira-link: 漢JIRA_LINK漢\nTotal-SP: 漢STORY_POINTS漢\n---\n";

/// Pull request template used by [`TestEnv::with_issue_templates`].
pub const PULL_REQUEST_TEMPLATE: &str = "---\npr-link: 漢JIRA_PR_LINK漢\njira-link: 漢JIRA_LINK漢\n---\n";

/// Isolated test environment with a temporary notes directory.
///
/// Layout:
///
/// ```text
/// <tmp>/config.toml   written on demand
/// <tmp>/notes/        the notes root passed as --dir
/// ```
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    notes_dir: PathBuf,
    config_path: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment with an empty notes directory
    /// and no config file.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let notes_dir = temp_dir.path().join("notes");
        std::fs::create_dir_all(&notes_dir).expect("Failed to create notes directory");
        let config_path = temp_dir.path().join("config.toml");
        Self {
            _temp_dir: temp_dir,
            notes_dir,
            config_path,
        }
    }

    /// Creates an environment whose config enables the issue and pull
    /// request templates.
    pub fn with_issue_templates() -> Self {
        let env = Self::new();
        env.write_file("templates/Jira.md", ISSUE_TEMPLATE);
        env.write_file("templates/PR.md", PULL_REQUEST_TEMPLATE);
        env.write_config(
            r#"
[issue]
template = "templates/Jira.md"
folder = "jira"

[pull_request]
template = "templates/PR.md"
folder = "prs"

[tracker]
base_url = "https://example.atlassian.net"
"#,
        );
        env
    }

    /// Returns the path to the notes directory.
    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Returns the path where the index file is kept by default.
    pub fn index_path(&self) -> PathBuf {
        self.notes_dir.join("index.txt")
    }

    /// Writes the config file read by every command of this environment.
    pub fn write_config(&self, content: &str) {
        std::fs::write(&self.config_path, content).expect("Failed to write config");
    }

    /// Creates a NotesCommand configured for this test environment.
    pub fn cmd(&self) -> NotesCommand {
        NotesCommand::new()
            .config(&self.config_path)
            .dir(&self.notes_dir)
    }

    /// Writes a file below the notes directory and returns its path.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.notes_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Reads a file below the notes directory.
    pub fn read_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.notes_dir.join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    /// Whether a file exists below the notes directory.
    pub fn exists(&self, relative: &str) -> bool {
        self.notes_dir.join(relative).is_file()
    }

    /// Moves a note inside the notes directory, creating folders as needed.
    pub fn move_file(&self, from: &str, to: &str) {
        let dest = self.notes_dir.join(to);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::rename(self.notes_dir.join(from), dest).expect("Failed to move file");
    }

    /// Parses the index file into URL -> path pairs.
    pub fn index(&self) -> BTreeMap<String, String> {
        let Ok(contents) = std::fs::read_to_string(self.index_path()) else {
            return BTreeMap::new();
        };
        contents
            .lines()
            .filter_map(|line| line.split_once('漢'))
            .map(|(url, path)| (url.to_string(), path.to_string()))
            .collect()
    }

    /// Writes the index file from URL -> path pairs.
    pub fn seed_index(&self, entries: &[(&str, &str)]) {
        let contents: String = entries
            .iter()
            .map(|(url, path)| format!("{url}漢{path}\n"))
            .collect();
        std::fs::write(self.index_path(), contents).expect("Failed to write index");
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_notes_directory() {
        let env = TestEnv::new();
        assert!(env.notes_dir().is_dir(), "notes directory should exist");
        assert!(env.index().is_empty());
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.notes_dir().to_path_buf()
        };
        assert!(
            !path.exists(),
            "temp directory should be cleaned up on drop"
        );
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], env.notes_dir().to_string_lossy());
    }

    #[test]
    fn test_env_seed_index_round_trips() {
        let env = TestEnv::new();
        env.seed_index(&[("http://a.com", "A.md")]);
        assert_eq!(env.index().get("http://a.com").map(String::as_str), Some("A.md"));
    }
}
