//! Flat-file URL→filename index.
//!
//! One record per line, `url漢relative_filename`. The delimiter is never
//! escaped: a field containing it will not parse back.

use std::collections::BTreeMap;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::{NOTE_EXTENSION, strip_query};

/// Field delimiter, chosen to never occur in URLs or titles.
pub const DELIMITER: char = '漢';

/// Name of the index file inside the index directory.
pub const INDEX_FILENAME: &str = "index.txt";

/// Value written by an old version when a page had no title.
const NULL_SENTINEL: &str = "None";

/// Errors reading or writing the index file.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to create index file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read index file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write index file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Why an index line was skipped on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("line has no delimiter")]
    MissingDelimiter,

    #[error("value is the null sentinel")]
    NullValue,
}

/// In-memory URL→relative filename mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: BTreeMap<String, String>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses index file contents, skipping malformed records.
    pub fn parse(contents: &str) -> Self {
        let mut index = Self::new();
        for line in contents.lines() {
            match parse_record(line) {
                Ok((url, filename)) => {
                    index.entries.insert(url, filename);
                }
                Err(reason) => log::debug!("skipping index record {line:?}: {reason}"),
            }
        }
        index
    }

    /// Renders the index in file format, one record per line.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(url, filename)| format!("{url}{DELIMITER}{filename}\n"))
            .collect()
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    /// Stores a mapping, replacing any previous filename for the URL.
    pub fn insert(&mut self, url: impl Into<String>, filename: impl Into<String>) {
        self.entries.insert(url.into(), filename.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Index {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (url, filename) in iter {
            index.insert(url, filename);
        }
        index
    }
}

/// Parses a single index line into a `(url, filename)` pair.
///
/// - The URL loses any query string
/// - The filename is right-trimmed
/// - A doubled extension (`.md.md`) is reduced to one
pub fn parse_record(line: &str) -> Result<(String, String), MalformedRecord> {
    let mut fields = line.split(DELIMITER);
    let url = fields.next().unwrap_or_default();
    let Some(value) = fields.next() else {
        return Err(MalformedRecord::MissingDelimiter);
    };

    let mut filename = value.trim_end();
    if filename == NULL_SENTINEL {
        return Err(MalformedRecord::NullValue);
    }

    let doubled = format!("{NOTE_EXTENSION}{NOTE_EXTENSION}");
    while filename.ends_with(&doubled) {
        filename = &filename[..filename.len() - NOTE_EXTENSION.len()];
    }

    Ok((strip_query(url).to_string(), filename.to_string()))
}

/// Reads and writes the index file.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    /// Creates a store for `index.txt` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(INDEX_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the index, creating an empty index file if none exists.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Create` if the file is absent and cannot be created.
    /// Returns `IndexError::Read` if the file cannot be read.
    pub fn load(&self) -> IndexResult<Index> {
        if !self.path.exists() {
            std::fs::write(&self.path, "").map_err(|e| IndexError::Create {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| IndexError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Index::parse(&contents))
    }

    /// Overwrites the index file with every entry.
    ///
    /// Uses a temporary file and atomic rename so readers never see a
    /// half-written index.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Write` if the file cannot be written.
    pub fn save(&self, index: &Index) -> IndexResult<()> {
        let write_err = |source| IndexError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(parent).map_err(write_err)?;
        temp.write_all(index.render().as_bytes())
            .map_err(write_err)?;
        temp.persist(&self.path).map_err(|e| write_err(e.error))?;

        Ok(())
    }
}
