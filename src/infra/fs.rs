//! Locating and renaming note files under the notes root.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Errors during file system operations on notes.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("note file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to overwrite existing file: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl FsError {
    /// Creates an appropriate FsError from an io::Error.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Checks that `root` exists and is a directory.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the directory doesn't exist.
/// Returns `FsError::NotADirectory` if the path is not a directory.
pub fn ensure_dir(root: &Path) -> Result<(), FsError> {
    if !root.exists() {
        return Err(FsError::NotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(FsError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Renders a relative path with `/` separators.
pub fn to_posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Finds a file named like any of the candidates anywhere under `root`.
///
/// Names are compared after trimming trailing whitespace. Candidates may
/// be relative paths; only their file name is compared. Returns the
/// relative path of the first match in walk order.
pub fn find_any<S: AsRef<str>>(candidates: &[S], root: &Path) -> Option<String> {
    let names: Vec<&str> = candidates
        .iter()
        .map(|c| file_name_of(c.as_ref()).trim_end())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return None;
    }

    find_file(root, |name| names.contains(&name.trim_end()))
}

/// Finds a file whose name starts with `key` anywhere under `root`.
///
/// The key must end at a word boundary, so `OPA-42` never matches
/// `OPA-420 ...`. Used to relocate notes anchored by an issue key after
/// the rest of their title changed.
pub fn find_by_key_prefix(key: &str, root: &Path) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    find_file(root, |name| {
        name.trim_end()
            .strip_prefix(key)
            .is_some_and(|rest| !rest.starts_with(char::is_alphanumeric))
    })
}

fn find_file(root: &Path, matches: impl Fn(&str) -> bool) -> Option<String> {
    let found = walk_files(root).find(|entry| entry.file_name().to_str().is_some_and(&matches))?;
    let relative = found.path().strip_prefix(root).ok()?;
    let relative = to_posix(relative);
    log::debug!("located {relative} under {}", root.display());
    Some(relative)
}

/// Walks every visible file under `root`.
///
/// Hidden files and directories (starting with `.`) are skipped, which
/// keeps editor trash and settings folders out of the search.
fn walk_files(root: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Renames a note within its own directory.
///
/// `from` is relative to `root`. Returns the new relative path. Renaming
/// a file onto its own name is a no-op.
///
/// # Errors
///
/// Returns `FsError::AlreadyExists` if a different file already has the new name.
/// Returns `FsError::NotFound` if `from` doesn't exist.
pub fn rename_in_place(root: &Path, from: &str, new_name: &str) -> Result<String, FsError> {
    let old_path = root.join(from);
    let new_path = match old_path.parent() {
        Some(parent) => parent.join(new_name),
        None => root.join(new_name),
    };

    if new_path != old_path {
        if new_path.exists() {
            return Err(FsError::AlreadyExists { path: new_path });
        }
        std::fs::rename(&old_path, &new_path).map_err(|e| FsError::from_io(&old_path, e))?;
    }

    let relative = new_path
        .strip_prefix(root)
        .map(to_posix)
        .unwrap_or_else(|_| new_name.to_string());
    Ok(relative)
}
