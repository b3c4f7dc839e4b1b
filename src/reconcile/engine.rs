//! URL→note reconciliation.
//!
//! The index is a hint over the notes tree, never the truth. Each call
//! recomputes the desired filename from the title and walks through the
//! ways a file can drift from its index entry: renamed in place, moved,
//! moved and renamed (issue notes only), or deleted.

use rand::Rng;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use super::settings::Settings;
use crate::domain::{
    Category, Classifier, ISSUE_SUFFIX, LinkedIssue, NO_ISSUE_MARKER, NOTE_EXTENSION,
    board_issue_key, issue_url, sanitize, stem, strip_query,
};
use crate::index::{IndexError, IndexStore};
use crate::infra::{
    FsError, ISSUE_LINK_PLACEHOLDER, IssueTracker, NoTracker, PULL_REQUEST_LINK_PLACEHOLDER,
    STORY_POINTS_PLACEHOLDER, Substitutions, TemplateError, ensure_dir, find_any,
    find_by_key_prefix, materialize, rename_in_place, write_plain_note,
};

/// Upper bound (inclusive) of the number appended to a colliding filename.
const COLLISION_SUFFIX_MAX: u32 = 100;

/// Random suffixes tried before falling back to a scan of every suffix.
const COLLISION_RANDOM_ATTEMPTS: u32 = 50;

/// Errors resolving a note. All of them abort the resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("no free filename for {desired}: it and every numbered variant already exist")]
    NoFreeFilename { desired: String },
}

/// How a URL was matched to its note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// URL seen for the first time; a new note was created.
    Created,
    /// Indexed note found under its current title.
    Confirmed,
    /// Indexed note still in place under an old name; renamed to the title.
    RenamedInPlace,
    /// Indexed note found elsewhere in the tree; its location was adopted.
    RelocatedByFind,
    /// Note found by its issue key and renamed to the title.
    RelocatedByKeyPrefix,
    /// Indexed note is gone; a new one was created.
    Recreated,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Created => "created",
            Outcome::Confirmed => "confirmed",
            Outcome::RenamedInPlace => "renamed in place",
            Outcome::RelocatedByFind => "relocated",
            Outcome::RelocatedByKeyPrefix => "relocated by issue key",
            Outcome::Recreated => "recreated",
        };
        f.write_str(s)
    }
}

/// Result of resolving a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Note path relative to the notes root, `/`-separated.
    pub filename: String,
    pub outcome: Outcome,
}

impl Resolution {
    fn new(filename: String, outcome: Outcome) -> Self {
        Self { filename, outcome }
    }
}

/// Resolves URLs to note files, keeping the index in step with the tree.
///
/// There is no locking between loading and saving the index; concurrent
/// resolutions against the same index race and the last save wins.
pub struct Reconciler<T: IssueTracker = NoTracker> {
    settings: Settings,
    classifier: Classifier,
    store: IndexStore,
    tracker: T,
}

impl Reconciler<NoTracker> {
    /// Creates a reconciler that never consults an issue tracker.
    pub fn offline(settings: Settings) -> Self {
        Self::new(settings, NoTracker)
    }
}

impl<T: IssueTracker> Reconciler<T> {
    pub fn new(settings: Settings, tracker: T) -> Self {
        let classifier = settings.classifier();
        let store = settings.index_store();
        Self {
            settings,
            classifier,
            store,
            tracker,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn root(&self) -> &Path {
        self.settings.root()
    }

    /// Finds or creates the note for `url`, returning its relative path.
    ///
    /// The index entry for the URL is rewritten with the result and the
    /// index is saved.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::Fs` if the notes root is invalid or a rename fails.
    /// Returns `ResolveError::Template` if a template is missing or a note cannot be written.
    /// Returns `ResolveError::Index` if the index cannot be read or written.
    pub fn resolve_note(&self, url: &str, title: &str) -> Result<Resolution, ResolveError> {
        ensure_dir(self.root())?;

        let (url, title) = self.expand_board_link(url, title);
        let url = strip_query(&url).to_string();
        let desired = sanitize(&title);

        let mut index = self.store.load()?;
        let resolution = match index.get(&url) {
            None => Resolution::new(self.create_new_file(&desired, &url)?, Outcome::Created),
            Some(stored) => {
                let stored = stored.to_string();
                self.reconcile(&stored, &desired, &url)?
            }
        };

        index.insert(url.as_str(), resolution.filename.as_str());
        self.store.save(&index)?;

        log::info!("{url}: {} {}", resolution.outcome, resolution.filename);
        Ok(resolution)
    }

    /// Rewrites a tracker board link to the issue it has open.
    ///
    /// The title becomes the issue's page title, or `KEY - Jira` when the
    /// tracker has nothing.
    fn expand_board_link(&self, url: &str, title: &str) -> (String, String) {
        let Some(base) = self.settings.tracker_url() else {
            return (url.to_string(), title.to_string());
        };
        let Some(key) = board_issue_key(url, base) else {
            return (url.to_string(), title.to_string());
        };

        log::debug!("board link selects issue {key}");
        let title = self
            .tracker
            .fetch_page_title(key)
            .unwrap_or_else(|| format!("{key} {ISSUE_SUFFIX}"));
        (issue_url(base, key), title)
    }

    /// Path of `filename` inside its category folder.
    fn prefixed(&self, category: Category, filename: &str) -> String {
        match self.settings.template(category) {
            Some(spec) => format!("{}/{}", spec.folder, filename),
            None => filename.to_string(),
        }
    }

    fn reconcile(&self, stored: &str, desired: &str, url: &str) -> Result<Resolution, ResolveError> {
        let root = self.root();
        let category = self.classifier.classify(desired);

        let prefixed = self.prefixed(category, desired);
        if root.join(&prefixed).exists() {
            return Ok(Resolution::new(prefixed, Outcome::Confirmed));
        }

        if !stored.is_empty() && root.join(stored).is_file() {
            if Path::new(stored).file_name().and_then(|n| n.to_str()) == Some(desired) {
                return Ok(Resolution::new(stored.to_string(), Outcome::Confirmed));
            }
            let renamed = rename_in_place(root, stored, desired)?;
            return Ok(Resolution::new(renamed, Outcome::RenamedInPlace));
        }

        if let Some(found) = find_any(&[stored, desired], root) {
            return Ok(Resolution::new(found, Outcome::RelocatedByFind));
        }

        if category.is_keyed()
            && let Some(key) = self.classifier.issue_key(desired)
            && let Some(found) = find_by_key_prefix(key, root)
        {
            let renamed = rename_in_place(root, &found, desired)?;
            return Ok(Resolution::new(renamed, Outcome::RelocatedByKeyPrefix));
        }

        let created = self.create_new_file(desired, url)?;
        Ok(Resolution::new(created, Outcome::Recreated))
    }

    /// Creates a note for `url`, from a template when its category has one.
    ///
    /// The category is fixed before collision handling, so a numbered
    /// filename stays in the same folder with the same template.
    fn create_new_file(&self, desired: &str, url: &str) -> Result<String, ResolveError> {
        let category = self.classifier.classify(desired);
        let filename = self.free_filename(category, desired)?;
        let relative = self.prefixed(category, &filename);
        let dest = self.root().join(&relative);

        match self.settings.template(category) {
            Some(spec) => {
                let substitutions = self.substitutions(category, &filename, url);
                materialize(&spec.template, &dest, &substitutions)?;
            }
            None => write_plain_note(&dest, url)?,
        }

        log::debug!("created {category} note {relative}");
        Ok(relative)
    }

    /// Picks a filename not yet taken in the category folder.
    ///
    /// Taken names get a random number appended to the stem. After a
    /// bounded number of random tries every suffix is checked in order.
    fn free_filename(&self, category: Category, desired: &str) -> Result<String, ResolveError> {
        let is_free = |name: &str| !self.root().join(self.prefixed(category, name)).exists();
        if is_free(desired) {
            return Ok(desired.to_string());
        }

        let numbered = |n: u32| format!("{}{}{}", stem(desired), n, NOTE_EXTENSION);
        let mut rng = rand::rng();
        let random = (0..COLLISION_RANDOM_ATTEMPTS)
            .map(|_| numbered(rng.random_range(0..=COLLISION_SUFFIX_MAX)));
        let sweep = (0..=COLLISION_SUFFIX_MAX).map(&numbered);

        random
            .chain(sweep)
            .find(|name| is_free(name))
            .ok_or_else(|| ResolveError::NoFreeFilename {
                desired: desired.to_string(),
            })
    }

    fn substitutions(&self, category: Category, filename: &str, url: &str) -> Substitutions {
        match category {
            Category::Plain => Substitutions::new(),
            Category::Issue => {
                let story_points = self
                    .issue_key_for(filename, url)
                    .and_then(|key| self.tracker.lookup_issue(key))
                    .and_then(|issue| issue.story_points);
                Substitutions::new()
                    .set(ISSUE_LINK_PLACEHOLDER, Some(url.to_string()))
                    .set(STORY_POINTS_PLACEHOLDER, story_points)
            }
            Category::IssueSecondary => {
                Substitutions::new().set(ISSUE_LINK_PLACEHOLDER, Some(url.to_string()))
            }
            Category::PullRequest => {
                let linked = match self.classifier.linked_issue(stem(filename)) {
                    Some(LinkedIssue::NoIssue) => Some(NO_ISSUE_MARKER.to_string()),
                    Some(LinkedIssue::Key(key)) => {
                        self.settings.tracker_url().map(|base| issue_url(base, &key))
                    }
                    None => None,
                };
                Substitutions::new()
                    .set(PULL_REQUEST_LINK_PLACEHOLDER, Some(url.to_string()))
                    .set(ISSUE_LINK_PLACEHOLDER, linked)
            }
        }
    }

    /// Issue key of a new issue note, from its filename or its browse URL.
    fn issue_key_for<'a>(&self, filename: &'a str, url: &'a str) -> Option<&'a str> {
        self.classifier.issue_key(filename).or_else(|| {
            url.rsplit_once("/browse/")
                .map(|(_, key)| key.trim_end_matches('/'))
                .filter(|key| !key.is_empty())
        })
    }
}
