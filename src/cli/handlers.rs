//! Command handlers for the CLI.

mod check;
mod list;
mod open;

use std::path::Path;

use crate::cli::output::EntryListing;
use crate::index::Index;

// Re-export public items
pub use check::{handle_check, stale_entries};
pub use list::handle_list;
pub use open::{handle_open, open_note};

// ===========================================
// Shared Utilities
// ===========================================

/// Pairs every index entry with whether its note exists under `root`.
pub(crate) fn entry_listings(index: &Index, root: &Path) -> Vec<EntryListing> {
    index
        .iter()
        .map(|(url, path)| EntryListing {
            url: url.to_string(),
            path: path.to_string(),
            exists: !path.is_empty() && root.join(path).is_file(),
        })
        .collect()
}
