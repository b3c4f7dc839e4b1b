//! Check command handler.
//!
//! Read-only: stale entries are reported, never repaired. `open` repairs
//! an entry the next time its URL is resolved.

use anyhow::{Context, Result, bail};
use std::path::Path;

use super::entry_listings;
use crate::cli::CheckArgs;
use crate::cli::output::{EntryListing, Output, OutputFormat};
use crate::index::Index;
use crate::reconcile::Settings;

/// Index entries whose note does not exist at the stored path.
pub fn stale_entries(index: &Index, root: &Path) -> Vec<EntryListing> {
    entry_listings(index, root)
        .into_iter()
        .filter(|entry| !entry.exists)
        .collect()
}

pub fn handle_check(args: &CheckArgs, settings: &Settings) -> Result<()> {
    let store = settings.index_store();
    let index = store
        .load()
        .with_context(|| format!("failed to load index at {}", store.path().display()))?;
    let stale = stale_entries(&index, settings.root());

    match args.format {
        OutputFormat::Json => {
            let out = Output::new(&stale);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Paths => {
            for entry in &stale {
                println!("{}", entry.path);
            }
        }
        OutputFormat::Human => {
            if stale.is_empty() {
                println!("All {} index entries OK.", index.len());
                return Ok(());
            }
            for entry in &stale {
                println!("missing: {} ({})", entry.path, entry.url);
            }
            println!(
                "\nFound {} stale entr{} of {}",
                stale.len(),
                if stale.len() == 1 { "y" } else { "ies" },
                index.len()
            );
        }
    }

    if !stale.is_empty() {
        bail!("check failed");
    }
    Ok(())
}
