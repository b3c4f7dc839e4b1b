//! List command handler.

use anyhow::{Context, Result};

use super::entry_listings;
use crate::cli::ListArgs;
use crate::cli::output::{Output, OutputFormat};
use crate::reconcile::Settings;

pub fn handle_list(args: &ListArgs, settings: &Settings) -> Result<()> {
    let store = settings.index_store();
    let index = store
        .load()
        .with_context(|| format!("failed to load index at {}", store.path().display()))?;
    let listings = entry_listings(&index, settings.root());

    match args.format {
        OutputFormat::Human => {
            if listings.is_empty() {
                println!("No notes indexed.");
                return Ok(());
            }
            for entry in &listings {
                let marker = if entry.exists { "" } else { " (missing)" };
                println!("{}{}", entry.path, marker);
                println!("  {}", entry.url);
            }
        }
        OutputFormat::Json => {
            let out = Output::new(listings);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Paths => {
            for entry in &listings {
                println!("{}", entry.path);
            }
        }
    }

    Ok(())
}
