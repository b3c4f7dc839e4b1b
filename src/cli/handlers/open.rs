//! Open command handler.

use anyhow::{Context, Result};

use crate::cli::OpenArgs;
use crate::infra::IssueTracker;
use crate::reconcile::Reconciler;

/// Resolves the note for the arguments and returns the path to print.
pub fn open_note<T: IssueTracker>(args: &OpenArgs, reconciler: &Reconciler<T>) -> Result<String> {
    let title = args.title();
    let resolution = reconciler
        .resolve_note(&args.url, &title)
        .with_context(|| format!("failed to resolve note for {}", args.url))?;

    if args.absolute {
        let full = reconciler.settings().root().join(&resolution.filename);
        return Ok(full.display().to_string());
    }
    Ok(resolution.filename)
}

/// Prints the note path without a trailing newline, ready for a launcher
/// to pass to an editor.
pub fn handle_open<T: IssueTracker>(args: &OpenArgs, reconciler: &Reconciler<T>) -> Result<()> {
    let path = open_note(args, reconciler)?;
    print!("{path}");
    Ok(())
}
