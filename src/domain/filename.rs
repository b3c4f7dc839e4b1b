//! Title to filename conversion.

/// Extension given to every note file.
pub const NOTE_EXTENSION: &str = ".md";

/// Characters that are replaced with a space when building a filename.
const UNSAFE_CHARS: &[char] = &['/', '[', ']', '&', '"'];

/// Converts a page title to a note filename.
///
/// - Replaces `/`, `[`, `]`, `&` and `"` with a space
/// - Trims leading/trailing whitespace
/// - Appends the `.md` extension
///
/// # Examples
///
/// ```
/// use webnotes::domain::sanitize;
///
/// assert_eq!(sanitize("My Title"), "My Title.md");
/// assert_eq!(sanitize("[OPA-1] Fix & ship"), "OPA-1  Fix   ship.md");
/// ```
pub fn sanitize(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { ' ' } else { c })
        .collect();
    format!("{}{}", replaced.trim(), NOTE_EXTENSION)
}

/// Strips one trailing note extension, if present.
pub fn stem(filename: &str) -> &str {
    filename.strip_suffix(NOTE_EXTENSION).unwrap_or(filename)
}
