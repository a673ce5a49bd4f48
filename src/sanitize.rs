//! Free-text normalization shared by the importer and the query engine.
//!
//! Matching is exact-equality at the storage layer, so any value written
//! during import and any value looked up later must pass through the same
//! normalization. Both functions are pure and idempotent.

/// Literal sequences replaced with a single space each.
const SPACE_EQUIVALENTS: [&str; 4] = ["\n", "\r", "\t", "&nbsp"];

/// Quote characters deleted outright so values stay safe inside
/// equality predicates.
const QUOTES: [char; 2] = ['\'', '"'];

/// Normalize a free-text value: newlines, carriage returns, tabs, and the
/// `&nbsp` escape token each become one space; quotes are deleted; leading
/// and trailing whitespace is trimmed.
pub fn sanitize(val: &str) -> String {
    let mut out = val.to_string();
    for token in SPACE_EQUIVALENTS {
        out = out.replace(token, " ");
    }
    out.retain(|c| !QUOTES.contains(&c));
    out.trim().to_string()
}

/// `None`-preserving variant of [`sanitize`].
pub fn sanitize_opt(val: Option<&str>) -> Option<String> {
    val.map(sanitize)
}

/// Variant for values that may carry HTML markup pasted from rich-text
/// sources: extract plain text first, then apply [`sanitize`]. Used for
/// session descriptions on import and for every lookup value.
pub fn sanitize_html(val: &str) -> String {
    let text = html2text::from_read(val.as_bytes(), 80).unwrap_or_else(|_| val.to_owned());
    sanitize(&text)
}
