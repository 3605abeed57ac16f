//! Tag normalization.
//!
//! Tags arrive two ways: as a comma-separated string in the upload form,
//! and as a JSON array in metadata updates. Both paths normalize to the
//! same shape: trimmed, non-empty strings in input order.

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 100;

/// Validate a single (already trimmed) tag.
pub fn validate_tag(tag: &str) -> std::result::Result<(), String> {
    if tag.is_empty() {
        return Err("Tag cannot be empty".to_string());
    }
    if tag.len() > MAX_TAG_LENGTH {
        return Err(format!(
            "Tag must be {} characters or less",
            MAX_TAG_LENGTH
        ));
    }
    Ok(())
}

/// Split a comma-separated tag string into a normalized tag list.
///
/// Entries are trimmed and empties dropped, so `"a, b ,, c"` yields
/// `["a", "b", "c"]`. Input order is kept; duplicates are not collapsed.
pub fn parse_tag_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize a tag list supplied as a JSON array: trim each entry and
/// drop empties, keeping order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
