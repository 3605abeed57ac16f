//! Upload file name hygiene.
//!
//! The original file name is stored verbatim-ish for download
//! Content-Disposition, but it is user input: strip path components and
//! characters that break headers or filesystems.

/// Sanitize an uploaded file name.
///
/// Removes path components, replaces shell/header-hostile characters,
/// and bounds the length at 255 bytes preserving the extension.
pub fn sanitize_filename(filename: &str) -> String {
    // Remove path components
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return "unnamed_file".to_string();
    }

    // Truncate if too long (preserve extension)
    if sanitized.len() > MAX_FILENAME_BYTES {
        if let Some(dot_pos) = sanitized.rfind('.') {
            let ext = &sanitized[dot_pos..];
            if ext.len() < MAX_FILENAME_BYTES {
                let name = truncate_to_boundary(sanitized, MAX_FILENAME_BYTES - ext.len());
                return format!("{}{}", name, ext);
            }
        }
        return truncate_to_boundary(sanitized, MAX_FILENAME_BYTES).to_string();
    }

    sanitized.to_string()
}

/// Maximum stored file name length in bytes.
const MAX_FILENAME_BYTES: usize = 255;

/// Cut a string to at most `max` bytes without splitting a character.
fn truncate_to_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
