pub const MAX_FILENAME_LENGTH: usize = 255;

const FALLBACK_NAME: &str = "file";

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '[' | ']' | '(' | ')' | ' ')
}

/// Make a user-supplied name safe to use as a path component.
///
/// Disallowed characters become `_`, surrounding whitespace is trimmed and the
/// result is capped at [`MAX_FILENAME_LENGTH`] bytes.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .collect();
    let trimmed = replaced.trim();

    // Only ASCII survives the replacement, so any byte index is a char boundary.
    let capped = &trimmed[..trimmed.len().min(MAX_FILENAME_LENGTH)];
    let capped = capped.trim_end();

    if capped.is_empty() || capped.chars().all(|c| c == '.') {
        FALLBACK_NAME.to_string()
    } else {
        capped.to_string()
    }
}
