//! String transforms shared by templates and file naming.

/// Replaces every character outside `[a-z0-9]` with `-`.
#[must_use]
pub fn hyphenize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Returns the last `/`-separated element of `path`.
///
/// Trailing slashes are ignored; an empty path yields `.` and a path of only
/// slashes yields `/`.
#[must_use]
pub fn basename(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    trimmed
        .rsplit('/')
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

/// Prefixes the first line and every line after a newline with `spaces` spaces.
#[must_use]
pub fn indent(spaces: usize, text: &str) -> String {
    let pad = " ".repeat(spaces);
    format!("{pad}{}", text.replace('\n', &format!("\n{pad}")))
}
