//! Title-to-filename sanitization.

/// Maximum length of a sanitized name.
const MAX_NAME_LEN: usize = 100;

/// Derives a filesystem-safe name from an arbitrary media title.
///
/// Strips the reserved characters `\ / : * ? " < > |`, drops non-ASCII
/// characters, collapses whitespace runs to a single space, trims, and
/// truncates to 100 characters. Deterministic and total; sanitizing an
/// already-sanitized name is a no-op.
///
/// Two distinct titles may collapse to the same name; callers that care
/// about uniqueness must handle collisions themselves.
#[must_use]
pub fn sanitize(title: &str) -> String {
    let mut out = String::with_capacity(title.len().min(MAX_NAME_LEN));
    let mut pending_space = false;

    for ch in title.chars() {
        if matches!(ch, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
            continue;
        }
        if !ch.is_ascii() {
            continue;
        }
        if ch.is_ascii_whitespace() {
            // Leading whitespace is dropped outright.
            if !out.is_empty() {
                pending_space = true;
            }
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }

    // Output is pure ASCII, so byte truncation cannot split a character.
    out.truncate(MAX_NAME_LEN);
    while out.ends_with(' ') {
        out.pop();
    }
    out
}
