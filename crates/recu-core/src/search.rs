//! Plain-text marker search used when scanning HTML.

/// Returns the text between the first `start` marker and the next `end` marker after it.
pub fn between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = haystack.find(start)? + start.len();
    let rest = &haystack[from..];
    let to = rest.find(end)?;
    Some(&rest[..to])
}
