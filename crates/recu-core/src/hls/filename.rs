//! Output file names for downloaded videos.

const FALLBACK: &str = "video";
const EXTENSION: &str = ".ts";
const NAME_MAX: usize = 255;

/// Derives the output file name from a play URL.
///
/// `https://host/<namespace>/video/<id>/play` → `<namespace>_<id>.ts`; other
/// URLs use their last meaningful path segment.
pub fn video_filename(play_url: &str) -> String {
    let segments: Vec<String> = url::Url::parse(play_url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .map(|s| s.filter(|p| !p.is_empty()).map(str::to_string).collect())
        })
        .unwrap_or_default();

    let stem = match segments.iter().position(|s| s == "video") {
        Some(pos) if pos > 0 && pos + 1 < segments.len() => {
            format!("{}_{}", segments[pos - 1], segments[pos + 1])
        }
        _ => segments
            .iter()
            .rev()
            .find(|s| s.as_str() != "play")
            .cloned()
            .unwrap_or_default(),
    };

    let stem = sanitize(&stem);
    let stem = if stem.is_empty() { FALLBACK } else { stem.as_str() };
    format!("{stem}{EXTENSION}")
}

/// Replaces path separators, NUL, whitespace and control characters with `_`,
/// collapses runs of `_`, trims dots/underscores and caps the length.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for c in name.chars() {
        let unsafe_char = c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace();
        let c = if unsafe_char { '_' } else { c };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        out.push(c);
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let max = NAME_MAX - EXTENSION.len();
    let mut take = trimmed.len().min(max);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
