//! Request header construction from the task file's shared header map.

use std::collections::BTreeMap;

/// Header name → value, as stored under `header` in the task file.
pub type HeaderMap = BTreeMap<String, String>;

pub const COOKIE: &str = "Cookie";
pub const USER_AGENT: &str = "User-Agent";

/// What a request is for; picks the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// Playlists and media segments.
    Media,
    /// HTML pages (listings, play pages).
    Page,
}

/// Builds the headers for one request: every configured header plus `Accept`,
/// and `Referer` when `referer` is non-empty. Blank configured values are dropped.
pub fn formatted_header(headers: &HeaderMap, referer: &str, kind: HeaderKind) -> HeaderMap {
    let mut out: HeaderMap = headers
        .iter()
        .filter(|(k, v)| !k.trim().is_empty() && !v.trim().is_empty())
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    let accept = match kind {
        HeaderKind::Media => "*/*",
        HeaderKind::Page => "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    };
    out.entry("Accept".to_string())
        .or_insert_with(|| accept.to_string());
    if !referer.is_empty() {
        out.insert("Referer".to_string(), referer.to_string());
    }
    out
}
