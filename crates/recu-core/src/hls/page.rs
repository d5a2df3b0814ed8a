//! Play page → playlist resolution.

use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use regex::Regex;

use super::filename::video_filename;
use super::media::{parse_playlist, PlaylistDoc};
use crate::header::{formatted_header, HeaderKind, HeaderMap};
use crate::playlist::{ParseResult, ParseStatus, Playlist, PlaylistParser};
use crate::transport::{HttpResponse, Transport};

const PAGE_TIMEOUT: Duration = Duration::from_secs(10);
const PLAYLIST_TIMEOUT: Duration = Duration::from_secs(30);

fn playlist_link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"https?://[^\s"'<>\\]+?\.m3u8[^\s"'<>\\]*"#).expect("valid playlist regex")
    })
}

/// Resolves play pages by locating the first `.m3u8` link in the page and
/// following it (through a master playlist if needed) to the media segments.
pub struct HlsPageParser<T> {
    transport: T,
}

impl<T: Transport> HlsPageParser<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    fn resolve(&self, url: &str, headers: &HeaderMap, index: usize) -> Result<Playlist, (ParseStatus, anyhow::Error)> {
        let fail = |e: anyhow::Error| (ParseStatus::Panic, e);

        let page_headers = formatted_header(headers, "", HeaderKind::Page);
        let page = self
            .transport
            .get(url, PAGE_TIMEOUT, &page_headers)
            .map_err(fail)?;
        let body = page.text();
        if let Some(status) = classify_page(&page, &body) {
            return Err((
                status,
                anyhow!("play page {url} refused playback (HTTP {})", page.status),
            ));
        }

        let mut next = first_playlist_link(&body)
            .map_err(|_| fail(anyhow!("no playlist link found on {url}")))?;

        let media_headers = formatted_header(headers, url, HeaderKind::Media);
        // Master playlists nest one level.
        for _ in 0..2 {
            let resp = self
                .transport
                .get(&next, PLAYLIST_TIMEOUT, &media_headers)
                .map_err(fail)?;
            if !resp.is_ok() {
                return Err(fail(anyhow!("HTTP {} fetching playlist {next}", resp.status)));
            }
            match parse_playlist(&resp.body, &next).map_err(fail)? {
                PlaylistDoc::Master { best_variant } => next = best_variant,
                PlaylistDoc::Media { segments } => {
                    return Ok(Playlist {
                        index,
                        url: url.to_string(),
                        filename: video_filename(url),
                        segments,
                    })
                }
            }
        }
        Err(fail(anyhow!("playlist chain too deep at {next}")))
    }
}

impl<T: Transport> PlaylistParser for HlsPageParser<T> {
    fn parse(&self, url: &str, headers: &HeaderMap, index: usize) -> ParseResult {
        match self.resolve(url, headers, index) {
            Ok(playlist) => {
                tracing::debug!(%url, segments = playlist.segments.len(), "playlist resolved");
                ParseResult::ok(playlist)
            }
            Err((status, e)) => ParseResult::failed(status, e),
        }
    }
}

/// Maps a play page response to a failure status, or `None` when the page is usable.
fn classify_page(page: &HttpResponse, body: &str) -> Option<ParseStatus> {
    match page.status {
        200 => {}
        403 | 503 => return Some(ParseStatus::Cloudflare),
        401 => return Some(ParseStatus::Cookie),
        429 => return Some(ParseStatus::Wait),
        _ => return Some(ParseStatus::Panic),
    }
    if playlist_link().is_match(&body.replace("\\/", "/")) {
        return None;
    }
    let lower = body.to_ascii_lowercase();
    if lower.contains("daily limit") || lower.contains("daily view") {
        Some(ParseStatus::Wait)
    } else if lower.contains("please log in") || lower.contains("sign in to watch") {
        Some(ParseStatus::Cookie)
    } else {
        None
    }
}

/// First `.m3u8` link in a page, with JSON slash escapes and `&amp;` undone.
fn first_playlist_link(body: &str) -> Result<String> {
    match playlist_link().find(&body.replace("\\/", "/")) {
        Some(m) => Ok(m.as_str().replace("&amp;", "&")),
        None => bail!("no playlist link"),
    }
}
