//! Playlist retrieval: the parser contract and the adapter that turns its
//! status tags into a typed outcome.

use crate::error::FetchOutcomeError;
use crate::header::HeaderMap;

/// Media segments of one video, ready for download.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    /// Position of the owning task in the task file.
    pub index: usize,
    /// Play page the playlist was resolved from.
    pub url: String,
    /// Output file name for the muxed video.
    pub filename: String,
    /// Absolute segment URLs in playback order.
    pub segments: Vec<String>,
}

/// Status reported by a playlist parser. Wire tags: `""`, `cloudflare`,
/// `cookie`, `wait`, `panic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    Ok,
    Cloudflare,
    Cookie,
    Wait,
    Panic,
}

impl ParseStatus {
    pub fn as_tag(self) -> &'static str {
        match self {
            ParseStatus::Ok => "",
            ParseStatus::Cloudflare => "cloudflare",
            ParseStatus::Cookie => "cookie",
            ParseStatus::Wait => "wait",
            ParseStatus::Panic => "panic",
        }
    }

    /// Unknown tags map to `Panic`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "" => ParseStatus::Ok,
            "cloudflare" => ParseStatus::Cloudflare,
            "cookie" => ParseStatus::Cookie,
            "wait" => ParseStatus::Wait,
            _ => ParseStatus::Panic,
        }
    }
}

/// What a parser returns: a playlist (default when unusable), a status, and
/// an optional error detail.
#[derive(Debug)]
pub struct ParseResult {
    pub playlist: Playlist,
    pub status: ParseStatus,
    pub error: Option<anyhow::Error>,
}

impl ParseResult {
    pub fn ok(playlist: Playlist) -> Self {
        Self {
            playlist,
            status: ParseStatus::Ok,
            error: None,
        }
    }

    pub fn failed(status: ParseStatus, error: anyhow::Error) -> Self {
        Self {
            playlist: Playlist::default(),
            status,
            error: Some(error),
        }
    }
}

/// Resolves a play page into a playlist.
pub trait PlaylistParser {
    fn parse(&self, url: &str, headers: &HeaderMap, index: usize) -> ParseResult;
}

impl<P: PlaylistParser + ?Sized> PlaylistParser for &P {
    fn parse(&self, url: &str, headers: &HeaderMap, index: usize) -> ParseResult {
        (**self).parse(url, headers, index)
    }
}

/// Fetches the playlist for the task at `index`.
///
/// Any non-`Ok` outcome is reported on stderr here; callers only need to skip the URL.
pub fn fetch_playlist<P: PlaylistParser + ?Sized>(
    parser: &P,
    url: &str,
    headers: &HeaderMap,
    index: usize,
) -> Result<Playlist, FetchOutcomeError> {
    let ParseResult {
        playlist,
        status,
        error,
    } = parser.parse(url, headers, index);
    let detail = || {
        error
            .as_ref()
            .map(|e| format!("{e:#}"))
            .unwrap_or_else(|| "unknown error".to_string())
    };
    let url = url.to_string();
    let err = match status {
        ParseStatus::Ok if error.is_none() => return Ok(playlist),
        ParseStatus::Ok | ParseStatus::Panic => FetchOutcomeError::UnexpectedFailure {
            detail: detail(),
            url,
        },
        ParseStatus::Cloudflare => FetchOutcomeError::CloudflareBlocked {
            detail: detail(),
            url,
        },
        ParseStatus::Cookie => FetchOutcomeError::LoginRequired { url },
        ParseStatus::Wait => FetchOutcomeError::QuotaExceeded { url },
    };
    eprintln!("{err}");
    tracing::warn!(index, status = status.as_tag(), "playlist fetch failed: {}", err);
    Err(err)
}
