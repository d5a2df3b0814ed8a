//! M3U8 parsing: resolve a playlist URL down to absolute media segment URLs.

use anyhow::{anyhow, bail, Context, Result};
use url::Url;

/// A parsed playlist document, with URIs resolved against its own URL.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistDoc {
    /// Master playlist: URL of the highest-bandwidth non-I-frame variant.
    Master { best_variant: String },
    /// Media playlist: segment URLs in order.
    Media { segments: Vec<String> },
}

pub fn parse_playlist(bytes: &[u8], playlist_url: &str) -> Result<PlaylistDoc> {
    let base = Url::parse(playlist_url).with_context(|| format!("invalid playlist url {playlist_url}"))?;
    let parsed = m3u8_rs::parse_playlist_res(bytes)
        .map_err(|e| anyhow!("invalid m3u8 at {playlist_url}: {e:?}"))?;
    match parsed {
        m3u8_rs::Playlist::MasterPlaylist(master) => {
            let best = master
                .variants
                .iter()
                .filter(|v| !v.is_i_frame)
                .max_by_key(|v| v.bandwidth)
                .ok_or_else(|| anyhow!("master playlist {playlist_url} has no variants"))?;
            Ok(PlaylistDoc::Master {
                best_variant: resolve(&base, &best.uri)?,
            })
        }
        m3u8_rs::Playlist::MediaPlaylist(media) => {
            if media.segments.is_empty() {
                bail!("media playlist {playlist_url} has no segments");
            }
            let segments = media
                .segments
                .iter()
                .map(|s| resolve(&base, &s.uri))
                .collect::<Result<Vec<_>>>()?;
            Ok(PlaylistDoc::Media { segments })
        }
    }
}

fn resolve(base: &Url, uri: &str) -> Result<String> {
    base.join(uri.trim())
        .map(String::from)
        .with_context(|| format!("bad playlist uri {uri}"))
}
