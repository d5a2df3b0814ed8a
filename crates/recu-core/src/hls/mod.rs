//! HLS implementations of the playlist and mux contracts.
//!
//! `HlsPageParser` resolves a play page to its media segments; `SegmentMuxer`
//! downloads those segments and concatenates them into a `.ts` file.

mod filename;
mod media;
mod muxer;
mod page;

pub use filename::video_filename;
pub use media::{parse_playlist, PlaylistDoc};
pub use muxer::SegmentMuxer;
pub use page::HlsPageParser;
