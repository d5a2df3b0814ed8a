//! Download-and-mux contract used by the controller.

use crate::error::MuxFailure;
use crate::header::HeaderMap;
use crate::playlist::Playlist;
use crate::trim::TrimWindow;

/// Turns a playlist into a video file.
pub trait Muxer {
    /// Downloads the segments of `trim` starting at `start_index`.
    ///
    /// On failure the error carries the segment index to resume from.
    fn mux(
        &self,
        playlist: &Playlist,
        headers: &HeaderMap,
        start_index: usize,
        trim: TrimWindow,
    ) -> Result<(), MuxFailure>;
}

impl<M: Muxer + ?Sized> Muxer for &M {
    fn mux(
        &self,
        playlist: &Playlist,
        headers: &HeaderMap,
        start_index: usize,
        trim: TrimWindow,
    ) -> Result<(), MuxFailure> {
        (**self).mux(playlist, headers, start_index, trim)
    }
}
