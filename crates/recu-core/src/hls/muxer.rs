//! Sequential segment download, concatenated into one transport stream file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};

use crate::error::MuxFailure;
use crate::header::HeaderMap;
use crate::mux::Muxer;
use crate::playlist::Playlist;
use crate::transport::Transport;
use crate::trim::TrimWindow;

const SEGMENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Downloads segments one by one and appends each complete segment to
/// `<output_dir>/<playlist.filename>`.
///
/// Starting at the first segment of the trim window truncates the output;
/// any later start index resumes by appending.
pub struct SegmentMuxer<T> {
    transport: T,
    output_dir: PathBuf,
    progress: bool,
}

impl<T: Transport> SegmentMuxer<T> {
    pub fn new(transport: T, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            output_dir: output_dir.into(),
            progress: false,
        }
    }

    /// Print a `segment i/n` progress line to stderr while downloading.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn output_path(&self, playlist: &Playlist) -> PathBuf {
        self.output_dir.join(&playlist.filename)
    }

    fn fetch_segment(&self, url: &str, headers: &HeaderMap) -> anyhow::Result<Vec<u8>> {
        let resp = self.transport.get(url, SEGMENT_TIMEOUT, headers)?;
        if !(200..300).contains(&resp.status) {
            return Err(anyhow!("HTTP {} for segment {url}", resp.status));
        }
        Ok(resp.body)
    }
}

fn open_output(path: &Path, truncate: bool) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    if truncate {
        File::create(path)
    } else {
        OpenOptions::new().create(true).append(true).open(path)
    }
}

impl<T: Transport> Muxer for SegmentMuxer<T> {
    fn mux(
        &self,
        playlist: &Playlist,
        headers: &HeaderMap,
        start_index: usize,
        trim: TrimWindow,
    ) -> Result<(), MuxFailure> {
        let window = trim.segment_range(playlist.segments.len());
        if window.is_empty() {
            return Err(MuxFailure::new(
                start_index,
                anyhow!("trim window selects no segments of {}", playlist.url),
            ));
        }
        let first = start_index.max(window.start);
        if first >= window.end {
            tracing::debug!(start_index, end = window.end, "no segments left to download");
            return Ok(());
        }

        let path = self.output_path(playlist);
        let mut out = open_output(&path, first == window.start)
            .with_context(|| format!("open output {}", path.display()))
            .map_err(|e| MuxFailure::new(first, e))?;

        for i in first..window.end {
            let bytes = self
                .fetch_segment(&playlist.segments[i], headers)
                .map_err(|e| MuxFailure::new(i, e))?;
            out.write_all(&bytes)
                .with_context(|| format!("write {}", path.display()))
                .map_err(|e| MuxFailure::new(i, e))?;
            if self.progress {
                eprint!("\rsegment {}/{}", i + 1, window.end);
            }
            tracing::trace!(segment = i, bytes = bytes.len(), "segment written");
        }
        if self.progress {
            eprintln!();
        }
        tracing::debug!(path = %path.display(), "mux finished");
        Ok(())
    }
}
