//! Drives tasks through fetch → download → checkpoint → save.
//!
//! One task is processed at a time. Every failure is contained to the task it
//! happened on; the batch always continues.

use thiserror::Error;

use crate::config::Config;
use crate::error::{FetchOutcomeError, MalformedRecordError, MuxFailure};
use crate::header::{formatted_header, HeaderKind};
use crate::mux::Muxer;
use crate::playlist::{fetch_playlist, PlaylistParser};
use crate::record::Checkpoint;
use crate::store::ConfigStore;

/// Why a task did not complete on this attempt.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("no task at index {0}")]
    NoSuchTask(usize),
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
    #[error(transparent)]
    Fetch(#[from] FetchOutcomeError),
    #[error(transparent)]
    Download(#[from] MuxFailure),
}

/// Result of a task that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Marked complete in an earlier run; nothing was attempted.
    AlreadyComplete,
    /// Downloaded in this run.
    Completed { filename: String },
}

/// Tally of a `process_all` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub already_complete: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub struct Controller<'a, P, M> {
    store: &'a ConfigStore,
    parser: P,
    muxer: M,
}

impl<'a, P: PlaylistParser, M: Muxer> Controller<'a, P, M> {
    pub fn new(store: &'a ConfigStore, parser: P, muxer: M) -> Self {
        Self {
            store,
            parser,
            muxer,
        }
    }

    /// Processes the task at `index`.
    ///
    /// Complete and malformed tasks return without touching the network.
    /// After a download attempt the task's marker is updated and the whole
    /// task file is saved; a failed save is reported but the in-memory marker
    /// stays updated.
    pub fn process_one(&self, config: &mut Config, index: usize) -> Result<TaskOutcome, TaskError> {
        let entry = config.urls.get(index).ok_or(TaskError::NoSuchTask(index))?;
        let rec = match entry.decode() {
            Ok(rec) => rec,
            Err(e) => {
                eprintln!("urls are in wrong format, error: {e}");
                tracing::warn!(index, "skipping malformed task: {}", e);
                return Err(e.into());
            }
        };
        if rec.marker.is_complete() {
            tracing::debug!(index, url = %rec.url, "task already complete");
            return Ok(TaskOutcome::AlreadyComplete);
        }

        let playlist = fetch_playlist(&self.parser, &rec.url, &config.header, index)?;

        let media_header = formatted_header(&config.header, &rec.url, HeaderKind::Media);
        let start_index = rec.marker.start_index();
        tracing::info!(
            index,
            url = %rec.url,
            start_index,
            segments = playlist.segments.len(),
            "downloading {}",
            playlist.filename
        );
        let result = self
            .muxer
            .mux(&playlist, &media_header, start_index, rec.trim_window());

        let checkpoint = match &result {
            Ok(()) => Checkpoint::Complete,
            Err(failure) => Checkpoint::SegmentIndex(failure.index),
        };
        // Decoded above, so the entry is well-formed.
        config.urls[index].set_marker(checkpoint)?;

        match &result {
            Ok(()) => {
                println!("Completed: {}:{}", playlist.filename, rec.url);
                tracing::info!(index, url = %rec.url, "completed {}", playlist.filename);
            }
            Err(failure) => {
                eprintln!("{:#}", failure.source);
                eprintln!("Download Failed at line: {}", failure.index);
                tracing::warn!(index, url = %rec.url, segment = failure.index, "download failed: {:#}", failure.source);
            }
        }

        if let Err(e) = self.store.save(config) {
            eprintln!("{e}");
            tracing::error!(index, "saving task file failed: {}", e);
        }

        match result {
            Ok(()) => Ok(TaskOutcome::Completed {
                filename: playlist.filename,
            }),
            Err(failure) => Err(failure.into()),
        }
    }

    /// Processes every task in order. Never stops early.
    pub fn process_all(&self, config: &mut Config) -> RunSummary {
        let mut summary = RunSummary::default();
        for index in 0..config.urls.len() {
            match self.process_one(config, index) {
                Ok(TaskOutcome::Completed { .. }) => summary.completed += 1,
                Ok(TaskOutcome::AlreadyComplete) => summary.already_complete += 1,
                Err(TaskError::Download(_)) => summary.failed += 1,
                Err(_) => summary.skipped += 1,
            }
        }
        tracing::info!(?summary, "run finished");
        summary
    }
}
