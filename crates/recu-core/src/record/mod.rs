//! Per-URL resumable task state and its on-disk encoding.
//!
//! A task is stored in the task file as a positional JSON array whose length
//! says which fields are present:
//!
//! | length | layout                                   |
//! |--------|------------------------------------------|
//! | 1      | `[url]`                                  |
//! | 2      | `[url, marker]`                          |
//! | 4      | `[url, trimStart, trimEnd, trimExtra]`   |
//! | 5      | `[url, trimStart, trimEnd, trimExtra, marker]` |
//!
//! A bare string is accepted as a length-1 record. The marker is either a
//! segment index (number) or the string `"COMPLETE"`.

mod codec;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::MalformedRecordError;
use crate::trim::{self, TrimError, TrimWindow};

pub use codec::{decode, encode};

/// Marker string for a finished task.
pub const COMPLETE_TAG: &str = "COMPLETE";

/// Download progress of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumeMarker {
    #[default]
    Unset,
    /// A previous attempt failed at this segment; resume from it.
    SegmentIndex(usize),
    Complete,
}

impl ResumeMarker {
    /// Segment to start the next attempt from.
    pub fn start_index(self) -> usize {
        match self {
            ResumeMarker::SegmentIndex(n) => n,
            ResumeMarker::Unset | ResumeMarker::Complete => 0,
        }
    }

    pub fn is_complete(self) -> bool {
        self == ResumeMarker::Complete
    }
}

/// A marker value the controller may write back after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    SegmentIndex(usize),
    Complete,
}

impl From<Checkpoint> for ResumeMarker {
    fn from(c: Checkpoint) -> Self {
        match c {
            Checkpoint::SegmentIndex(n) => ResumeMarker::SegmentIndex(n),
            Checkpoint::Complete => ResumeMarker::Complete,
        }
    }
}

/// The three stored trim numbers plus the window decoded from them.
///
/// The raw numbers are kept so a rewrite reproduces them exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimSpec {
    raw: [Number; 3],
    window: TrimWindow,
}

impl TrimSpec {
    pub fn from_numbers(raw: [Number; 3]) -> Result<Self, TrimError> {
        let window = trim::percent_window(&raw)?;
        Ok(Self { raw, window })
    }

    /// Builds a trim spec for manual entry. Whole values are stored as integers.
    pub fn new(start: f64, end: f64, extra: f64) -> Result<Self, TrimError> {
        let num = |v: f64| json_number(v).ok_or(TrimError::OutOfRange { start, end });
        Self::from_numbers([num(start)?, num(end)?, num(extra)?])
    }

    pub fn window(&self) -> TrimWindow {
        self.window
    }

    pub fn raw(&self) -> &[Number; 3] {
        &self.raw
    }
}

fn json_number(v: f64) -> Option<Number> {
    // Exactly representable integers only.
    if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 {
        Some(Number::from(v as i64))
    } else {
        Number::from_f64(v)
    }
}

/// Decoded task: url, optional trim, progress.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub url: String,
    pub trim: Option<TrimSpec>,
    pub marker: ResumeMarker,
}

impl TaskRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            trim: None,
            marker: ResumeMarker::Unset,
        }
    }

    pub fn with_trim(mut self, trim: TrimSpec) -> Self {
        self.trim = Some(trim);
        self
    }

    /// Trim window to download; full content when the record carries none.
    pub fn trim_window(&self) -> TrimWindow {
        self.trim.as_ref().map(TrimSpec::window).unwrap_or_default()
    }

    /// Applies a checkpoint. `Complete` is terminal: once set, later checkpoints are ignored.
    pub fn apply(&mut self, checkpoint: Checkpoint) {
        if !self.marker.is_complete() {
            self.marker = checkpoint.into();
        }
    }

    /// Encodes into the positional on-disk shape.
    pub fn to_value(&self) -> Value {
        codec::to_value(self)
    }
}

/// One slot of the task file's `urls` array, kept verbatim until it is mutated.
///
/// Entries that fail to decode stay untouched on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskEntry(Value);

impl TaskEntry {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn decode(&self) -> Result<TaskRecord, MalformedRecordError> {
        decode(&self.0)
    }

    /// Writes a new marker into the entry, growing `[url]`/`[url, a, b, c]`
    /// by one element or overwriting the existing trailing marker.
    pub fn set_marker(&mut self, checkpoint: Checkpoint) -> Result<(), MalformedRecordError> {
        self.0 = encode(&self.0, checkpoint)?;
        Ok(())
    }

    /// Short state label for listings.
    pub fn describe(&self) -> String {
        match self.decode() {
            Ok(rec) => match rec.marker {
                ResumeMarker::Unset => "pending".to_string(),
                ResumeMarker::SegmentIndex(n) => format!("resume@{n}"),
                ResumeMarker::Complete => "complete".to_string(),
            },
            Err(_) => "malformed".to_string(),
        }
    }
}

impl From<TaskRecord> for TaskEntry {
    fn from(rec: TaskRecord) -> Self {
        Self(rec.to_value())
    }
}
