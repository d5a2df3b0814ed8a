//! Percent trim windows: which part of a playlist a task should capture.

use serde_json::Number;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrimError {
    #[error("expected 3 trim values, got {0}")]
    Arity(usize),
    #[error("trim value {0} is not a finite number")]
    NotFinite(Number),
    #[error("trim bounds must satisfy 0 <= start < end <= 100 (got {start}, {end})")]
    OutOfRange { start: f64, end: f64 },
}

/// Start/end percentages into the source media. `(0, 100)` is the full content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimWindow {
    pub start: f64,
    pub end: f64,
}

impl TrimWindow {
    pub const FULL: TrimWindow = TrimWindow {
        start: 0.0,
        end: 100.0,
    };

    pub fn new(start: f64, end: f64) -> Result<Self, TrimError> {
        if !(0.0..=100.0).contains(&start) || !(0.0..=100.0).contains(&end) || start >= end {
            return Err(TrimError::OutOfRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    /// Half-open segment range covered by the window for a playlist of `len` segments.
    pub fn segment_range(&self, len: usize) -> std::ops::Range<usize> {
        let n = len as f64;
        let first = ((n * self.start / 100.0).floor() as usize).min(len);
        let last = ((n * self.end / 100.0).ceil() as usize).min(len);
        first..last.max(first)
    }
}

impl Default for TrimWindow {
    fn default() -> Self {
        Self::FULL
    }
}

/// Decodes a stored trim triple into a window.
///
/// Only the first two values are interpreted (start and end percent); the
/// third is carried by the record but has no meaning here.
pub fn percent_window(values: &[Number]) -> Result<TrimWindow, TrimError> {
    if values.len() != 3 {
        return Err(TrimError::Arity(values.len()));
    }
    let start = finite(&values[0])?;
    let end = finite(&values[1])?;
    TrimWindow::new(start, end)
}

fn finite(n: &Number) -> Result<f64, TrimError> {
    n.as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TrimError::NotFinite(n.clone()))
}
