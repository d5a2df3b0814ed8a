//! Error taxonomy for task decoding, playlist fetching, downloading and persistence.
//!
//! Every error here is recovered per record by the controller; none of them
//! aborts a batch run.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::trim::TrimError;

/// A task entry in the task file does not match any of the known shapes.
#[derive(Debug, Error)]
#[error("malformed task record {value}: {reason}")]
pub struct MalformedRecordError {
    /// The offending entry, verbatim.
    pub value: Value,
    pub reason: MalformedReason,
}

impl MalformedRecordError {
    pub(crate) fn new(value: &Value, reason: MalformedReason) -> Self {
        Self {
            value: value.clone(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedReason {
    #[error("url is incorrect type")]
    UrlNotString,
    #[error("url is empty")]
    EmptyUrl,
    #[error("incorrect length of url array: {0}")]
    BadLength(usize),
    #[error("resume marker must be a segment index or \"COMPLETE\"")]
    BadMarker,
    #[error("trim values must be numbers")]
    TrimNotNumeric,
    #[error("trim window: {0}")]
    Trim(#[from] TrimError),
}

/// Non-`Ok` outcome of a playlist fetch. The URL is skipped for this run.
#[derive(Debug, Error)]
pub enum FetchOutcomeError {
    #[error("{detail}\nCloudflare Blocked: Failed on url: {url}")]
    CloudflareBlocked { url: String, detail: String },
    #[error("Please Log in: Failed on url: {url}")]
    LoginRequired { url: String },
    #[error("Daily View Used: Failed on url: {url}")]
    QuotaExceeded { url: String },
    #[error("Error: {detail}\nFailed on url: {url}")]
    UnexpectedFailure { url: String, detail: String },
}

/// A download/mux attempt stopped at `index`; the task resumes there next run.
#[derive(Debug, Error)]
#[error("download failed at segment {index}: {source}")]
pub struct MuxFailure {
    pub index: usize,
    #[source]
    pub source: anyhow::Error,
}

impl MuxFailure {
    pub fn new(index: usize, source: anyhow::Error) -> Self {
        Self { index, source }
    }
}

/// Reading or writing the task file failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("error: Parsing Json: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("error: Creating directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error: Saving Json {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error: Reading Json {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error: Parsing Json {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A required request header is missing from the task file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("header \"{0}\" is not configured; fill it in before downloading")]
pub struct MissingHeaderError(pub &'static str);
