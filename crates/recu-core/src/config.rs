use serde::{Deserialize, Serialize};

use crate::error::MissingHeaderError;
use crate::header::{HeaderMap, COOKIE, USER_AGENT};
use crate::record::{TaskEntry, TaskRecord, TrimSpec};

/// Default task file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// The task file: every tracked URL plus the request headers shared by all of them.
///
/// A task's identity is its position in `urls`; entries are never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub urls: Vec<TaskEntry>,
    #[serde(default)]
    pub header: HeaderMap,
}

impl Config {
    /// Template written on first run: one blank url and blank credential headers.
    pub fn default_template() -> Self {
        let mut header = HeaderMap::new();
        header.insert(COOKIE.to_string(), String::new());
        header.insert(USER_AGENT.to_string(), String::new());
        Self {
            urls: vec![TaskEntry::from_value(serde_json::Value::String(String::new()))],
            header,
        }
    }

    /// True while the file still looks like the unfilled template.
    pub fn is_empty(&self) -> bool {
        let first_blank = match self.urls.first() {
            None => true,
            Some(entry) => entry.as_value().as_str() == Some(""),
        };
        first_blank || self.header_value(COOKIE).is_empty() || self.header_value(USER_AGENT).is_empty()
    }

    /// Checks that the credential headers needed for any request are filled in.
    pub fn validate_headers(&self) -> Result<(), MissingHeaderError> {
        for name in [COOKIE, USER_AGENT] {
            if self.header_value(name).is_empty() {
                return Err(MissingHeaderError(name));
            }
        }
        Ok(())
    }

    /// Appends a manually entered task; returns its index.
    ///
    /// The blank template entry, if still present in the first slot, is replaced.
    pub fn push_url(&mut self, url: &str, trim: Option<TrimSpec>) -> usize {
        let mut rec = TaskRecord::new(url);
        rec.trim = trim;
        if self.urls.len() == 1 && self.urls[0].as_value().as_str() == Some("") {
            self.urls[0] = rec.into();
            return 0;
        }
        self.urls.push(rec.into());
        self.urls.len() - 1
    }

    /// True if some decodable entry already tracks `url`.
    pub fn contains_url(&self, url: &str) -> bool {
        self.urls
            .iter()
            .filter_map(|e| e.decode().ok())
            .any(|rec| rec.url == url)
    }

    fn header_value(&self, name: &str) -> &str {
        self.header.get(name).map(|v| v.trim()).unwrap_or("")
    }
}
