//! Task file persistence.
//!
//! The whole `Config` is rewritten on every save. Saves are serialized by one
//! process-wide mutex shared by every store; the guard is scoped, so every
//! exit path (including write failures) releases it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::config::Config;
use crate::error::PersistenceError;

/// Held for the whole of every save, across all `ConfigStore` instances.
static SAVE_LOCK: Mutex<()> = Mutex::new(());

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the task file.
    pub fn load(&self) -> Result<Config, PersistenceError> {
        let bytes = fs::read(&self.path).map_err(|source| PersistenceError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Loads the task file, writing the default template first if none exists.
    pub fn load_or_init(&self) -> Result<Config, PersistenceError> {
        if !self.path.exists() {
            let template = Config::default_template();
            self.save(&template)?;
            tracing::info!("created task file template at {}", self.path.display());
            return Ok(template);
        }
        self.load()
    }

    /// Serializes `config` (tab-indented JSON) and replaces the task file.
    ///
    /// Written to a sibling temp file first and renamed over the target.
    pub fn save(&self, config: &Config) -> Result<(), PersistenceError> {
        let _guard = SAVE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        let json = to_json(config).map_err(PersistenceError::Serialize)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let tmp = tmp_path(&self.path);
        let write = |path: &Path, result: std::io::Result<()>| {
            result.map_err(|source| PersistenceError::Write {
                path: path.to_path_buf(),
                source,
            })
        };
        write(&tmp, fs::write(&tmp, &json))?;
        if let Err(e) = write(&self.path, fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        tracing::debug!(path = %self.path.display(), tasks = config.urls.len(), "task file saved");
        Ok(())
    }
}

fn to_json(config: &Config) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut ser)?;
    Ok(buf)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(".tmp");
    PathBuf::from(o)
}
