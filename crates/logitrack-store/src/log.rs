//! The on-device registration log, the fallback persistence channel.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use logitrack_core::RegistrationRecord;
use thiserror::Error;

/// File name of the registration log inside the data directory.
pub const REGISTRATION_LOG_FILE: &str = "registrations.json";

/// Errors raised by the registration log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("registration log I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("registration log serialization failed: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed, most-recent-first log of accepted registrations.
///
/// The whole sequence is rewritten on every append; the log stays a single
/// self-contained JSON document, small enough that this is cheaper than it
/// sounds.
#[derive(Debug, Clone)]
pub struct RegistrationLog {
    path: PathBuf,
}

impl RegistrationLog {
    /// Log stored at `<data_dir>/registrations.json`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(REGISTRATION_LOG_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full log, most recent first.
    ///
    /// A missing file is an empty log. A file that exists but does not parse
    /// is also treated as empty, with a warning; a damaged history must
    /// never block persisting a new registration, and the next successful
    /// append replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] when the file exists but cannot be read.
    pub fn read(&self) -> Result<Vec<RegistrationRecord>, LogError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LogError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "registration log is unreadable, starting over empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Prepends `record` and rewrites the log.
    ///
    /// Returns the number of records now stored.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] or [`LogError::Serialize`] when the rewrite
    /// fails; the previous log contents are left untouched in that case.
    pub fn append(&self, record: RegistrationRecord) -> Result<usize, LogError> {
        let mut records = self.read()?;
        records.insert(0, record);
        self.write(&records)?;
        Ok(records.len())
    }

    /// Writes the full sequence through a temp file and rename, so a crash
    /// mid-write cannot leave a half-written log behind.
    fn write(&self, records: &[RegistrationRecord]) -> Result<(), LogError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| LogError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let body =
            serde_json::to_string_pretty(records).map_err(|e| LogError::Serialize { source: e })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| LogError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| LogError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "log_test.rs"]
mod tests;
