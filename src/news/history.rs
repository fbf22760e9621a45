//! Sent-URL history persisted as a flat JSON array.
//!
//! The set only ever grows. A missing file is a first run; a malformed
//! file is logged and treated as empty, which means its articles may be
//! sent once more. A file that exists but cannot be read is an error, since
//! overwriting it would drop every URL it holds.

use std::collections::{BTreeSet, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::DigestError;

pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted set, surfacing malformed state and I/O errors.
    /// A missing file is an empty set, not an error.
    pub fn try_load(&self) -> Result<HashSet<String>, DigestError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No history file yet");
                return Ok(HashSet::new());
            }
            Err(source) => {
                return Err(DigestError::Persistence {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let urls: Vec<String> =
            serde_json::from_str(&contents).map_err(|source| DigestError::MalformedState {
                path: self.path.clone(),
                source,
            })?;

        Ok(urls.into_iter().collect())
    }

    /// Read the persisted set, recovering a malformed file as empty.
    /// I/O failures other than a missing file are returned.
    pub fn load(&self) -> Result<HashSet<String>, DigestError> {
        match self.try_load() {
            Err(e @ DigestError::MalformedState { .. }) => {
                warn!(error = %e, "Starting from empty sent-article history");
                Ok(HashSet::new())
            }
            other => other,
        }
    }

    /// Overwrite the persisted set. Written to a sibling temp file and
    /// renamed into place so a crash never leaves a half-written array.
    pub fn save(&self, urls: &HashSet<String>) -> Result<(), DigestError> {
        let persistence = |source| DigestError::Persistence {
            path: self.path.clone(),
            source,
        };

        // Sorted so the file diffs cleanly between runs
        let ordered: BTreeSet<&String> = urls.iter().collect();
        let json = serde_json::to_string_pretty(&ordered)
            .map_err(|e| persistence(std::io::Error::new(ErrorKind::InvalidData, e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(persistence)?;
        }

        let tmp = self.tmp_path();
        std::fs::write(&tmp, json).map_err(persistence)?;
        std::fs::rename(&tmp, &self.path).map_err(persistence)?;

        debug!(path = %self.path.display(), urls = urls.len(), "History saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
