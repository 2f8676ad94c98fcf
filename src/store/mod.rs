//! On-disk recording inventory
//!
//! The session directory is the single source of truth: indices are
//! recomputed from directory contents on every listing and never persisted,
//! so the inventory self-heals after files are added or removed behind the
//! kiosk's back.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::StorageError;

/// One file in the session inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    /// 1-based position in the current listing. Recomputed per rescan.
    pub index: usize,
    pub file_name: String,
    pub path: PathBuf,
}

/// Owns the date-stamped session directory on the target volume and the
/// recordings inside it.
#[derive(Debug, Clone)]
pub struct RecordingStore {
    root: PathBuf,
    extension: String,
}

impl RecordingStore {
    /// Store rooted at `<volume_root>/<prefix><ISO date>`.
    pub fn new(
        volume_root: &Path,
        prefix: &str,
        date: NaiveDate,
        extension: impl Into<String>,
    ) -> Self {
        let root = volume_root.join(format!("{}{}", prefix, date.format("%Y-%m-%d")));
        Self::at_root(root, extension)
    }

    /// Store over an explicit directory, bypassing the date stamping.
    pub fn at_root(root: PathBuf, extension: impl Into<String>) -> Self {
        Self {
            root,
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the session root (and parents) if absent. Idempotent.
    pub fn ensure_root_exists(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|source| StorageError::CreateRoot {
            path: self.root.clone(),
            source,
        })
    }

    /// Snapshot of the inventory: files carrying the recognized extension,
    /// in lexical filename order (equal to numeric order under the
    /// zero-padded naming), with contiguous 1-based indices.
    pub fn list(&self) -> Result<Vec<Recording>, StorageError> {
        let entries = fs::read_dir(&self.root).map_err(|source| StorageError::ListDir {
            path: self.root.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| {
                Path::new(name)
                    .extension()
                    .is_some_and(|ext| ext == self.extension.as_str())
            })
            .collect();
        names.sort();

        Ok(names
            .into_iter()
            .enumerate()
            .map(|(i, file_name)| Recording {
                index: i + 1,
                path: self.root.join(&file_name),
                file_name,
            })
            .collect())
    }

    /// Path for the next recording, given the current recording count: the
    /// n-th recording becomes `<root>/NNNN.<ext>` with the 1-based index
    /// zero-padded to four digits. If the formatted path is already taken
    /// the index advances until free, so an existing file is never
    /// overwritten by the encoder.
    pub fn next_recording_path(&self, count: usize) -> PathBuf {
        let mut index = count + 1;
        loop {
            let candidate = self
                .root
                .join(format!("{:04}.{}", index, self.extension));
            if !candidate.exists() {
                return candidate;
            }
            warn!(
                "{} already exists, skipping index {}",
                candidate.display(),
                index
            );
            index += 1;
        }
    }

    /// Best-effort unlink. A failed deletion is logged, never raised; the
    /// next rescan reflects whatever actually happened on disk.
    pub fn delete(&self, recording: &Recording) {
        match fs::remove_file(&recording.path) {
            Ok(()) => info!("Deleted {}", recording.path.display()),
            Err(e) => warn!("Failed to delete {}: {}", recording.path.display(), e),
        }
    }

    /// Remove the highest-indexed recording, if any.
    pub fn delete_last(&self) {
        let recordings = match self.list() {
            Ok(recordings) => recordings,
            Err(e) => {
                warn!("Cannot list recordings for deletion: {}", e);
                return;
            }
        };
        if let Some(last) = recordings.last() {
            self.delete(last);
        }
    }
}
