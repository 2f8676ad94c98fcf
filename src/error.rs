use std::path::PathBuf;
use thiserror::Error;

/// Process creation failed.
///
/// Fatal to the requested operation only; the session controller degrades
/// it to a logged no-op and leaves its state untouched.
#[derive(Debug, Error)]
#[error("failed to spawn {program}: {source}")]
pub struct SpawnError {
    pub program: String,
    #[source]
    pub source: std::io::Error,
}

/// Filesystem-side failures: session root creation, directory listing,
/// mount-table reads. Deletion is deliberately best-effort and never
/// surfaces one of these.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create session root {path}: {source}")]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list recordings in {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read mount table {path}: {source}")]
    MountTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
