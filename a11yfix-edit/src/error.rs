//! Error types for a11yfix-edit.
//!
//! A [`FileError`] is scoped to one file: the run reports it and moves on.
//! Anything that stops a run before traversal is an `anyhow::Error`.

use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use thiserror::Error;

/// Read, decode or write failure for a single file.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be read or was not valid UTF-8.
    #[error("read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// The fixed content could not be written back.
    #[error("write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// The walk found a matching entry that cannot be opened, for example
    /// because its path is not valid UTF-8. `path` is a lossy rendering.
    #[error("skip {path}: {reason}")]
    Skipped { path: Utf8PathBuf, reason: String },
}

impl FileError {
    pub fn path(&self) -> &Utf8Path {
        match self {
            FileError::Read { path, .. }
            | FileError::Write { path, .. }
            | FileError::Skipped { path, .. } => path,
        }
    }

    /// The underlying error message, without the path prefix.
    pub fn cause(&self) -> String {
        match self {
            FileError::Read { source, .. } | FileError::Write { source, .. } => source.to_string(),
            FileError::Skipped { reason, .. } => reason.clone(),
        }
    }
}
