//! Error types for map import and export.

use std::fmt;
use std::path::{Path, PathBuf};

use lodmap_soa::FormatError;
use thiserror::Error;

/// Step of a file operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the file from the store.
    Read,
    /// Decoding the file contents.
    Parse,
    /// Building documents from records.
    Build,
    /// Writing a document to the store.
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Read => "read",
            Stage::Parse => "parse",
            Stage::Build => "build",
            Stage::Write => "write",
        })
    }
}

/// Failure importing one map or light list.
#[derive(Error, Debug)]
#[error("{stage} failed for {}: {source}", .path.display())]
pub struct ImportError {
    /// File being imported.
    pub path: PathBuf,
    /// Where the import stopped.
    pub stage: Stage,
    /// Underlying format error.
    #[source]
    pub source: FormatError,
}

impl ImportError {
    pub(crate) fn new(path: &Path, stage: Stage, source: impl Into<FormatError>) -> Self {
        Self {
            path: path.to_path_buf(),
            stage,
            source: source.into(),
        }
    }
}

/// Failure exporting a map pair.
#[derive(Error, Debug)]
#[error("{stage} failed for {}: {source}", .path.display())]
pub struct ExportError {
    /// Output file (or directory, before any file name is known).
    pub path: PathBuf,
    /// Where the export stopped.
    pub stage: Stage,
    /// Underlying format error.
    #[source]
    pub source: FormatError,
}

impl ExportError {
    pub(crate) fn new(path: &Path, stage: Stage, source: impl Into<FormatError>) -> Self {
        Self {
            path: path.to_path_buf(),
            stage,
            source: source.into(),
        }
    }
}
