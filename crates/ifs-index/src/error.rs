//! Error types for the ifs-index crate.

use std::{io, path::PathBuf};

use ifs_archive::ArchiveError;
use thiserror::Error;

/// Errors that can occur when building or searching the index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Failed to open or create the index.
    #[error("failed to open index at {path}: {message}")]
    OpenIndex {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// No index has been built at the path yet.
    #[error("no search index at {path} (run `ifsearch build --create`)")]
    IndexNotFound {
        /// Path to the index directory.
        path: PathBuf,
    },

    /// The index on disk was built with a different field set.
    #[error(
        "index at {path} has a different schema (found fields: {found}); rebuild it with `ifsearch build --create`"
    )]
    SchemaMismatch {
        /// Path to the index directory.
        path: PathBuf,
        /// Field names found on disk.
        found: String,
    },

    /// Refused to clear a directory that does not hold an index.
    #[error("refusing to clear {path}: it is not empty and does not contain an index")]
    NotAnIndex {
        /// Path to the directory.
        path: PathBuf,
    },

    /// The master index file does not exist.
    #[error("master index not found: {path}")]
    MissingSource {
        /// Configured master index path.
        path: PathBuf,
    },

    /// Parsing or resolving the master index failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Failed to write to the index.
    #[error("failed to write to index: {0}")]
    Write(String),

    /// Failed to commit changes to the index.
    #[error("failed to commit index: {0}")]
    Commit(String),

    /// Failed to read from the index.
    #[error("failed to search index: {0}")]
    Search(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid stemmer language.
    #[error("unsupported stemmer language: {0}")]
    InvalidLanguage(String),
}

impl IndexError {
    /// Creates an `OpenIndex` error from a path and Tantivy error.
    pub(crate) fn open_index(path: PathBuf, source: &tantivy::TantivyError) -> Self {
        Self::OpenIndex {
            path,
            message: source.to_string(),
        }
    }

    /// Creates a `Write` error from a Tantivy error.
    pub(crate) fn write(source: &tantivy::TantivyError) -> Self {
        Self::Write(source.to_string())
    }

    /// Creates a `Commit` error from a Tantivy error.
    pub(crate) fn commit(source: &tantivy::TantivyError) -> Self {
        Self::Commit(source.to_string())
    }

    /// Creates a `Search` error from a Tantivy error.
    pub(crate) fn search(source: &tantivy::TantivyError) -> Self {
        Self::Search(source.to_string())
    }
}
