//! Error types for master index parsing and graph resolution.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur while ingesting the master index.
///
/// Every variant is fatal for the ingestion that produced it: no partial
/// graph is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Failed to read the master index file.
    #[error("failed to read master index {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The input is not well-formed XML.
    #[error("malformed master index at byte {position}: {source}")]
    Xml {
        /// Byte offset of the reader when the error was detected.
        position: u64,
        /// Underlying XML error.
        source: quick_xml::Error,
    },

    /// The input ended while an element was still open.
    #[error("master index ended inside <{element}>")]
    UnexpectedEof {
        /// Name of the innermost open element.
        element: String,
    },

    /// The event stream ended while an entry was still being built.
    #[error("input ended inside a {entry} entry")]
    UnterminatedEntry {
        /// Kind of entry that was left open.
        entry: &'static str,
    },

    /// A numeric field held a value that is not an integer.
    #[error("invalid number in <{field}>: {value:?}")]
    InvalidNumber {
        /// Element that held the value.
        field: &'static str,
        /// The offending text.
        value: String,
    },

    /// An element was missing an attribute it cannot be interpreted without.
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },

    /// An entry closed without its identifying field.
    #[error("{entry} entry is missing <{field}>")]
    MissingField {
        /// Kind of entry.
        entry: &'static str,
        /// Missing element name.
        field: &'static str,
    },

    /// Two directory entries share a name.
    #[error("duplicate directory entry: {name}")]
    DuplicateDirectory {
        /// The repeated directory name.
        name: String,
    },

    /// Two file entries share a path.
    #[error("duplicate file entry: {path}")]
    DuplicateFile {
        /// The repeated file path.
        path: String,
    },

    /// A directory names a parent that does not exist.
    #[error("directory {directory} references unknown parent {parent}")]
    DanglingParent {
        /// The directory holding the reference.
        directory: String,
        /// The unresolved parent name.
        parent: String,
    },

    /// A file names a directory that does not exist.
    #[error("file {path} references unknown directory {directory}")]
    DanglingDirectory {
        /// The file holding the reference.
        path: String,
        /// The unresolved directory name.
        directory: String,
    },

    /// The designated root directory is absent.
    #[error("root directory {name} not found in master index")]
    MissingRoot {
        /// Expected root name.
        name: String,
    },
}

impl ArchiveError {
    /// Creates an `Xml` error from a reader position and quick-xml error.
    pub(crate) fn xml(position: u64, source: impl Into<quick_xml::Error>) -> Self {
        Self::Xml {
            position,
            source: source.into(),
        }
    }
}
