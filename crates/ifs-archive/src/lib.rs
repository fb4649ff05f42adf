//! Master index parsing and archive graph for ifsearch.
//!
//! This crate turns the archive's XML master index into an in-memory graph of
//! directories and files. It handles:
//! - Streaming, context-sensitive parsing of the structural event stream
//! - Resolving parent/directory references into an arena of records
//! - Aggregating local and inherited descriptions
//! - Merging multi-valued metadata keys into searchable fields
//!
//! # Example
//!
//! ```no_run
//! use ifs_archive::{ArchiveGraph, aggregate_description, parse_file};
//!
//! let parsed = parse_file("Master-Index.xml".as_ref()).unwrap();
//! let graph = ArchiveGraph::resolve(parsed, "if-archive").unwrap();
//!
//! for (_, dir) in graph.directories() {
//!     if let Some(desc) = aggregate_description(dir, true) {
//!         println!("{}: {desc}", dir.name);
//!     }
//! }
//! ```

#![warn(missing_docs)]

mod describe;
mod error;
mod graph;
mod metadata;
mod parse;
mod record;

pub use describe::{
    SHORT_DESCRIPTION_LIMIT, aggregate_description, short_description, strip_markdown_links,
};
pub use error::ArchiveError;
pub use graph::{ArchiveGraph, DirId, FileId};
pub use metadata::{merge_list_field, merge_list_fields};
pub use parse::{Event, ParseState, ParsedArchive, parse_file, parse_reader, parse_str};
pub use record::{
    Described, DirectoryRecord, FileRecord, Metadata, ParentDescriptions, SymlinkKind,
};
