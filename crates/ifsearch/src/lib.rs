//! ifsearch: search for the Interactive Fiction Archive
//!
//! The archive publishes a master index describing every directory and file it
//! holds. ifsearch parses that index, builds a full-text search index over the
//! descriptions and metadata, and answers keyword and field queries with
//! paginated, spelling-corrected results.

#![warn(missing_docs)]

pub mod cli;
