//! Full index build pipeline.
//!
//! The [`IndexBuilder`] runs the one-way ingestion flow:
//! 1. Parse the master index into records
//! 2. Resolve them into an [`ArchiveGraph`]
//! 3. Produce [`ArchiveDocument`]s
//! 4. Replace the index contents in a single commit
//!
//! Nothing touches the index until the first three steps have succeeded, so a
//! broken master index leaves the previous index intact.

use std::{
    path::Path,
    time::{Duration, Instant},
};

use ifs_archive::{ArchiveGraph, parse_file};
use ifs_config::Config;
use tracing::{debug, info};

use crate::{
    ArchiveDocument, DocumentKind, IndexError, IndexWriter, analyzer::parse_language,
    document::produce_documents,
};

/// How the index directory is prepared before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Clear the directory and establish the schema.
    Create,
    /// Replace the documents of an existing index.
    #[default]
    Rebuild,
}

/// Statistics from a build.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Directories indexed (the root is never indexed).
    pub directories: usize,
    /// Files indexed.
    pub files: usize,
    /// Symlinked files left out.
    pub symlinks_skipped: usize,
    /// Total documents written.
    pub documents: usize,
    /// Wall-clock time for the whole build.
    pub elapsed: Duration,
}

/// Callback for reporting build progress.
pub trait ProgressReporter {
    /// Called once the master index has been parsed and resolved.
    fn on_parsed(&mut self, directories: usize, files: usize);

    /// Called before each document is written.
    fn on_document(&mut self, path: &str, current: usize, total: usize);

    /// Called when the build has been committed.
    fn on_complete(&mut self, stats: &BuildStats);
}

/// A no-op progress reporter for silent builds.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn on_parsed(&mut self, _directories: usize, _files: usize) {}
    fn on_document(&mut self, _path: &str, _current: usize, _total: usize) {}
    fn on_complete(&mut self, _stats: &BuildStats) {}
}

/// Builds the search index from the configured master index.
pub struct IndexBuilder<'a> {
    /// The loaded configuration.
    config: &'a Config,
}

impl<'a> IndexBuilder<'a> {
    /// Creates a builder for the given configuration.
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Path of the index directory this builder writes to.
    pub fn index_dir(&self) -> &Path {
        &self.config.archive.index_dir
    }

    /// Parses the master index and produces every document, without writing.
    pub fn produce(&self) -> Result<(ArchiveGraph, Vec<ArchiveDocument>), IndexError> {
        let source = &self.config.archive.master_index;
        if !source.is_file() {
            return Err(IndexError::MissingSource {
                path: source.clone(),
            });
        }

        let parsed = parse_file(source)?;
        let graph = ArchiveGraph::resolve(parsed, &self.config.archive.root)?;
        let documents = produce_documents(&graph, &self.config.index.tuid_keys);
        debug!(documents = documents.len(), "produced documents");
        Ok((graph, documents))
    }

    /// Runs the full build.
    ///
    /// All existing documents are deleted and the new ones added in one
    /// commit. If writing fails, the uncommitted changes are rolled back.
    pub fn build<R: ProgressReporter>(
        &self,
        mode: BuildMode,
        reporter: &mut R,
    ) -> Result<BuildStats, IndexError> {
        let started = Instant::now();

        let (graph, documents) = self.produce()?;
        reporter.on_parsed(graph.directory_count(), graph.file_count());

        let language = parse_language(&self.config.search.stemmer)?;
        let index_dir = self.index_dir();
        let mut writer = match mode {
            BuildMode::Create => IndexWriter::create(index_dir, language)?,
            BuildMode::Rebuild => IndexWriter::open(index_dir, language)?,
        };

        if let Err(e) = write_all(&mut writer, &documents, reporter) {
            writer.rollback()?;
            return Err(e);
        }
        let opstamp = writer.commit()?;

        let directories = documents
            .iter()
            .filter(|d| d.kind == DocumentKind::Directory)
            .count();
        let symlinks_skipped = graph.files().filter(|(_, f)| f.is_symlink()).count();
        let stats = BuildStats {
            directories,
            files: documents.len() - directories,
            symlinks_skipped,
            documents: documents.len(),
            elapsed: started.elapsed(),
        };

        info!(
            documents = stats.documents,
            directories = stats.directories,
            files = stats.files,
            opstamp,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "index built"
        );
        reporter.on_complete(&stats);
        Ok(stats)
    }
}

/// Clears the index and stages every document.
fn write_all<R: ProgressReporter>(
    writer: &mut IndexWriter,
    documents: &[ArchiveDocument],
    reporter: &mut R,
) -> Result<(), IndexError> {
    writer.delete_all()?;
    let total = documents.len();
    for (idx, doc) in documents.iter().enumerate() {
        reporter.on_document(&doc.path, idx + 1, total);
        writer.add_document(doc)?;
    }
    Ok(())
}
