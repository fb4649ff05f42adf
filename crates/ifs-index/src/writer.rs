//! Index writer for adding documents to the Tantivy index.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tantivy::{
    DateTime, Index, IndexSettings, IndexWriter as TantivyIndexWriter, Opstamp, TantivyDocument,
    directory::MmapDirectory, tokenizer::Language,
};
use tracing::debug;

use crate::{
    analyzer::register_analyzers, document::ArchiveDocument, error::IndexError,
    schema::IndexSchema,
};

/// Default heap size for the index writer (50 MB).
const DEFAULT_HEAP_SIZE: usize = 50_000_000;

/// File Tantivy writes at the top of every index directory.
pub(crate) const META_FILE: &str = "meta.json";

/// Writes documents to a Tantivy index.
///
/// A writer is obtained either by creating a fresh index, which clears the
/// directory and establishes the schema, or by opening an existing one whose
/// field set must match.
pub struct IndexWriter {
    /// The Tantivy index.
    index: Index,
    /// The underlying Tantivy writer.
    writer: TantivyIndexWriter,
    /// Schema with field handles.
    schema: IndexSchema,
}

impl IndexWriter {
    /// Creates an empty index at `path`, replacing any index already there.
    ///
    /// A non-empty directory that does not look like an index is left alone
    /// and reported as [`IndexError::NotAnIndex`].
    pub fn create(path: &Path, language: Language) -> Result<Self, IndexError> {
        if path.exists() {
            let has_entries = fs::read_dir(path)?.next().is_some();
            if has_entries && !path.join(META_FILE).exists() {
                return Err(IndexError::NotAnIndex {
                    path: path.to_path_buf(),
                });
            }
            fs::remove_dir_all(path)?;
        }
        fs::create_dir_all(path)?;

        let schema = IndexSchema::new();
        let dir = open_directory(path)?;
        let index = Index::create(dir, schema.schema().clone(), IndexSettings::default())
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        debug!(path = %path.display(), "created index");
        Self::with_index(index, schema, path, language)
    }

    /// Opens the existing index at `path`.
    ///
    /// Fails with [`IndexError::IndexNotFound`] if no index was created there,
    /// and with [`IndexError::SchemaMismatch`] if its fields differ from the
    /// current schema.
    pub fn open(path: &Path, language: Language) -> Result<Self, IndexError> {
        if !path.join(META_FILE).exists() {
            return Err(IndexError::IndexNotFound {
                path: path.to_path_buf(),
            });
        }

        let schema = IndexSchema::new();
        let dir = open_directory(path)?;
        let index = Index::open(dir).map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
        check_schema(&schema, &index, path)?;

        Self::with_index(index, schema, path, language)
    }

    /// Registers analyzers and starts a Tantivy writer.
    fn with_index(
        index: Index,
        schema: IndexSchema,
        path: &Path,
        language: Language,
    ) -> Result<Self, IndexError> {
        register_analyzers(&index, language);
        let writer = index
            .writer(DEFAULT_HEAP_SIZE)
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        Ok(Self {
            index,
            writer,
            schema,
        })
    }

    /// Adds an archive document to the index.
    ///
    /// The document is staged for writing but not committed until [`commit`] is called.
    ///
    /// [`commit`]: Self::commit
    pub fn add_document(&mut self, doc: &ArchiveDocument) -> Result<(), IndexError> {
        let mut tantivy_doc = TantivyDocument::new();

        tantivy_doc.add_text(self.schema.kind, doc.kind.as_str());
        tantivy_doc.add_text(self.schema.path, &doc.path);
        tantivy_doc.add_text(self.schema.name, &doc.name);

        if let Some(description) = &doc.description {
            tantivy_doc.add_text(self.schema.description, description);
            tantivy_doc.add_text(self.schema.spelling, description);
        }
        if let Some(short) = &doc.short_description {
            tantivy_doc.add_text(self.schema.shortdesc, short);
        }

        // One raw term per segment, so `dir:zcode` matches anything under it
        if let Some(dir) = &doc.dir {
            for segment in dir.split(',') {
                tantivy_doc.add_text(self.schema.dir, segment);
            }
        }
        if let Some(tuid) = &doc.tuid {
            for id in tuid.split_whitespace() {
                tantivy_doc.add_text(self.schema.tuid, id);
            }
        }

        if let Some(date) = doc.date {
            tantivy_doc.add_date(
                self.schema.date,
                DateTime::from_timestamp_secs(date.timestamp()),
            );
        }
        if let Some(size) = doc.size {
            tantivy_doc.add_u64(self.schema.size, size);
        }

        self.writer
            .add_document(tantivy_doc)
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Adds multiple archive documents to the index.
    pub fn add_documents(&mut self, docs: &[ArchiveDocument]) -> Result<(), IndexError> {
        for doc in docs {
            self.add_document(doc)?;
        }
        Ok(())
    }

    /// Commits all pending changes to the index.
    ///
    /// This makes all added and deleted documents visible to readers. Returns
    /// the opstamp of the commit, which readers use to detect a rebuild.
    pub fn commit(&mut self) -> Result<Opstamp, IndexError> {
        self.writer.commit().map_err(|e| IndexError::commit(&e))
    }

    /// Rolls back any uncommitted changes.
    pub fn rollback(&mut self) -> Result<(), IndexError> {
        self.writer.rollback().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Deletes all documents from the index.
    pub fn delete_all(&mut self) -> Result<(), IndexError> {
        self.writer
            .delete_all_documents()
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Returns the number of documents in the index.
    ///
    /// Note: This requires creating a reader and may not reflect uncommitted changes.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        let reader = self
            .index
            .reader()
            .map_err(|e| IndexError::Write(e.to_string()))?;
        Ok(reader.searcher().num_docs())
    }
}

/// Opens an mmap-backed Tantivy directory.
pub(crate) fn open_directory(path: &Path) -> Result<MmapDirectory, IndexError> {
    MmapDirectory::open(path).map_err(|e| {
        let err: tantivy::TantivyError = e.into();
        IndexError::open_index(path.to_path_buf(), &err)
    })
}

/// Fails with `SchemaMismatch` unless the index has the expected fields.
pub(crate) fn check_schema(
    expected: &IndexSchema,
    index: &Index,
    path: &Path,
) -> Result<(), IndexError> {
    let found = index.schema();
    if expected.matches(&found) {
        return Ok(());
    }

    let mut names: Vec<&str> = found.fields().map(|(_, entry)| entry.name()).collect();
    names.sort_unstable();
    Err(IndexError::SchemaMismatch {
        path: PathBuf::from(path),
        found: names.join(", "),
    })
}
