//! Query serving for the ifsearch index.
//!
//! [`SearchIndex`] opens a built index for reading. Queries run against a
//! [`SearchHandle`], which pins one searcher generation and refreshes itself
//! when the index is rebuilt; a [`HandlePool`] keeps handles for reuse.
//! [`QueryExecutor`] turns query text into a [`QueryOutcome`]:
//!
//! 1. **Parse**: Tantivy's `QueryParser` over `description`, all terms required.
//!    A parse error ends the query as [`QueryOutcome::ParseFailed`].
//! 2. **Collect**: count every match and keep one page of top documents,
//!    wrapped in a [`DeadlineCollector`]. Running past the time budget ends
//!    the query as [`QueryOutcome::TimedOut`] with no partial page.
//! 3. **Suggest**: correct misspelled words against the unstemmed vocabulary
//!    and offer the result only if it parses to a different query.

mod deadline;
mod execute;
mod handle;
mod page;
mod spelling;
mod types;

use std::path::Path;

pub use deadline::{DeadlineCollector, DeadlineSegmentCollector};
pub use execute::QueryExecutor;
pub use handle::{HandlePool, PooledHandle, SearchHandle};
pub use page::PageWindow;
pub use spelling::{MAX_FUZZY_DISTANCE, SpellingCorrector};
use tantivy::{Index, IndexReader, Opstamp, ReloadPolicy, tokenizer::Language};
pub use types::{QueryOutcome, ResultPage, SearchHit};

use crate::{
    IndexError,
    analyzer::{parse_language, register_analyzers},
    schema::IndexSchema,
    writer::{META_FILE, check_schema, open_directory},
};

/// A built index opened for searching.
///
/// Cloning is cheap; clones share the underlying index and reader.
#[derive(Clone)]
pub struct SearchIndex {
    /// The Tantivy index.
    index: Index,
    /// Reader reloaded only on request.
    reader: IndexReader,
    /// Schema with field handles.
    schema: IndexSchema,
}

impl SearchIndex {
    /// Opens the index at `path`.
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
        register_analyzers(&index, language);

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        Ok(Self {
            index,
            reader,
            schema,
        })
    }

    /// Opens the configured index with the configured stemmer.
    pub fn open_with_config(config: &ifs_config::Config) -> Result<Self, IndexError> {
        let language = parse_language(&config.search.stemmer)?;
        Self::open(&config.archive.index_dir, language)
    }

    /// Takes a handle on the latest commit.
    pub fn handle(&self) -> Result<SearchHandle, IndexError> {
        SearchHandle::new(self.clone())
    }

    /// Opstamp of the latest commit on disk.
    pub fn opstamp(&self) -> Result<Opstamp, IndexError> {
        let metas = self.index.load_metas().map_err(|e| IndexError::search(&e))?;
        Ok(metas.opstamp)
    }

    /// Number of documents visible to a fresh handle.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        Ok(self.handle()?.searcher().num_docs())
    }

    /// The underlying Tantivy index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Schema with field handles.
    pub fn schema(&self) -> &IndexSchema {
        &self.schema
    }

    /// Points the shared reader at the latest commit.
    fn reload(&self) -> Result<(), IndexError> {
        self.reader.reload().map_err(|e| IndexError::search(&e))
    }
}
