//! Tantivy-based search index for ifsearch.
//!
//! This crate turns a resolved archive into a searchable index and serves
//! queries against it. It handles:
//! - Document production from the archive graph, with short-description
//!   fallback to the owning directory
//! - Text analysis with configurable stemming, plus an unstemmed vocabulary
//!   for spelling correction
//! - All-or-nothing index builds in a single commit
//! - Paginated, time-bounded queries with spelling suggestions
//! - Searcher handles that refresh when the index is rebuilt
//!
//! # Example
//!
//! ```no_run
//! use ifs_config::Config;
//! use ifs_index::{BuildMode, IndexBuilder, QueryExecutor, QueryOutcome, SearchIndex, SilentReporter};
//!
//! let config = Config::load(".".as_ref()).unwrap();
//! IndexBuilder::new(&config)
//!     .build(BuildMode::Create, &mut SilentReporter)
//!     .unwrap();
//!
//! let index = SearchIndex::open_with_config(&config).unwrap();
//! let executor = QueryExecutor::with_config(&index, &config);
//! let handle = index.handle().unwrap();
//! if let QueryOutcome::Completed(page) = executor.execute(&handle, "cave", 1, 0).unwrap() {
//!     for hit in page.hits {
//!         println!("{} ({})", hit.path, hit.kind);
//!     }
//! }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod builder;
mod document;
mod error;
mod schema;
mod search;
mod writer;

pub use analyzer::{
    TEXT_TOKENIZER, WORDS_TOKENIZER, build_text_analyzer, build_words_analyzer, parse_language,
    register_analyzers,
};
pub use builder::{BuildMode, BuildStats, IndexBuilder, ProgressReporter, SilentReporter};
pub use document::{ArchiveDocument, DocumentKind, produce_documents};
pub use error::IndexError;
pub use schema::{FIELD_NAMES, IndexSchema};
pub use search::{
    DeadlineCollector, DeadlineSegmentCollector, HandlePool, MAX_FUZZY_DISTANCE, PageWindow,
    PooledHandle, QueryExecutor, QueryOutcome, ResultPage, SearchHandle, SearchHit, SearchIndex,
    SpellingCorrector,
};
pub use tantivy::tokenizer::Language;
pub use writer::IndexWriter;
