//! Query execution: parse, collect one page under a deadline, suggest.

use std::time::{Duration, Instant};

use chrono::DateTime;
use tantivy::{
    DocAddress, Score, Searcher, TantivyDocument,
    collector::{Count, TopDocs},
    query::QueryParser,
    schema::{Field, Value},
};
use tracing::{debug, warn};

use super::{
    SearchHandle, SearchIndex,
    deadline::DeadlineCollector,
    page::PageWindow,
    spelling::SpellingCorrector,
    types::{QueryOutcome, ResultPage, SearchHit},
};
use crate::{DocumentKind, IndexError, schema::IndexSchema};

/// Runs user queries against a [`SearchIndex`].
pub struct QueryExecutor {
    /// Parser with `description` as the default field.
    parser: QueryParser,
    /// Field handles for reading stored values.
    schema: IndexSchema,
    /// Spelling suggestions.
    corrector: SpellingCorrector,
    /// Time budget per query.
    timeout: Duration,
    /// Page length used when the caller passes zero.
    default_page_length: usize,
}

impl QueryExecutor {
    /// Creates an executor for `index`.
    pub fn new(
        index: &SearchIndex,
        timeout: Duration,
        default_page_length: usize,
        fuzzy_distance: u8,
    ) -> Self {
        let schema = index.schema().clone();
        let mut parser = QueryParser::for_index(index.index(), vec![schema.description]);
        parser.set_conjunction_by_default();

        Self {
            parser,
            corrector: SpellingCorrector::new(schema.spelling, fuzzy_distance),
            schema,
            timeout,
            default_page_length,
        }
    }

    /// Creates an executor using the `[search]` settings.
    pub fn with_config(index: &SearchIndex, config: &ifs_config::Config) -> Self {
        Self::new(
            index,
            config.search.timeout(),
            config.search.page_length,
            config.search.fuzzy_distance,
        )
    }

    /// Runs `text` and returns the requested page.
    ///
    /// `page` is one-based; values below 1 mean the first page. A zero
    /// `page_length` means the default. Errors are reserved for index I/O
    /// failures; bad query text and timeouts are outcomes.
    pub fn execute(
        &self,
        handle: &SearchHandle,
        text: &str,
        page: usize,
        page_length: usize,
    ) -> Result<QueryOutcome, IndexError> {
        let started = Instant::now();
        let window = PageWindow::new(page, page_length, self.default_page_length);

        let query = match self.parser.parse_query(text) {
            Ok(query) => query,
            Err(e) => {
                debug!(query = text, error = %e, "query parse failed");
                return Ok(QueryOutcome::ParseFailed {
                    message: e.to_string(),
                });
            }
        };

        let searcher = handle.searcher();
        let deadline = started + self.timeout;
        let (expired, result) = match collect_bounds(&window, searcher.num_docs()) {
            Some((limit, offset)) => {
                let top_docs = TopDocs::with_limit(limit).and_offset(offset);
                let collector = DeadlineCollector::new((Count, top_docs), deadline);
                let result = searcher.search(&*query, &collector);
                (collector.has_expired(), result)
            }
            // Past the last document: only the total is needed.
            None => {
                let collector = DeadlineCollector::new(Count, deadline);
                let result = searcher
                    .search(&*query, &collector)
                    .map(|total| (total, Vec::new()));
                (collector.has_expired(), result)
            }
        };

        if expired {
            warn!(query = text, timeout_ms = self.timeout.as_millis() as u64, "search timed out");
            return Ok(QueryOutcome::TimedOut);
        }
        let (total, top) = result.map_err(|e| IndexError::search(&e))?;

        let hits = top
            .into_iter()
            .map(|(score, address)| self.read_hit(searcher, score, address))
            .collect::<Result<Vec<_>, _>>()?;

        let suggestion = self.suggest(searcher, text, &format!("{query:?}"))?;
        let elapsed = started.elapsed();
        debug!(
            query = text,
            total,
            page = window.page,
            elapsed_ms = elapsed.as_millis() as u64,
            "search complete"
        );

        Ok(QueryOutcome::Completed(ResultPage {
            query: text.to_string(),
            window,
            total,
            hits,
            suggestion,
            elapsed,
        }))
    }

    /// Corrected query text, if it differs in both text and meaning.
    fn suggest(
        &self,
        searcher: &Searcher,
        text: &str,
        parsed: &str,
    ) -> Result<Option<String>, IndexError> {
        let corrected = self.corrector.correct(searcher, text)?;
        if corrected == text {
            return Ok(None);
        }
        let differs = self
            .parser
            .parse_query(&corrected)
            .map(|query| format!("{query:?}") != parsed)
            .unwrap_or(false);
        Ok(differs.then_some(corrected))
    }

    /// Loads the stored fields of one hit.
    fn read_hit(
        &self,
        searcher: &Searcher,
        score: Score,
        address: DocAddress,
    ) -> Result<SearchHit, IndexError> {
        let doc: TantivyDocument = searcher
            .doc(address)
            .map_err(|e| IndexError::search(&e))?;

        let text = |field: Field| {
            doc.get_first(field)
                .and_then(|value| value.as_str())
                .map(str::to_string)
        };

        let kind = text(self.schema.kind)
            .unwrap_or_default()
            .parse::<DocumentKind>()
            .map_err(IndexError::Search)?;
        let date = doc
            .get_first(self.schema.date)
            .and_then(|value| value.as_datetime())
            .and_then(|date| DateTime::from_timestamp(date.into_timestamp_secs(), 0));

        Ok(SearchHit {
            kind,
            path: text(self.schema.path).unwrap_or_default(),
            short_description: text(self.schema.shortdesc),
            date,
            score,
        })
    }
}

/// Limit and offset for collecting `window`, bounded by `num_docs`.
///
/// Returns `None` when the window starts past the last document. The
/// returned `limit + offset` never exceeds `num_docs`.
fn collect_bounds(window: &PageWindow, num_docs: u64) -> Option<(usize, usize)> {
    let num_docs = usize::try_from(num_docs).unwrap_or(usize::MAX);
    let offset = window.offset();
    if offset >= num_docs {
        return None;
    }
    Some((window.page_length.min(num_docs - offset), offset))
}
