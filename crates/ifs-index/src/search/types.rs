//! Data structures returned by query execution.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::page::PageWindow;
use crate::DocumentKind;

/// A single matching record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Record kind.
    pub kind: DocumentKind,
    /// Path relative to the archive root.
    pub path: String,
    /// Listing text, if the record has one.
    pub short_description: Option<String>,
    /// Modification date, files only.
    pub date: Option<DateTime<Utc>>,
    /// BM25 relevance score.
    pub score: f32,
}

/// One page of results for a query.
#[derive(Debug, Clone, Serialize)]
pub struct ResultPage {
    /// The query text as given.
    pub query: String,
    /// The page that was requested.
    pub window: PageWindow,
    /// Total number of matching records.
    pub total: usize,
    /// Hits on this page, best first.
    pub hits: Vec<SearchHit>,
    /// Corrected query text, when it would search for something different.
    pub suggestion: Option<String>,
    /// Wall-clock time spent parsing and executing.
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl ResultPage {
    /// Number of pages needed for all matches.
    pub fn page_count(&self) -> usize {
        self.window.page_count(self.total)
    }

    /// One-based position of the first hit on this page.
    pub fn show_min(&self) -> usize {
        self.window.show_min()
    }

    /// One-based position of the last hit on this page.
    pub fn show_max(&self) -> usize {
        self.window.show_max(self.total)
    }

    /// Returns true if the matches span more than one page.
    pub fn is_paginated(&self) -> bool {
        self.total > self.window.page_length
    }
}

/// How a query ended.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The query ran to completion.
    Completed(ResultPage),
    /// The query ran past its time budget. No partial results are returned.
    TimedOut,
    /// The query text could not be parsed.
    ParseFailed {
        /// Parser message.
        message: String,
    },
}

/// Writes a duration as fractional seconds.
fn serialize_secs<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(elapsed.as_secs_f64())
}
