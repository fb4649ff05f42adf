//! Index schema definition for the ifsearch index.
//!
//! - `type`: `directory` or `file` (stored only)
//! - `description`: aggregated description (stemmed text, positions)
//! - `spelling`: the same text, unstemmed, feeding spelling correction
//! - `shortdesc`: short description for listings (stored only)
//! - `name`: base name (raw string)
//! - `path`: root-relative path (raw string, stored)
//! - `dir`: one value per path segment of the owning directory (raw string)
//! - `date`: modification date (date, indexed, stored, fast)
//! - `size`: size in bytes (u64, indexed, fast)
//! - `tuid`: one value per game identifier (raw string)

use std::collections::BTreeSet;

use tantivy::schema::{
    DateOptions, Field, IndexRecordOption, NumericOptions, STORED, STRING, Schema,
    TextFieldIndexing, TextOptions,
};

use crate::analyzer::{TEXT_TOKENIZER, WORDS_TOKENIZER};

/// Names of every field, in schema order.
pub const FIELD_NAMES: [&str; 10] = [
    "type",
    "description",
    "spelling",
    "shortdesc",
    "name",
    "path",
    "dir",
    "date",
    "size",
    "tuid",
];

/// Handles to all fields in the index schema.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Record kind.
    pub kind: Field,
    /// Full aggregated description.
    pub description: Field,
    /// Unstemmed copy of the description.
    pub spelling: Field,
    /// Short description.
    pub shortdesc: Field,
    /// Base name.
    pub name: Field,
    /// Path relative to the archive root.
    pub path: Field,
    /// Directory path segments.
    pub dir: Field,
    /// Modification date.
    pub date: Field,
    /// Size in bytes.
    pub size: Field,
    /// Game identifiers.
    pub tuid: Field,
}

impl IndexSchema {
    /// Creates a new index schema with all fields configured.
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        let kind = builder.add_text_field("type", TextOptions::default().set_stored());

        let description_options = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(TEXT_TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        );
        let description = builder.add_text_field("description", description_options);

        // Frequencies only; the corrector needs doc_freq, never positions
        let spelling_options = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(WORDS_TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqs),
        );
        let spelling = builder.add_text_field("spelling", spelling_options);

        let shortdesc = builder.add_text_field("shortdesc", TextOptions::default().set_stored());
        let name = builder.add_text_field("name", STRING);
        let path = builder.add_text_field("path", STRING | STORED);
        let dir = builder.add_text_field("dir", STRING);

        let date_options = DateOptions::default()
            .set_indexed()
            .set_stored()
            .set_fast();
        let date = builder.add_date_field("date", date_options);

        let size_options = NumericOptions::default().set_indexed().set_fast();
        let size = builder.add_u64_field("size", size_options);

        let tuid = builder.add_text_field("tuid", STRING);

        let schema = builder.build();

        Self {
            schema,
            kind,
            description,
            spelling,
            shortdesc,
            name,
            path,
            dir,
            date,
            size,
            tuid,
        }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns true if `other` has exactly this schema's field names.
    pub fn matches(&self, other: &Schema) -> bool {
        let expected: BTreeSet<&str> = FIELD_NAMES.into_iter().collect();
        let found: BTreeSet<&str> = other
            .fields()
            .map(|(_, entry)| entry.name())
            .collect();
        expected == found
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::new()
    }
}
