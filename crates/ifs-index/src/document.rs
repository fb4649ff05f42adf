//! Searchable documents derived from the archive graph.
//!
//! Every directory except the root and every file that is not a symlink
//! becomes one [`ArchiveDocument`]. Directories are produced first so their
//! short descriptions can stand in for files that have none of their own.

use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use ifs_archive::{
    ArchiveGraph, DirId, SHORT_DESCRIPTION_LIMIT, aggregate_description, merge_list_fields,
    short_description,
};
use serde::{Deserialize, Serialize};

/// What an indexed record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// An archive directory.
    Directory,
    /// An archive file.
    File,
}

impl DocumentKind {
    /// The value stored in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "directory" => Ok(Self::Directory),
            "file" => Ok(Self::File),
            other => Err(format!("unknown document kind: {other}")),
        }
    }
}

/// A directory or file ready for indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDocument {
    /// Record kind.
    pub kind: DocumentKind,
    /// Path relative to the archive root.
    pub path: String,
    /// Base name.
    pub name: String,
    /// Comma-joined segments of the containing directory, relative to the
    /// root. `None` for entries directly in the root.
    pub dir: Option<String>,
    /// Every description piece, links stripped.
    pub description: Option<String>,
    /// Text shown in result listings.
    pub short_description: Option<String>,
    /// Modification date.
    pub date: Option<DateTime<Utc>>,
    /// Size in bytes.
    pub size: Option<u64>,
    /// Space-separated game identifiers.
    pub tuid: Option<String>,
}

/// Produces the documents for a resolved archive.
///
/// `tuid_keys` names the metadata keys merged, in order, into the `tuid`
/// field.
pub fn produce_documents(graph: &ArchiveGraph, tuid_keys: &[String]) -> Vec<ArchiveDocument> {
    let keys: Vec<&str> = tuid_keys.iter().map(String::as_str).collect();
    let root = graph.root();
    let mut documents = Vec::with_capacity(graph.directory_count() + graph.file_count());
    let mut fallbacks: HashMap<DirId, String> = HashMap::new();

    for (id, dir) in graph.directories() {
        if id == root {
            continue;
        }
        let short = short_description(dir, None);
        if let Some(text) = &short {
            fallbacks.insert(id, text.clone());
        }

        let path = graph.relative_path(&dir.name);
        documents.push(ArchiveDocument {
            kind: DocumentKind::Directory,
            path: path.to_string(),
            name: dir.base_name().to_string(),
            dir: dir_segments(path),
            description: aggregate_description(dir, true),
            short_description: short,
            date: None,
            size: None,
            tuid: merge_list_fields(dir.metadata.as_ref(), &keys),
        });
    }

    let mut files: Vec<_> = graph
        .files()
        .map(|(_, file)| file)
        .filter(|file| !file.is_symlink())
        .collect();
    files.sort_by_key(|file| file.order_index);

    for file in files {
        let short = short_description(file, Some(SHORT_DESCRIPTION_LIMIT)).or_else(|| {
            file.directory()
                .and_then(|dir| fallbacks.get(&dir))
                .cloned()
        });

        documents.push(ArchiveDocument {
            kind: DocumentKind::File,
            path: graph.relative_path(&file.path).to_string(),
            name: file.name.clone(),
            dir: dir_segments(graph.relative_path(&file.directory_path)),
            description: aggregate_description(file, true),
            short_description: short,
            date: file
                .raw_date
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            size: file.size,
            tuid: merge_list_fields(file.metadata.as_ref(), &keys),
        });
    }

    documents
}

/// Turns `games/zcode` into `games,zcode`.
fn dir_segments(relative: &str) -> Option<String> {
    let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
    (!segments.is_empty()).then(|| segments.join(","))
}
