//! Directory and file records reconstructed from the master index.
//!
//! Records are populated by the parser and linked by [`crate::ArchiveGraph::resolve`].
//! Relationship fields hold arena ids rather than references, so a record never
//! owns or borrows another record.

use std::collections::BTreeMap;

use crate::graph::{DirId, FileId};

/// Free-form metadata: key to ordered list of values.
pub type Metadata = BTreeMap<String, Vec<String>>;

/// Descriptions contributed by ancestor directories, keyed by ancestor identifier.
///
/// Entries keep the order in which they were first seen. Inserting an
/// identifier that is already present replaces its text in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentDescriptions {
    /// `(owner, text)` pairs in first-seen order.
    entries: Vec<(String, String)>,
}

impl ParentDescriptions {
    /// Creates an empty set of inherited descriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `text` as the description contributed by `owner`.
    pub fn insert(&mut self, owner: impl Into<String>, text: impl Into<String>) {
        let owner = owner.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(o, _)| *o == owner) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((owner, text)),
        }
    }

    /// Returns the description contributed by `owner`, if any.
    pub fn get(&self, owner: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(o, _)| o == owner)
            .map(|(_, text)| text.as_str())
    }

    /// Iterates over `(owner, text)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(o, t)| (o.as_str(), t.as_str()))
    }

    /// Iterates over the description texts.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, t)| t.as_str())
    }

    /// Number of contributing ancestors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no ancestor contributed a description.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<O: Into<String>, T: Into<String>> FromIterator<(O, T)> for ParentDescriptions {
    fn from_iter<I: IntoIterator<Item = (O, T)>>(iter: I) -> Self {
        let mut descs = Self::new();
        for (owner, text) in iter {
            descs.insert(owner, text);
        }
        descs
    }
}

/// What a file entry links to, if it is a symlink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SymlinkKind {
    /// A regular file.
    #[default]
    None,
    /// A link to a directory; the target is a directory name.
    Directory,
    /// A link to another file; the target is a file path.
    File,
}

impl SymlinkKind {
    /// Returns true for either kind of link.
    pub fn is_link(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Common access to the descriptive parts of a record.
pub trait Described {
    /// The record's own description, if any.
    fn description(&self) -> Option<&str>;

    /// Descriptions inherited from ancestors.
    fn parent_descriptions(&self) -> &ParentDescriptions;

    /// Key/value metadata, absent if the record declared no metadata block.
    fn metadata(&self) -> Option<&Metadata>;
}

/// A directory entry from the master index.
#[derive(Debug, Clone, Default)]
pub struct DirectoryRecord {
    /// Canonical path, rooted at the archive's top-level name.
    pub name: String,
    /// Name of the owning directory; empty for the root.
    pub parent_path: String,
    /// Declared number of subdirectories.
    pub subdir_count: Option<u64>,
    /// Declared number of files.
    pub file_count: Option<u64>,
    /// Local markdown description.
    pub description: Option<String>,
    /// Descriptions contributed by ancestors.
    pub parent_descriptions: ParentDescriptions,
    /// Key/value metadata.
    pub metadata: Option<Metadata>,
    /// Raw numeric timestamp.
    pub raw_date: Option<i64>,
    /// Parent directory, set by the resolver.
    pub(crate) parent: Option<DirId>,
    /// Child directories in resolve order.
    pub(crate) children: Vec<DirId>,
    /// Owned files in resolve order.
    pub(crate) files: Vec<FileId>,
}

impl DirectoryRecord {
    /// Creates a directory record with the given name and parent.
    pub fn new(name: impl Into<String>, parent_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_path: parent_path.into(),
            ..Self::default()
        }
    }

    /// Parent directory id; `None` for a root.
    pub fn parent(&self) -> Option<DirId> {
        self.parent
    }

    /// Child directory ids.
    pub fn children(&self) -> &[DirId] {
        &self.children
    }

    /// Owned file ids.
    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    /// Last path segment of the directory name.
    pub fn base_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

impl Described for DirectoryRecord {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn parent_descriptions(&self) -> &ParentDescriptions {
        &self.parent_descriptions
    }

    fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }
}

/// A file entry from the master index.
#[derive(Debug, Clone, Default)]
pub struct FileRecord {
    /// Full path, unique across all files.
    pub path: String,
    /// Base name.
    pub name: String,
    /// Name of the owning directory.
    pub directory_path: String,
    /// Size in bytes.
    pub size: Option<u64>,
    /// Human-readable date as written in the index.
    pub date: Option<String>,
    /// Raw numeric timestamp (seconds since the epoch).
    pub raw_date: Option<i64>,
    /// Primary digest (md5).
    pub checksum_primary: Option<String>,
    /// Secondary digest (sha512).
    pub checksum_secondary: Option<String>,
    /// Whether this entry is a symlink, and to what.
    pub symlink_kind: SymlinkKind,
    /// Link target: a directory name or a file path, depending on the kind.
    pub symlink_target: Option<String>,
    /// Local markdown description.
    pub description: Option<String>,
    /// Descriptions contributed by ancestors.
    pub parent_descriptions: ParentDescriptions,
    /// Key/value metadata.
    pub metadata: Option<Metadata>,
    /// Encounter order within the master index.
    pub order_index: u64,
    /// Owning directory, set by the resolver.
    pub(crate) directory: Option<DirId>,
}

impl FileRecord {
    /// Creates a file record with the given path, name and owning directory.
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        directory_path: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            directory_path: directory_path.into(),
            ..Self::default()
        }
    }

    /// Owning directory id, once resolved.
    pub fn directory(&self) -> Option<DirId> {
        self.directory
    }

    /// Returns true if the entry is a symlink of either kind.
    pub fn is_symlink(&self) -> bool {
        self.symlink_kind.is_link()
    }
}

impl Described for FileRecord {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn parent_descriptions(&self) -> &ParentDescriptions {
        &self.parent_descriptions
    }

    fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parent_descriptions_keep_first_seen_order() {
        let mut descs = ParentDescriptions::new();
        descs.insert("if-archive/games", "Games");
        descs.insert("if-archive", "Everything");
        descs.insert("if-archive/games", "All games");

        let owners: Vec<_> = descs.iter().map(|(o, _)| o).collect();
        assert_eq!(owners, vec!["if-archive/games", "if-archive"]);
        assert_eq!(descs.get("if-archive/games"), Some("All games"));
        assert_eq!(descs.len(), 2);
    }

    #[test]
    fn parent_descriptions_collect_from_pairs() {
        let descs: ParentDescriptions = [("a", "one"), ("b", "two")].into_iter().collect();
        assert_eq!(descs.values().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn directory_base_name() {
        let dir = DirectoryRecord::new("if-archive/games/zcode", "if-archive/games");
        assert_eq!(dir.base_name(), "zcode");

        let root = DirectoryRecord::new("if-archive", "");
        assert_eq!(root.base_name(), "if-archive");
    }

    #[test]
    fn symlink_kind_is_link() {
        assert!(!SymlinkKind::None.is_link());
        assert!(SymlinkKind::Directory.is_link());
        assert!(SymlinkKind::File.is_link());

        let mut file = FileRecord::new("a/b", "b", "a");
        assert!(!file.is_symlink());
        file.symlink_kind = SymlinkKind::File;
        assert!(file.is_symlink());
    }
}
