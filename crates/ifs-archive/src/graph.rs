//! Resolved archive graph.
//!
//! Records live in two arenas in encounter order. Parent, child and owner
//! relationships are stored as [`DirId`] and [`FileId`] indices into those
//! arenas, so the graph has no ownership cycles and is freely shareable once
//! built.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ArchiveError,
    parse::ParsedArchive,
    record::{DirectoryRecord, FileRecord},
};

/// Index of a directory in an [`ArchiveGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirId(usize);

impl DirId {
    /// Wraps an arena index.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the directory in encounter order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a file in an [`ArchiveGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

impl FileId {
    /// Wraps an arena index.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the file in encounter order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Directories and files of the archive with all references resolved.
#[derive(Debug)]
pub struct ArchiveGraph {
    /// Directory arena.
    directories: Vec<DirectoryRecord>,
    /// File arena.
    files: Vec<FileRecord>,
    /// Directory name to id.
    dirs_by_name: HashMap<String, DirId>,
    /// File path to id.
    files_by_path: HashMap<String, FileId>,
    /// The designated top-level directory.
    root: DirId,
}

impl ArchiveGraph {
    /// Links parsed records into a graph rooted at `root_name`.
    ///
    /// Directories are resolved first, in encounter order, then files. Any
    /// reference to a directory that does not exist is fatal.
    pub fn resolve(parsed: ParsedArchive, root_name: &str) -> Result<Self, ArchiveError> {
        let ParsedArchive {
            mut directories,
            mut files,
            dirs_by_name,
            files_by_path,
        } = parsed;

        let root = *dirs_by_name
            .get(root_name)
            .ok_or_else(|| ArchiveError::MissingRoot {
                name: root_name.to_string(),
            })?;

        for index in 0..directories.len() {
            let dir = &directories[index];
            if dir.parent_path.is_empty() {
                continue;
            }
            let parent = *dirs_by_name.get(dir.parent_path.as_str()).ok_or_else(|| {
                ArchiveError::DanglingParent {
                    directory: dir.name.clone(),
                    parent: dir.parent_path.clone(),
                }
            })?;
            directories[index].parent = Some(parent);
            directories[parent.index()].children.push(DirId::new(index));
        }

        for (index, file) in files.iter_mut().enumerate() {
            let dir = *dirs_by_name
                .get(file.directory_path.as_str())
                .ok_or_else(|| ArchiveError::DanglingDirectory {
                    path: file.path.clone(),
                    directory: file.directory_path.clone(),
                })?;
            file.directory = Some(dir);
            directories[dir.index()].files.push(FileId::new(index));
        }

        debug!(
            root = root_name,
            directories = directories.len(),
            files = files.len(),
            "resolved archive graph"
        );

        Ok(Self {
            directories,
            files,
            dirs_by_name,
            files_by_path,
            root,
        })
    }

    /// Id of the designated root directory.
    pub fn root(&self) -> DirId {
        self.root
    }

    /// Name of the designated root directory.
    pub fn root_name(&self) -> &str {
        &self.directory(self.root).name
    }

    /// Directory with the given id.
    ///
    /// Ids are only handed out by this graph, so the lookup cannot miss.
    pub fn directory(&self, id: DirId) -> &DirectoryRecord {
        &self.directories[id.index()]
    }

    /// File with the given id.
    pub fn file(&self, id: FileId) -> &FileRecord {
        &self.files[id.index()]
    }

    /// Id of the directory named `name`.
    pub fn directory_id(&self, name: &str) -> Option<DirId> {
        self.dirs_by_name.get(name).copied()
    }

    /// Directory named `name`.
    pub fn directory_by_name(&self, name: &str) -> Option<&DirectoryRecord> {
        self.directory_id(name).map(|id| self.directory(id))
    }

    /// File at `path`.
    pub fn file_by_path(&self, path: &str) -> Option<&FileRecord> {
        self.files_by_path.get(path).map(|id| self.file(*id))
    }

    /// All directories in encounter order.
    pub fn directories(&self) -> impl Iterator<Item = (DirId, &DirectoryRecord)> {
        self.directories
            .iter()
            .enumerate()
            .map(|(i, d)| (DirId::new(i), d))
    }

    /// All files in encounter order.
    pub fn files(&self) -> impl Iterator<Item = (FileId, &FileRecord)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId::new(i), f))
    }

    /// Child directories of `id`, in resolve order.
    pub fn children(&self, id: DirId) -> impl Iterator<Item = &DirectoryRecord> {
        self.directory(id)
            .children
            .iter()
            .map(|child| self.directory(*child))
    }

    /// Files owned by `id`, in resolve order.
    pub fn files_in(&self, id: DirId) -> impl Iterator<Item = &FileRecord> {
        self.directory(id).files.iter().map(|f| self.file(*f))
    }

    /// Owning directory of a file from this graph.
    pub fn directory_of(&self, file: &FileRecord) -> Option<&DirectoryRecord> {
        file.directory.map(|id| self.directory(id))
    }

    /// Parent of a directory from this graph; `None` for roots.
    pub fn parent_of(&self, dir: &DirectoryRecord) -> Option<&DirectoryRecord> {
        dir.parent.map(|id| self.directory(id))
    }

    /// Number of directories.
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Number of files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Strips the root prefix from an archive path.
    ///
    /// `if-archive/games/advent.z5` becomes `games/advent.z5`; the root itself
    /// becomes the empty string. Paths outside the root are returned unchanged.
    pub fn relative_path<'a>(&self, path: &'a str) -> &'a str {
        let root = self.root_name();
        match path.strip_prefix(root) {
            Some("") => "",
            Some(rest) => rest.strip_prefix('/').unwrap_or(path),
            None => path,
        }
    }
}
