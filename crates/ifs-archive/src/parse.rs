//! Streaming parser for the master index.
//!
//! The master index reuses element names across contexts: `<name>` names a
//! directory, a file, or a symlink target depending on where it appears, and
//! `<directory>` is either a top-level entry or a file's owning directory.
//! The parser therefore keeps an explicit [`Context`] and dispatches every start
//! and end event on the pair (context, tag). Events that make no sense in the
//! current context are ignored rather than reported.
//!
//! All mutable state lives in a [`ParseState`], so independent ingestions never
//! share anything and the state machine can be driven directly from a list of
//! [`Event`]s in tests.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use quick_xml::{
    Reader,
    events::{BytesStart, Event as XmlEvent},
};
use tracing::debug;

use crate::{
    ArchiveError,
    graph::{DirId, FileId},
    record::{DirectoryRecord, FileRecord, Metadata, ParentDescriptions, SymlinkKind},
};

/// A structural event from the master index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// An element opened.
    Start {
        /// Element name.
        name: String,
        /// Attributes as `(name, value)` pairs.
        attributes: Vec<(String, String)>,
    },
    /// Character data.
    Text(String),
    /// An element closed.
    End {
        /// Element name.
        name: String,
    },
}

impl Event {
    /// Creates a start event without attributes.
    pub fn start(name: impl Into<String>) -> Self {
        Self::Start {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Creates a start event with attributes.
    pub fn start_with(name: impl Into<String>, attributes: &[(&str, &str)]) -> Self {
        Self::Start {
            name: name.into(),
            attributes: attributes
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Creates a character data event.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates an end event.
    pub fn end(name: impl Into<String>) -> Self {
        Self::End { name: name.into() }
    }
}

/// Elements the parser understands. Anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    /// `<directory>`: an entry at top level, a file's owner inside a file.
    Directory,
    /// `<file>`
    File,
    /// `<metadata>`
    Metadata,
    /// `<item>`
    Item,
    /// `<key>`
    Key,
    /// `<value>`
    Value,
    /// `<name>`
    Name,
    /// `<filecount>`
    FileCount,
    /// `<subdircount>`
    SubdirCount,
    /// `<parent>`
    Parent,
    /// `<path>`
    Path,
    /// `<size>`
    Size,
    /// `<date>`
    Date,
    /// `<rawdate>`
    RawDate,
    /// `<md5>`
    Md5,
    /// `<sha512>`
    Sha512,
    /// `<description>`
    Description,
    /// `<parentdesc>`
    ParentDesc,
    /// `<symlink>`
    Symlink,
}

impl Tag {
    /// Maps an element name to a tag.
    fn from_name(name: &str) -> Option<Self> {
        let tag = match name {
            "directory" => Self::Directory,
            "file" => Self::File,
            "metadata" => Self::Metadata,
            "item" => Self::Item,
            "key" => Self::Key,
            "value" => Self::Value,
            "name" => Self::Name,
            "filecount" => Self::FileCount,
            "subdircount" => Self::SubdirCount,
            "parent" => Self::Parent,
            "path" => Self::Path,
            "size" => Self::Size,
            "date" => Self::Date,
            "rawdate" => Self::RawDate,
            "md5" => Self::Md5,
            "sha512" => Self::Sha512,
            "description" => Self::Description,
            "parentdesc" => Self::ParentDesc,
            "symlink" => Self::Symlink,
            _ => return None,
        };
        Some(tag)
    }

    /// Element name, for error messages.
    fn name(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::File => "file",
            Self::Metadata => "metadata",
            Self::Item => "item",
            Self::Key => "key",
            Self::Value => "value",
            Self::Name => "name",
            Self::FileCount => "filecount",
            Self::SubdirCount => "subdircount",
            Self::Parent => "parent",
            Self::Path => "path",
            Self::Size => "size",
            Self::Date => "date",
            Self::RawDate => "rawdate",
            Self::Md5 => "md5",
            Self::Sha512 => "sha512",
            Self::Description => "description",
            Self::ParentDesc => "parentdesc",
            Self::Symlink => "symlink",
        }
    }
}

/// Where the parser currently is in the entry grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Context {
    /// Between entries.
    #[default]
    Outside,
    /// Inside a directory entry.
    Directory,
    /// Inside a file entry.
    File,
    /// Inside a file's `<symlink type="dir">` block.
    DirectoryLink,
    /// Inside a file's `<symlink type="file">` block.
    FileLink,
    /// Inside a `<metadata>` block of the current entry.
    MetadataBlock,
    /// Inside an `<item>` of a metadata block.
    MetadataItem,
}

/// Returns true if `tag` is a text-bearing leaf in `context`.
fn is_leaf(context: Context, tag: Tag) -> bool {
    matches!(
        (context, tag),
        (
            Context::Directory,
            Tag::Name
                | Tag::Parent
                | Tag::SubdirCount
                | Tag::FileCount
                | Tag::RawDate
                | Tag::Description
        ) | (
            Context::File,
            Tag::Name
                | Tag::Path
                | Tag::Directory
                | Tag::Size
                | Tag::Date
                | Tag::RawDate
                | Tag::Md5
                | Tag::Sha512
                | Tag::Description
        ) | (Context::DirectoryLink, Tag::Name)
            | (Context::FileLink, Tag::Path)
            | (Context::MetadataItem, Tag::Key | Tag::Value)
    )
}

/// The entry currently being built.
#[derive(Debug)]
enum Entry {
    /// A directory entry.
    Directory(DirectoryRecord),
    /// A file entry.
    File(FileRecord),
}

impl Entry {
    /// The context that owns this entry's scalar fields.
    fn context(&self) -> Context {
        match self {
            Self::Directory(_) => Context::Directory,
            Self::File(_) => Context::File,
        }
    }

    /// Entry kind, for error messages.
    fn kind(&self) -> &'static str {
        match self {
            Self::Directory(_) => "directory",
            Self::File(_) => "file",
        }
    }

    /// Mutable access to the entry's metadata slot.
    fn metadata_mut(&mut self) -> &mut Option<Metadata> {
        match self {
            Self::Directory(dir) => &mut dir.metadata,
            Self::File(file) => &mut file.metadata,
        }
    }

    /// Mutable access to the entry's inherited descriptions.
    fn parent_descriptions_mut(&mut self) -> &mut ParentDescriptions {
        match self {
            Self::Directory(dir) => &mut dir.parent_descriptions,
            Self::File(file) => &mut file.parent_descriptions,
        }
    }
}

/// An open text-bearing element.
#[derive(Debug)]
struct Leaf {
    /// The element being collected.
    tag: Tag,
    /// Text collected since the element opened.
    text: String,
    /// Ancestor identifier for `<parentdesc>`.
    owner: Option<String>,
}

impl Leaf {
    /// Opens a leaf with an empty buffer.
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            text: String::new(),
            owner: None,
        }
    }
}

/// A metadata item under construction.
#[derive(Debug, Default)]
struct PendingItem {
    /// The item's key, once seen.
    key: Option<String>,
    /// Values in document order.
    values: Vec<String>,
}

/// Records collected by a completed parse, before references are resolved.
#[derive(Debug, Default)]
pub struct ParsedArchive {
    /// Directories in encounter order.
    pub(crate) directories: Vec<DirectoryRecord>,
    /// Files in encounter order.
    pub(crate) files: Vec<FileRecord>,
    /// Directory name to arena index.
    pub(crate) dirs_by_name: HashMap<String, DirId>,
    /// File path to arena index.
    pub(crate) files_by_path: HashMap<String, FileId>,
}

impl ParsedArchive {
    /// Looks up a parsed directory by name.
    pub fn directory(&self, name: &str) -> Option<&DirectoryRecord> {
        self.dirs_by_name
            .get(name)
            .map(|id| &self.directories[id.index()])
    }

    /// Looks up a parsed file by path.
    pub fn file(&self, path: &str) -> Option<&FileRecord> {
        self.files_by_path
            .get(path)
            .map(|id| &self.files[id.index()])
    }

    /// Directories in encounter order.
    pub fn directories(&self) -> &[DirectoryRecord] {
        &self.directories
    }

    /// Files in encounter order.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Adds a completed directory entry.
    fn insert_directory(&mut self, dir: DirectoryRecord) -> Result<(), ArchiveError> {
        if dir.name.is_empty() {
            return Err(ArchiveError::MissingField {
                entry: "directory",
                field: "name",
            });
        }
        if self.dirs_by_name.contains_key(&dir.name) {
            return Err(ArchiveError::DuplicateDirectory { name: dir.name });
        }
        let id = DirId::new(self.directories.len());
        self.dirs_by_name.insert(dir.name.clone(), id);
        self.directories.push(dir);
        Ok(())
    }

    /// Adds a completed file entry.
    fn insert_file(&mut self, file: FileRecord) -> Result<(), ArchiveError> {
        for (field, value) in [("path", &file.path), ("name", &file.name)] {
            if value.is_empty() {
                return Err(ArchiveError::MissingField {
                    entry: "file",
                    field,
                });
            }
        }
        if self.files_by_path.contains_key(&file.path) {
            return Err(ArchiveError::DuplicateFile { path: file.path });
        }
        let id = FileId::new(self.files.len());
        self.files_by_path.insert(file.path.clone(), id);
        self.files.push(file);
        Ok(())
    }
}

/// All mutable state of one master index parse.
#[derive(Debug, Default)]
pub struct ParseState {
    /// Current position in the entry grammar.
    context: Context,
    /// Entry being built, if inside one.
    entry: Option<Entry>,
    /// Metadata item being built, if inside one.
    item: Option<PendingItem>,
    /// Open leaf element collecting text.
    leaf: Option<Leaf>,
    /// Order index for the next completed file.
    next_order_index: u64,
    /// Completed records.
    archive: ParsedArchive,
}

impl ParseState {
    /// Creates a parser positioned outside any entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one structural event to the state machine.
    pub fn handle(&mut self, event: Event) -> Result<(), ArchiveError> {
        match event {
            Event::Start { name, attributes } => match Tag::from_name(&name) {
                Some(tag) => self.start(tag, &attributes),
                None => Ok(()),
            },
            Event::Text(text) => {
                if let Some(leaf) = self.leaf.as_mut() {
                    leaf.text.push_str(&text);
                }
                Ok(())
            }
            Event::End { name } => match Tag::from_name(&name) {
                Some(tag) => self.end(tag),
                None => Ok(()),
            },
        }
    }

    /// Finishes the parse and returns the collected records.
    pub fn finish(self) -> Result<ParsedArchive, ArchiveError> {
        if let Some(entry) = &self.entry {
            return Err(ArchiveError::UnterminatedEntry {
                entry: entry.kind(),
            });
        }
        debug!(
            directories = self.archive.directories.len(),
            files = self.archive.files.len(),
            "parsed master index"
        );
        Ok(self.archive)
    }

    /// Handles an opening tag.
    fn start(&mut self, tag: Tag, attributes: &[(String, String)]) -> Result<(), ArchiveError> {
        match (self.context, tag) {
            (Context::Outside, Tag::Directory) => {
                self.entry = Some(Entry::Directory(DirectoryRecord::default()));
                self.context = Context::Directory;
            }
            (Context::Outside, Tag::File) => {
                self.entry = Some(Entry::File(FileRecord::default()));
                self.context = Context::File;
            }
            (Context::Directory | Context::File, Tag::Metadata) => {
                if let Some(entry) = self.entry.as_mut() {
                    *entry.metadata_mut() = Some(Metadata::new());
                }
                self.context = Context::MetadataBlock;
            }
            (Context::MetadataBlock, Tag::Item) => {
                self.item = Some(PendingItem::default());
                self.context = Context::MetadataItem;
            }
            (Context::File, Tag::Symlink) => {
                let kind = match attribute(attributes, "type") {
                    Some("dir") => SymlinkKind::Directory,
                    Some(_) => SymlinkKind::File,
                    None => {
                        return Err(ArchiveError::MissingAttribute {
                            element: "symlink",
                            attribute: "type",
                        });
                    }
                };
                if let Some(Entry::File(file)) = self.entry.as_mut() {
                    file.symlink_kind = kind;
                }
                self.context = if kind == SymlinkKind::Directory {
                    Context::DirectoryLink
                } else {
                    Context::FileLink
                };
            }
            (Context::Directory | Context::File, Tag::ParentDesc) => {
                let owner =
                    attribute(attributes, "dir").ok_or(ArchiveError::MissingAttribute {
                        element: "parentdesc",
                        attribute: "dir",
                    })?;
                self.leaf = Some(Leaf {
                    owner: Some(owner.to_string()),
                    ..Leaf::new(tag)
                });
            }
            (context, tag) if is_leaf(context, tag) => {
                self.leaf = Some(Leaf::new(tag));
            }
            _ => {}
        }
        Ok(())
    }

    /// Handles a closing tag.
    fn end(&mut self, tag: Tag) -> Result<(), ArchiveError> {
        match (self.context, tag) {
            (Context::Directory, Tag::Directory) => self.finish_directory(),
            (Context::File, Tag::File) => self.finish_file(),
            (Context::MetadataBlock, Tag::Metadata) => {
                self.context = self
                    .entry
                    .as_ref()
                    .map_or(Context::Outside, Entry::context);
                Ok(())
            }
            (Context::MetadataItem, Tag::Item) => {
                self.finish_item();
                self.context = Context::MetadataBlock;
                Ok(())
            }
            (Context::DirectoryLink | Context::FileLink, Tag::Symlink) => {
                self.context = Context::File;
                Ok(())
            }
            (context, tag) => match self.harvest(tag) {
                Some(leaf) => self.assign(context, leaf),
                None => Ok(()),
            },
        }
    }

    /// Takes the open leaf if it belongs to `tag`.
    fn harvest(&mut self, tag: Tag) -> Option<Leaf> {
        match self.leaf.take() {
            Some(leaf) if leaf.tag == tag => Some(leaf),
            other => {
                self.leaf = other;
                None
            }
        }
    }

    /// Stores a harvested leaf into the field selected by the context.
    fn assign(&mut self, context: Context, leaf: Leaf) -> Result<(), ArchiveError> {
        let Leaf { tag, text, owner } = leaf;

        if tag == Tag::ParentDesc {
            if let (Some(entry), Some(owner)) = (self.entry.as_mut(), owner) {
                entry.parent_descriptions_mut().insert(owner, text);
            }
            return Ok(());
        }

        match (context, self.entry.as_mut()) {
            (Context::MetadataItem, _) => {
                if let Some(item) = self.item.as_mut() {
                    match tag {
                        Tag::Key => item.key = Some(text),
                        Tag::Value => item.values.push(text),
                        _ => {}
                    }
                }
            }
            (Context::Directory, Some(Entry::Directory(dir))) => match tag {
                Tag::Name => dir.name = text,
                Tag::Parent => dir.parent_path = text,
                Tag::SubdirCount => dir.subdir_count = Some(parse_number(tag, &text)?),
                Tag::FileCount => dir.file_count = Some(parse_number(tag, &text)?),
                Tag::RawDate => dir.raw_date = Some(parse_number(tag, &text)?),
                Tag::Description => dir.description = Some(text),
                _ => {}
            },
            (Context::File, Some(Entry::File(file))) => match tag {
                Tag::Name => file.name = text,
                Tag::Path => file.path = text,
                Tag::Directory => file.directory_path = text,
                Tag::Size => file.size = Some(parse_number(tag, &text)?),
                Tag::Date => file.date = Some(text),
                Tag::RawDate => file.raw_date = Some(parse_number(tag, &text)?),
                Tag::Md5 => file.checksum_primary = Some(text),
                Tag::Sha512 => file.checksum_secondary = Some(text),
                Tag::Description => file.description = Some(text),
                _ => {}
            },
            (Context::DirectoryLink, Some(Entry::File(file))) if tag == Tag::Name => {
                file.symlink_target = Some(text);
            }
            (Context::FileLink, Some(Entry::File(file))) if tag == Tag::Path => {
                file.symlink_target = Some(text);
            }
            _ => {}
        }
        Ok(())
    }

    /// Adds the finished metadata item to the entry if it has a key and values.
    fn finish_item(&mut self) {
        let Some(PendingItem {
            key: Some(key),
            values,
        }) = self.item.take()
        else {
            return;
        };
        if key.is_empty() || values.is_empty() {
            return;
        }
        if let Some(metadata) = self.entry.as_mut().and_then(|e| e.metadata_mut().as_mut()) {
            metadata.insert(key, values);
        }
    }

    /// Completes the current directory entry.
    fn finish_directory(&mut self) -> Result<(), ArchiveError> {
        self.context = Context::Outside;
        match self.entry.take() {
            Some(Entry::Directory(dir)) => self.archive.insert_directory(dir),
            _ => Ok(()),
        }
    }

    /// Completes the current file entry, stamping its order index.
    fn finish_file(&mut self) -> Result<(), ArchiveError> {
        self.context = Context::Outside;
        match self.entry.take() {
            Some(Entry::File(mut file)) => {
                file.order_index = self.next_order_index;
                self.next_order_index += 1;
                self.archive.insert_file(file)
            }
            _ => Ok(()),
        }
    }
}

/// Looks up an attribute value by name.
fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Parses the text of a numeric leaf.
fn parse_number<T: FromStr>(tag: Tag, text: &str) -> Result<T, ArchiveError> {
    text.trim()
        .parse()
        .map_err(|_| ArchiveError::InvalidNumber {
            field: tag.name(),
            value: text.to_string(),
        })
}

/// Parses the master index file at `path`.
pub fn parse_file(path: &Path) -> Result<ParsedArchive, ArchiveError> {
    let file = File::open(path).map_err(|source| ArchiveError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "reading master index");
    parse_reader(BufReader::new(file))
}

/// Parses a master index held in memory.
pub fn parse_str(xml: &str) -> Result<ParsedArchive, ArchiveError> {
    parse_reader(xml.as_bytes())
}

/// Parses a master index from any buffered reader.
///
/// XML well-formedness is enforced by the reader: mismatched or unclosed tags
/// abort the parse.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<ParsedArchive, ArchiveError> {
    let mut xml = Reader::from_reader(reader);
    let mut state = ParseState::new();
    let mut open: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = xml
            .read_event_into(&mut buf)
            .map_err(|e| ArchiveError::xml(xml.buffer_position() as u64, e))?;
        let position = xml.buffer_position() as u64;

        match event {
            XmlEvent::Start(start) => {
                let (name, attributes) =
                    element_parts(&start).map_err(|e| ArchiveError::xml(position, e))?;
                open.push(name.clone());
                state.handle(Event::Start { name, attributes })?;
            }
            XmlEvent::Empty(start) => {
                let (name, attributes) =
                    element_parts(&start).map_err(|e| ArchiveError::xml(position, e))?;
                state.handle(Event::Start {
                    name: name.clone(),
                    attributes,
                })?;
                state.handle(Event::End { name })?;
            }
            XmlEvent::End(end) => {
                open.pop();
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                state.handle(Event::End { name })?;
            }
            XmlEvent::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ArchiveError::xml(position, e))?;
                state.handle(Event::Text(text.into_owned()))?;
            }
            XmlEvent::CData(data) => {
                state.handle(Event::Text(String::from_utf8_lossy(&data).into_owned()))?;
            }
            XmlEvent::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(element) = open.pop() {
        return Err(ArchiveError::UnexpectedEof { element });
    }

    state.finish()
}

/// Extracts the name and unescaped attributes of an element.
fn element_parts(start: &BytesStart<'_>) -> Result<(String, Vec<(String, String)>), quick_xml::Error> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let attributes = start
        .attributes()
        .map(|attr| {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            Ok((key, value))
        })
        .collect::<Result<Vec<_>, quick_xml::Error>>()?;
    Ok((name, attributes))
}

#[cfg(test)]
mod test {
    use super::*;

    fn wrap(body: &str) -> String {
        format!("<?xml version=\"1.0\"?>\n<ifarchive>\n{body}\n</ifarchive>\n")
    }

    #[test]
    fn parses_directory_scalars() {
        let xml = wrap(
            r#"<directory>
  <name>if-archive/games</name>
  <parent>if-archive</parent>
  <subdircount>3</subdircount>
  <filecount>12</filecount>
  <description>Games of all kinds.</description>
</directory>"#,
        );
        let parsed = parse_str(&xml).unwrap();
        let dir = parsed.directory("if-archive/games").unwrap();

        assert_eq!(dir.parent_path, "if-archive");
        assert_eq!(dir.subdir_count, Some(3));
        assert_eq!(dir.file_count, Some(12));
        assert_eq!(dir.description.as_deref(), Some("Games of all kinds."));
        assert!(dir.metadata.is_none());
        assert!(dir.raw_date.is_none());
    }

    #[test]
    fn name_resolves_by_context() {
        let xml = wrap(
            r#"<directory><name>if-archive</name><parent></parent></directory>
<file>
  <name>latest</name>
  <path>if-archive/latest</path>
  <directory>if-archive</directory>
  <symlink type="dir"><name>if-archive/games</name></symlink>
</file>"#,
        );
        let parsed = parse_str(&xml).unwrap();

        assert!(parsed.directory("if-archive").is_some());
        let file = parsed.file("if-archive/latest").unwrap();
        assert_eq!(file.name, "latest");
        assert_eq!(file.symlink_kind, SymlinkKind::Directory);
        assert_eq!(file.symlink_target.as_deref(), Some("if-archive/games"));
    }

    #[test]
    fn directory_leaf_inside_file_sets_owner_path() {
        let xml = wrap(
            r#"<file>
  <name>advent.z5</name>
  <path>if-archive/games/zcode/advent.z5</path>
  <directory>if-archive/games/zcode</directory>
  <size>135168</size>
  <rawdate>946684800</rawdate>
  <date>01-Jan-2000</date>
  <md5>0123456789abcdef0123456789abcdef</md5>
</file>"#,
        );
        let parsed = parse_str(&xml).unwrap();

        assert!(parsed.directories().is_empty());
        let file = parsed.file("if-archive/games/zcode/advent.z5").unwrap();
        assert_eq!(file.directory_path, "if-archive/games/zcode");
        assert_eq!(file.size, Some(135_168));
        assert_eq!(file.raw_date, Some(946_684_800));
        assert_eq!(file.date.as_deref(), Some("01-Jan-2000"));
        assert_eq!(
            file.checksum_primary.as_deref(),
            Some("0123456789abcdef0123456789abcdef")
        );
        assert!(file.checksum_secondary.is_none());
    }

    #[test]
    fn file_symlink_path_does_not_touch_file_name() {
        let xml = wrap(
            r#"<file>
  <name>current.z5</name>
  <path>if-archive/games/current.z5</path>
  <directory>if-archive/games</directory>
  <symlink type="file"><name>ignored</name><path>if-archive/games/zcode/advent.z5</path></symlink>
</file>"#,
        );
        let parsed = parse_str(&xml).unwrap();
        let file = parsed.file("if-archive/games/current.z5").unwrap();

        assert_eq!(file.name, "current.z5");
        assert_eq!(file.path, "if-archive/games/current.z5");
        assert_eq!(file.symlink_kind, SymlinkKind::File);
        assert_eq!(
            file.symlink_target.as_deref(),
            Some("if-archive/games/zcode/advent.z5")
        );
    }

    #[test]
    fn metadata_items_collect_values_in_order() {
        let xml = wrap(
            r#"<file>
  <name>a.z5</name><path>d/a.z5</path><directory>d</directory>
  <metadata>
    <item><key>tuid</key><value>abc</value><value>def</value></item>
    <item><key>author</key><value>Someone</value></item>
  </metadata>
</file>"#,
        );
        let parsed = parse_str(&xml).unwrap();
        let metadata = parsed.file("d/a.z5").unwrap().metadata.as_ref().unwrap();

        assert_eq!(metadata["tuid"], vec!["abc", "def"]);
        assert_eq!(metadata["author"], vec!["Someone"]);
    }

    #[test]
    fn metadata_item_without_values_is_dropped() {
        let xml = wrap(
            r#"<directory>
  <name>d</name><parent></parent>
  <metadata>
    <item><key>empty</key></item>
    <item><value>orphan</value></item>
    <item><key>kept</key><value>yes</value></item>
  </metadata>
</directory>"#,
        );
        let parsed = parse_str(&xml).unwrap();
        let metadata = parsed.directory("d").unwrap().metadata.as_ref().unwrap();

        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["kept"], vec!["yes"]);
    }

    #[test]
    fn empty_metadata_block_allocates_map() {
        let xml = wrap("<directory><name>d</name><metadata></metadata></directory>");
        let parsed = parse_str(&xml).unwrap();
        let dir = parsed.directory("d").unwrap();

        assert_eq!(dir.metadata.as_ref().map(Metadata::len), Some(0));
    }

    #[test]
    fn parentdesc_is_stored_under_owner() {
        let xml = wrap(
            r#"<directory>
  <name>if-archive/games/zcode</name>
  <parent>if-archive/games</parent>
  <parentdesc dir="if-archive/games">Games &amp; more.</parentdesc>
  <parentdesc dir="if-archive">The archive.</parentdesc>
</directory>"#,
        );
        let parsed = parse_str(&xml).unwrap();
        let dir = parsed.directory("if-archive/games/zcode").unwrap();

        assert!(dir.description.is_none());
        assert_eq!(
            dir.parent_descriptions.get("if-archive/games"),
            Some("Games & more.")
        );
        assert_eq!(
            dir.parent_descriptions.values().collect::<Vec<_>>(),
            vec!["Games & more.", "The archive."]
        );
    }

    #[test]
    fn order_index_follows_encounter_order() {
        let xml = wrap(
            r#"<file><name>b</name><path>d/b</path><directory>d</directory></file>
<directory><name>d</name></directory>
<file><name>a</name><path>d/a</path><directory>d</directory></file>
<file><name>c</name><path>d/c</path><directory>d</directory></file>"#,
        );
        let parsed = parse_str(&xml).unwrap();
        let order: Vec<_> = parsed
            .files()
            .iter()
            .map(|f| (f.name.as_str(), f.order_index))
            .collect();

        assert_eq!(order, vec![("b", 0), ("a", 1), ("c", 2)]);
    }

    #[test]
    fn non_numeric_size_is_fatal() {
        let xml = wrap(
            "<file><name>a</name><path>d/a</path><directory>d</directory><size>big</size></file>",
        );
        let err = parse_str(&xml).unwrap_err();

        assert!(matches!(
            err,
            ArchiveError::InvalidNumber { field: "size", .. }
        ));
        assert!(err.to_string().contains("big"));
    }

    #[test]
    fn numeric_fields_tolerate_surrounding_whitespace() {
        let xml = wrap("<directory><name>d</name><filecount>\n  7\n</filecount></directory>");
        let parsed = parse_str(&xml).unwrap();
        assert_eq!(parsed.directory("d").unwrap().file_count, Some(7));
    }

    #[test]
    fn mismatched_tags_are_fatal() {
        let xml = wrap("<directory><name>d</parent></directory>");
        assert!(matches!(
            parse_str(&xml).unwrap_err(),
            ArchiveError::Xml { .. }
        ));
    }

    #[test]
    fn unclosed_input_is_fatal() {
        let xml = "<ifarchive><directory><name>d</name>";
        assert!(parse_str(xml).is_err());
    }

    #[test]
    fn unknown_tags_are_ignored_but_their_text_is_kept() {
        let xml = wrap(
            r#"<mirror>elsewhere</mirror>
<directory>
  <name>d</name>
  <owner>nobody</owner>
  <description>plain <em>emphasis</em> text</description>
</directory>"#,
        );
        let parsed = parse_str(&xml).unwrap();
        let dir = parsed.directory("d").unwrap();

        assert_eq!(dir.description.as_deref(), Some("plain emphasis text"));
        assert_eq!(parsed.directories().len(), 1);
    }

    #[test]
    fn symlink_without_type_is_fatal() {
        let xml = wrap(
            "<file><name>a</name><path>d/a</path><directory>d</directory><symlink><path>x</path></symlink></file>",
        );
        assert!(matches!(
            parse_str(&xml).unwrap_err(),
            ArchiveError::MissingAttribute {
                element: "symlink",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_file_path_is_fatal() {
        let xml = wrap(
            r#"<file><name>a</name><path>d/a</path><directory>d</directory></file>
<file><name>a</name><path>d/a</path><directory>d</directory></file>"#,
        );
        assert!(matches!(
            parse_str(&xml).unwrap_err(),
            ArchiveError::DuplicateFile { .. }
        ));
    }

    #[test]
    fn directory_without_name_is_fatal() {
        let xml = wrap("<directory><parent>x</parent></directory>");
        assert!(matches!(
            parse_str(&xml).unwrap_err(),
            ArchiveError::MissingField {
                entry: "directory",
                field: "name"
            }
        ));
    }

    #[test]
    fn self_closing_elements_are_handled() {
        let xml = wrap("<directory><name>d</name><parent/><description/></directory>");
        let parsed = parse_str(&xml).unwrap();
        let dir = parsed.directory("d").unwrap();

        assert_eq!(dir.parent_path, "");
        assert_eq!(dir.description.as_deref(), Some(""));
    }

    #[test]
    fn leaf_outside_its_context_is_ignored() {
        let mut state = ParseState::new();
        let events = vec![
            Event::start("file"),
            Event::start("name"),
            Event::text("a"),
            Event::end("name"),
            Event::start("path"),
            Event::text("d/a"),
            Event::end("path"),
            Event::start("parent"),
            Event::text("should not land anywhere"),
            Event::end("parent"),
            Event::start("subdircount"),
            Event::text("not a number"),
            Event::end("subdircount"),
            Event::end("file"),
        ];
        for event in events {
            state.handle(event).unwrap();
        }
        let parsed = state.finish().unwrap();
        let file = parsed.file("d/a").unwrap();

        assert_eq!(file.directory_path, "");
        assert_eq!(file.name, "a");
    }

    #[test]
    fn text_buffer_resets_at_leaf_start() {
        let mut state = ParseState::new();
        let events = vec![
            Event::start("directory"),
            Event::text("stray text"),
            Event::start("name"),
            Event::text("if-"),
            Event::text("archive"),
            Event::end("name"),
            Event::text("more stray text"),
            Event::end("directory"),
        ];
        for event in events {
            state.handle(event).unwrap();
        }
        let parsed = state.finish().unwrap();

        assert!(parsed.directory("if-archive").is_some());
    }

    #[test]
    fn unterminated_entry_is_reported() {
        let mut state = ParseState::new();
        state.handle(Event::start("directory")).unwrap();
        assert!(matches!(
            state.finish().unwrap_err(),
            ArchiveError::UnterminatedEntry { entry: "directory" }
        ));
    }

    #[test]
    fn parentdesc_without_owner_is_fatal() {
        let mut state = ParseState::new();
        state.handle(Event::start("directory")).unwrap();
        let err = state
            .handle(Event::start_with("parentdesc", &[("from", "x")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::MissingAttribute {
                element: "parentdesc",
                attribute: "dir"
            }
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = parse_file(Path::new("/nonexistent/Master-Index.xml")).unwrap_err();
        assert!(matches!(err, ArchiveError::ReadFile { .. }));
    }
}
