//! Implementation of `ifsearch show`.

use std::process::ExitCode;

use chrono::DateTime;
use ifs_archive::{
    ArchiveGraph, Described, DirId, DirectoryRecord, FileRecord, SHORT_DESCRIPTION_LIMIT,
    SymlinkKind, parse_file, short_description,
};
use ifs_highlight::Styler;

use crate::cli::{args::ShowCommand, context::CommandContext, output::DATE_FORMAT};

/// Width of the label column.
const LABEL_WIDTH: usize = 12;

/// Parses the master index and prints one directory or file record.
pub fn run(ctx: &CommandContext, cmd: &ShowCommand) -> ExitCode {
    let source = &ctx.config.archive.master_index;
    if !source.is_file() {
        ctx.error(&format!("master index not found: {}", source.display()));
        return ExitCode::FAILURE;
    }

    let graph = match parse_file(source)
        .and_then(|parsed| ArchiveGraph::resolve(parsed, &ctx.config.archive.root))
    {
        Ok(graph) => graph,
        Err(e) => {
            ctx.error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let full = archive_path(&graph, &cmd.path);
    if let Some(id) = graph.directory_id(&full) {
        print_directory(&graph, id, ctx.styler);
    } else if let Some(file) = graph.file_by_path(&full) {
        print_file(&graph, file, ctx.styler);
    } else {
        ctx.error(&format!("no directory or file at {}", cmd.path));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Expands a user-supplied path to a full archive path.
///
/// Paths may be given with or without the root prefix; an empty path or
/// the root name selects the root directory.
pub fn archive_path(graph: &ArchiveGraph, path: &str) -> String {
    let root = graph.root_name();
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() || trimmed == root {
        return root.to_string();
    }
    if graph.relative_path(trimmed) != trimmed {
        return trimmed.to_string();
    }
    format!("{root}/{trimmed}")
}

/// Display name for an archive path, with the root shown by name.
fn display_path<'a>(graph: &'a ArchiveGraph, path: &'a str) -> &'a str {
    match graph.relative_path(path) {
        "" => graph.root_name(),
        rel => rel,
    }
}

/// Prints a labelled value.
fn field(styler: Styler, label: &str, value: &str) {
    println!("{}{value}", styler.dim(&format!("{label:<LABEL_WIDTH$}")));
}

/// Formats a raw timestamp.
fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map_or_else(|| secs.to_string(), |date| date.format(DATE_FORMAT).to_string())
}

/// Prints the description, inherited descriptions, listing text, and metadata.
fn print_descriptions(
    graph: &ArchiveGraph,
    record: &impl Described,
    limit: Option<usize>,
    styler: Styler,
) {
    if let Some(desc) = record.description() {
        println!();
        println!("{}", styler.header("Description"));
        println!("  {}", desc.replace('\n', "\n  "));
    }

    let inherited = record.parent_descriptions();
    if !inherited.is_empty() {
        println!();
        println!("{}", styler.header("Inherited descriptions"));
        for (owner, text) in inherited.iter() {
            println!("  {}", styler.strong(display_path(graph, owner)));
            println!("    {}", text.replace('\n', "\n    "));
        }
    }

    if let Some(listing) = short_description(record, limit) {
        println!();
        println!("{}", styler.header("Listing"));
        println!("  {}", listing.replace('\n', " "));
    }

    if let Some(metadata) = record.metadata() {
        println!();
        println!("{}", styler.header("Metadata"));
        for (key, values) in metadata {
            field(styler, &format!("  {key}"), &values.join(", "));
        }
    }
}

/// Prints a directory record with its children and files.
fn print_directory(graph: &ArchiveGraph, id: DirId, styler: Styler) {
    let dir: &DirectoryRecord = graph.directory(id);
    println!(
        "--- {} ---",
        styler.header(&format!("{} (directory)", display_path(graph, &dir.name)))
    );

    if let Some(parent) = graph.parent_of(dir) {
        field(styler, "parent", display_path(graph, &parent.name));
    }
    if let Some(count) = dir.subdir_count {
        field(styler, "subdirs", &count.to_string());
    }
    if let Some(count) = dir.file_count {
        field(styler, "files", &count.to_string());
    }
    if let Some(secs) = dir.raw_date {
        field(styler, "date", &format_timestamp(secs));
    }

    print_descriptions(graph, dir, None, styler);

    let children: Vec<&DirectoryRecord> = graph.children(id).collect();
    if !children.is_empty() {
        println!();
        println!("{}", styler.header("Subdirectories"));
        for child in children {
            println!("  {}/", display_path(graph, &child.name));
        }
    }

    let files: Vec<&FileRecord> = graph.files_in(id).collect();
    if !files.is_empty() {
        println!();
        println!("{}", styler.header("Files"));
        for file in files {
            match file.symlink_target.as_deref() {
                Some(target) if file.is_symlink() => {
                    println!("  {} -> {}", file.name, display_path(graph, target));
                }
                _ => println!("  {}", file.name),
            }
        }
    }
}

/// Prints a file record.
fn print_file(graph: &ArchiveGraph, file: &FileRecord, styler: Styler) {
    println!(
        "--- {} ---",
        styler.header(&format!("{} (file)", display_path(graph, &file.path)))
    );

    field(styler, "directory", display_path(graph, &file.directory_path));
    if let Some(size) = file.size {
        field(styler, "size", &size.to_string());
    }
    match (&file.date, file.raw_date) {
        (Some(date), Some(secs)) => {
            field(styler, "date", &format!("{date} ({})", format_timestamp(secs)));
        }
        (Some(date), None) => field(styler, "date", date),
        (None, Some(secs)) => field(styler, "date", &format_timestamp(secs)),
        (None, None) => {}
    }
    if let Some(md5) = &file.checksum_primary {
        field(styler, "md5", md5);
    }
    if let Some(sha512) = &file.checksum_secondary {
        field(styler, "sha512", sha512);
    }

    let link = match file.symlink_kind {
        SymlinkKind::None => None,
        SymlinkKind::Directory => Some("directory"),
        SymlinkKind::File => Some("file"),
    };
    if let Some(kind) = link {
        let target = file
            .symlink_target
            .as_deref()
            .map_or("?", |target| display_path(graph, target));
        field(styler, "symlink", &format!("{kind} -> {target}"));
    }

    print_descriptions(graph, file, Some(SHORT_DESCRIPTION_LIMIT), styler);
}
