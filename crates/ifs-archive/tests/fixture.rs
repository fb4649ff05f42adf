//! Integration tests for ifs-archive.
//!
//! Runs the full ingestion pipeline over the shared fixture: parse -> resolve
//! -> describe -> merge.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::path::{Path, PathBuf};

use ifs_archive::{
    ArchiveGraph, SHORT_DESCRIPTION_LIMIT, SymlinkKind, aggregate_description, merge_list_field,
    parse_file, short_description,
};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Master-Index.xml")
}

fn graph() -> ArchiveGraph {
    let parsed = parse_file(&fixture()).unwrap();
    ArchiveGraph::resolve(parsed, "if-archive").unwrap()
}

#[test]
fn fixture_resolves_completely() {
    let graph = graph();

    assert_eq!(graph.directory_count(), 5);
    assert_eq!(graph.file_count(), 8);

    for (id, dir) in graph.directories() {
        for child in dir.children() {
            assert_eq!(graph.directory(*child).parent(), Some(id));
        }
        for file in dir.files() {
            assert_eq!(graph.file(*file).directory(), Some(id));
        }
    }
}

#[test]
fn order_indexes_strictly_increase() {
    let graph = graph();
    let indexes: Vec<u64> = graph.files().map(|(_, f)| f.order_index).collect();

    assert!(indexes.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(indexes.first(), Some(&0));
}

#[test]
fn symlinks_record_kind_and_target() {
    let graph = graph();

    let latest = graph
        .file_by_path("if-archive/games/zcode/latest.z5")
        .unwrap();
    assert_eq!(latest.symlink_kind, SymlinkKind::File);
    assert_eq!(
        latest.symlink_target.as_deref(),
        Some("if-archive/games/zcode/advent.z5")
    );

    let current = graph.file_by_path("if-archive/games/current").unwrap();
    assert_eq!(current.symlink_kind, SymlinkKind::Directory);
    assert_eq!(current.symlink_target.as_deref(), Some("if-archive/games/zcode"));
}

#[test]
fn descriptions_inherit_from_ancestors() {
    let graph = graph();

    let advent = graph
        .file_by_path("if-archive/games/zcode/advent.z5")
        .unwrap();
    assert_eq!(
        aggregate_description(advent, true).as_deref(),
        Some(
            "Colossal Cave Adventure, ported to Inform by Graham Nelson.\n\
             Z-code games, playable with any Z-machine interpreter."
        )
    );

    let zork = graph
        .file_by_path("if-archive/games/zcode/zork1.z3")
        .unwrap();
    assert_eq!(
        short_description(zork, Some(SHORT_DESCRIPTION_LIMIT)).as_deref(),
        Some("Z-code games, playable with any Z-machine interpreter.")
    );

    let tads = graph.directory_by_name("if-archive/games/tads").unwrap();
    assert_eq!(
        short_description(tads, None).as_deref(),
        Some("Games of all kinds, sorted by platform.")
    );
}

#[test]
fn long_descriptions_truncate() {
    let graph = graph();
    let spelunk = graph
        .file_by_path("if-archive/games/tads/spelunk.gam")
        .unwrap();
    let short = short_description(spelunk, Some(SHORT_DESCRIPTION_LIMIT)).unwrap();

    assert_eq!(short.chars().count(), SHORT_DESCRIPTION_LIMIT + 3);
    assert!(short.ends_with("..."));
}

#[test]
fn list_fields_merge_from_metadata() {
    let graph = graph();

    let zork = graph
        .file_by_path("if-archive/games/zcode/zork1.z3")
        .unwrap();
    assert_eq!(
        merge_list_field(zork.metadata.as_ref(), "tuid", "ifid").as_deref(),
        Some("0dbnusxunq7fw5ro zork1alt00000000")
    );

    let advent = graph
        .file_by_path("if-archive/games/zcode/advent.z5")
        .unwrap();
    assert_eq!(
        merge_list_field(advent.metadata.as_ref(), "tuid", "ifid").as_deref(),
        Some("fft0gvbsp9aq6wk0 ZCODE-5-961209-6D41")
    );

    let readme = graph.file_by_path("if-archive/info/README.txt").unwrap();
    assert_eq!(merge_list_field(readme.metadata.as_ref(), "tuid", "ifid"), None);
}

#[test]
fn scalar_fields_round_out_records() {
    let graph = graph();
    let advent = graph
        .file_by_path("if-archive/games/zcode/advent.z5")
        .unwrap();

    assert_eq!(advent.size, Some(135_168));
    assert_eq!(advent.raw_date, Some(946_684_800));
    assert_eq!(advent.date.as_deref(), Some("01-Jan-2000"));
    assert_eq!(
        advent.checksum_primary.as_deref(),
        Some("0cc175b9c0f1b6a831c399e269772661")
    );
    assert!(advent.checksum_secondary.is_some());

    let games = graph.directory_by_name("if-archive/games").unwrap();
    assert_eq!(games.subdir_count, Some(2));
    assert_eq!(games.file_count, Some(1));
}
