//! Integration tests for ifs-index over the shared master index fixture.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::PathBuf};

use ifs_config::Config;
use ifs_index::{
    ArchiveDocument, BuildMode, DocumentKind, IndexBuilder, QueryExecutor, QueryOutcome,
    ResultPage, SearchIndex, SilentReporter,
};
use tempfile::TempDir;

/// Path of the fixture shipped with ifs-archive.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../ifs-archive/tests/fixtures/Master-Index.xml")
}

/// A scratch directory holding a copy of the fixture and its index.
struct Archive {
    _temp: TempDir,
    config: Config,
}

impl Archive {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::copy(fixture_path(), temp.path().join("Master-Index.xml")).unwrap();
        let config = Config::with_base_dir(temp.path());
        Self {
            _temp: temp,
            config,
        }
    }

    fn built() -> Self {
        let archive = Self::new();
        IndexBuilder::new(&archive.config)
            .build(BuildMode::Create, &mut SilentReporter)
            .unwrap();
        archive
    }

    fn documents(&self) -> Vec<ArchiveDocument> {
        IndexBuilder::new(&self.config).produce().unwrap().1
    }

    fn search(&self, text: &str, page: usize, page_length: usize) -> ResultPage {
        let index = SearchIndex::open_with_config(&self.config).unwrap();
        let executor = QueryExecutor::with_config(&index, &self.config);
        let handle = index.handle().unwrap();
        match executor.execute(&handle, text, page, page_length).unwrap() {
            QueryOutcome::Completed(page) => page,
            other => panic!("query {text:?} did not complete: {other:?}"),
        }
    }
}

fn sorted_paths(page: &ResultPage) -> Vec<&str> {
    let mut paths: Vec<&str> = page.hits.iter().map(|h| h.path.as_str()).collect();
    paths.sort_unstable();
    paths
}

#[test]
fn build_indexes_every_non_symlink_record() {
    let archive = Archive::new();
    let stats = IndexBuilder::new(&archive.config)
        .build(BuildMode::Create, &mut SilentReporter)
        .unwrap();

    assert_eq!(stats.directories, 4);
    assert_eq!(stats.files, 6);
    assert_eq!(stats.symlinks_skipped, 2);
    assert_eq!(stats.documents, 10);

    let index = SearchIndex::open_with_config(&archive.config).unwrap();
    assert_eq!(index.num_docs().unwrap(), 10);
}

#[test]
fn documents_follow_directories_then_files() {
    let archive = Archive::new();
    let docs = archive.documents();
    let kinds: Vec<DocumentKind> = docs.iter().map(|d| d.kind).collect();

    assert_eq!(kinds[..4], [DocumentKind::Directory; 4]);
    assert!(kinds[4..].iter().all(|k| *k == DocumentKind::File));
    assert!(docs.iter().all(|d| !d.path.starts_with("if-archive")));
    assert!(docs.iter().all(|d| d.name != "latest.z5" && d.name != "current"));
}

#[test]
fn short_descriptions() {
    let archive = Archive::new();
    let docs = archive.documents();
    let short = |path: &str| {
        docs.iter()
            .find(|d| d.path == path)
            .unwrap()
            .short_description
            .clone()
    };

    // Inherited-only directory description
    assert_eq!(
        short("games/tads").as_deref(),
        Some("Games of all kinds, sorted by platform.")
    );
    // File with nothing of its own falls back to its directory
    assert_eq!(
        short("games/tads/nodesc.gam").as_deref(),
        Some("Games of all kinds, sorted by platform.")
    );
    // Root-level files get no fallback
    assert_eq!(short("ls-lR"), None);

    let long = short("games/tads/spelunk.gam").unwrap();
    assert!(long.ends_with("..."));
    assert_eq!(long.chars().count(), 303);
}

#[test]
fn tuid_merges_every_value() {
    let archive = Archive::new();
    let docs = archive.documents();
    let zork = docs.iter().find(|d| d.name == "zork1.z3").unwrap();
    assert_eq!(zork.tuid.as_deref(), Some("0dbnusxunq7fw5ro zork1alt00000000"));
    assert_eq!(zork.dir.as_deref(), Some("games,zcode"));
}

#[test]
fn keyword_search() {
    let archive = Archive::built();

    let page = archive.search("cave", 1, 10);
    assert_eq!(
        sorted_paths(&page),
        vec!["games/tads/spelunk.gam", "games/zcode/advent.z5"]
    );

    let page = archive.search("cave adventure", 1, 10);
    assert_eq!(sorted_paths(&page), vec!["games/zcode/advent.z5"]);
}

#[test]
fn search_pages_through_matches() {
    let archive = Archive::built();

    let page = archive.search("games", 2, 4);
    assert_eq!(page.total, 6);
    assert_eq!(page.hits.len(), 2);
    assert_eq!(page.page_count(), 2);
    assert_eq!(page.show_min(), 5);
    assert_eq!(page.show_max(), 6);
    assert!(page.is_paginated());
}

#[test]
fn field_queries() {
    let archive = Archive::built();

    let page = archive.search("dir:zcode", 1, 10);
    assert_eq!(
        sorted_paths(&page),
        vec!["games/zcode", "games/zcode/advent.z5", "games/zcode/zork1.z3"]
    );

    let page = archive.search("tuid:zork1alt00000000", 1, 10);
    assert_eq!(sorted_paths(&page), vec!["games/zcode/zork1.z3"]);

    let page = archive.search("size:[100000 TO 200000]", 1, 10);
    assert_eq!(sorted_paths(&page), vec!["games/zcode/advent.z5"]);
}

#[test]
fn misspelling_gets_suggestion() {
    let archive = Archive::built();

    let page = archive.search("advnture", 1, 10);
    assert_eq!(page.total, 0);
    assert_eq!(page.suggestion.as_deref(), Some("adventure"));

    let page = archive.search("cave", 1, 10);
    assert!(page.suggestion.is_none());
}

#[test]
fn custom_tuid_keys_are_indexed() {
    let temp = TempDir::new().unwrap();
    fs::copy(fixture_path(), temp.path().join("Master-Index.xml")).unwrap();
    fs::write(
        temp.path().join(".ifsearch.toml"),
        "[index]\ntuid_keys = [\"tuid\", \"ifid\"]\n",
    )
    .unwrap();
    let config = Config::load(temp.path()).unwrap();
    IndexBuilder::new(&config)
        .build(BuildMode::Create, &mut SilentReporter)
        .unwrap();

    let index = SearchIndex::open_with_config(&config).unwrap();
    let executor = QueryExecutor::with_config(&index, &config);
    let handle = index.handle().unwrap();
    let QueryOutcome::Completed(page) = executor
        .execute(&handle, "tuid:\"ZCODE-5-961209-6D41\"", 1, 10)
        .unwrap()
    else {
        panic!("query did not complete");
    };
    assert_eq!(page.hits[0].path, "games/zcode/advent.z5");
}
