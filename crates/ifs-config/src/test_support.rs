//! Scratch archive layouts for ifs-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{DEFAULT_INDEX_DIR, DEFAULT_MASTER_INDEX, discovery::CONFIG_FILENAME};

/// A temporary directory laid out like an archive checkout.
pub struct ScratchArchive {
    /// Owns the directory; removed on drop.
    root: TempDir,
}

impl ScratchArchive {
    /// An empty scratch directory.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// The scratch root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates `rel` (and its parents) below the root.
    pub fn subdir(&self, rel: &str) -> PathBuf {
        let path = self.root.path().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes `.ifsearch.toml` into `rel`; an empty `rel` means the root.
    pub fn write_config(&self, rel: &str, contents: &str) -> PathBuf {
        let config = self.subdir(rel).join(CONFIG_FILENAME);
        fs::write(&config, contents).unwrap();
        config
    }

    /// Writes an empty master index at the default location.
    pub fn write_master_index(&self) -> PathBuf {
        let path = self.root.path().join(DEFAULT_MASTER_INDEX);
        fs::write(&path, "<ifarchive/>").unwrap();
        path
    }

    /// Creates the default index directory with a stand-in commit file.
    pub fn write_index_meta(&self) -> PathBuf {
        let dir = self.subdir(DEFAULT_INDEX_DIR);
        fs::write(dir.join("meta.json"), "{}").unwrap();
        dir
    }
}
