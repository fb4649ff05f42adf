//! Configuration file discovery.
//!
//! Finds the `.ifsearch.toml` closest to a starting directory by walking up the
//! tree, falling back to the global `~/.ifsearch.toml`.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".ifsearch.toml";

/// Discovers the configuration file that applies to `cwd`.
///
/// The nearest `.ifsearch.toml` at or above `cwd` wins. If there is none, the
/// global `~/.ifsearch.toml` is used when it exists. Returns `None` when no
/// configuration file is found, in which case defaults apply.
pub fn discover_config_file(cwd: &Path) -> Option<PathBuf> {
    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    global_config_path().filter(|path| path.is_file())
}

/// Returns the path to the global configuration file (`~/.ifsearch.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::ScratchArchive;

    #[test]
    fn test_discover_no_config() {
        let archive = ScratchArchive::new();
        let subdir = archive.subdir("a/b/c");

        // Only the global config may be found
        if let Some(found) = discover_config_file(&subdir) {
            assert!(
                is_global_config(&found) || !found.starts_with(archive.path()),
                "unexpected config: {found:?}"
            );
        }
    }

    #[test]
    fn test_discover_nearest_wins() {
        let archive = ScratchArchive::new();
        let _outer = archive.write_config("", "[search]\npage_length = 5\n");
        let inner = archive.write_config("a/b", "[search]\npage_length = 7\n");
        let working_dir = archive.subdir("a/b/c/d");

        assert_eq!(discover_config_file(&working_dir), Some(inner));
    }

    #[test]
    fn test_discover_from_directory_with_config() {
        let archive = ScratchArchive::new();
        let config = archive.write_config("", "");

        assert_eq!(discover_config_file(archive.path()), Some(config));
    }

    #[test]
    fn test_discover_skips_non_file_config() {
        let archive = ScratchArchive::new();
        let fake_config = archive.path().join(CONFIG_FILENAME);
        fs::create_dir_all(&fake_config).unwrap();
        let subdir = archive.subdir("subdir");

        let found = discover_config_file(&subdir);
        assert_ne!(found, Some(fake_config));
    }

    #[test]
    fn test_is_global_config() {
        let global = global_config_path().unwrap();
        assert!(is_global_config(&global));
        assert!(!is_global_config(Path::new("/some/other/path/.ifsearch.toml")));
    }
}
