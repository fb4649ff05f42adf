//! Configuration system for ifsearch.
//!
//! ifsearch uses a TOML configuration file named `.ifsearch.toml`. The nearest
//! such file at or above the working directory applies, with `~/.ifsearch.toml`
//! as a fallback. Relative paths in the file resolve against the directory the
//! file lives in. Every setting has a default, so no file is required.

#![warn(missing_docs)]

mod discovery;
mod error;
mod parse;
mod resolve;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub use discovery::{CONFIG_FILENAME, discover_config_file, global_config_path, is_global_config};
pub use error::ConfigError;
pub use parse::{
    RawArchiveSettings, RawConfig, RawIndexSettings, RawSearchSettings, parse_config_file,
    parse_config_str,
};
pub use resolve::resolve_path;
use serde::Serialize;
pub use validate::{ConfigWarning, STEMMER_LANGUAGES, check_config, validate_settings};

/// Default master index location, relative to the configuration directory.
pub const DEFAULT_MASTER_INDEX: &str = "Master-Index.xml";

/// Default name of the archive's top-level directory.
pub const DEFAULT_ROOT: &str = "if-archive";

/// Default index location, relative to the configuration directory.
pub const DEFAULT_INDEX_DIR: &str = "searchindex";

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Archive input and index location.
    pub archive: ArchiveSettings,
    /// Query execution settings.
    pub search: SearchSettings,
    /// Index construction settings.
    pub index: IndexSettings,
    /// The file this configuration was loaded from, if any.
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_base_dir(Path::new("."))
    }
}

impl Config {
    /// Loads the configuration that applies to `cwd`.
    ///
    /// Discovers the nearest `.ifsearch.toml` and loads it. If none exists,
    /// returns defaults with paths relative to `cwd`.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        match discover_config_file(cwd) {
            Some(path) => Self::load_file(&path),
            None => Ok(Self::with_base_dir(cwd)),
        }
    }

    /// Loads configuration from a specific file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = parse_config_file(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut config = Self::from_raw(raw, base_dir)?;
        config.config_file = Some(path.to_path_buf());
        Ok(config)
    }

    /// Applies defaults to a raw configuration and validates the result.
    ///
    /// Relative paths resolve against `base_dir`.
    pub fn from_raw(raw: RawConfig, base_dir: &Path) -> Result<Self, ConfigError> {
        let archive = raw.archive.unwrap_or_default();
        let search = raw.search.unwrap_or_default();
        let index = raw.index.unwrap_or_default();

        let search_defaults = SearchSettings::default();
        let index_defaults = IndexSettings::default();

        let config = Self {
            archive: ArchiveSettings {
                master_index: resolve_path(
                    archive.master_index.as_deref().unwrap_or(DEFAULT_MASTER_INDEX),
                    base_dir,
                )?,
                root: archive.root.unwrap_or_else(|| DEFAULT_ROOT.to_string()),
                index_dir: resolve_path(
                    archive.index_dir.as_deref().unwrap_or(DEFAULT_INDEX_DIR),
                    base_dir,
                )?,
            },
            search: SearchSettings {
                stemmer: search.stemmer.unwrap_or(search_defaults.stemmer),
                page_length: search.page_length.unwrap_or(search_defaults.page_length),
                timeout_ms: search.timeout_ms.unwrap_or(search_defaults.timeout_ms),
                fuzzy_distance: search
                    .fuzzy_distance
                    .unwrap_or(search_defaults.fuzzy_distance),
            },
            index: IndexSettings {
                tuid_keys: index.tuid_keys.unwrap_or(index_defaults.tuid_keys),
            },
            config_file: None,
        };

        validate_settings(&config)?;
        Ok(config)
    }

    /// Default configuration with paths relative to `base_dir`.
    pub fn with_base_dir(base_dir: &Path) -> Self {
        Self {
            archive: ArchiveSettings {
                master_index: base_dir.join(DEFAULT_MASTER_INDEX),
                root: DEFAULT_ROOT.to_string(),
                index_dir: base_dir.join(DEFAULT_INDEX_DIR),
            },
            search: SearchSettings::default(),
            index: IndexSettings::default(),
            config_file: None,
        }
    }

    /// Checks configured locations and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        check_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output has the same shape as a `.ifsearch.toml` file, with every
    /// path shown resolved.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            archive: &self.archive,
            search: &self.search,
            index: &self.index,
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// Archive input and index location.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveSettings {
    /// Path to the master index XML file.
    pub master_index: PathBuf,
    /// Name of the archive's top-level directory.
    pub root: String,
    /// Directory holding the search index.
    pub index_dir: PathBuf,
}

/// Query execution settings.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSettings {
    /// Stemming language.
    pub stemmer: String,
    /// Results per page when the caller gives none.
    pub page_length: usize,
    /// Wall-clock budget for one query, in milliseconds.
    pub timeout_ms: u64,
    /// Maximum edit distance for spelling suggestions.
    pub fuzzy_distance: u8,
}

impl SearchSettings {
    /// The query time budget.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            stemmer: String::from("english"),
            page_length: 20,
            timeout_ms: 2000,
            fuzzy_distance: 2,
        }
    }
}

/// Index construction settings.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSettings {
    /// Metadata keys merged, in order, into the `tuid` field.
    pub tuid_keys: Vec<String>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            tuid_keys: vec![String::from("tuid")],
        }
    }
}

/// Borrowed view of the settings for TOML output.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Archive section.
    archive: &'a ArchiveSettings,
    /// Search section.
    search: &'a SearchSettings,
    /// Index section.
    index: &'a IndexSettings,
}
