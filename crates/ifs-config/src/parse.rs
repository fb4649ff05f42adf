//! Configuration file parsing.
//!
//! Parses `.ifsearch.toml` files into intermediate `RawConfig` structures that
//! keep every field optional until defaults are applied.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional; missing values fall back to defaults when the
/// configuration is resolved. This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Archive input and index location.
    pub archive: Option<RawArchiveSettings>,
    /// Query execution settings.
    pub search: Option<RawSearchSettings>,
    /// Index construction settings.
    pub index: Option<RawIndexSettings>,
}

/// Raw `[archive]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawArchiveSettings {
    /// Path to the master index XML file.
    pub master_index: Option<String>,
    /// Name of the archive's top-level directory.
    pub root: Option<String>,
    /// Directory holding the search index.
    pub index_dir: Option<String>,
}

/// Raw `[search]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Stemming language.
    pub stemmer: Option<String>,
    /// Results per page when the caller gives none.
    pub page_length: Option<usize>,
    /// Wall-clock budget for one query, in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Maximum edit distance for spelling suggestions.
    pub fuzzy_distance: Option<u8>,
}

/// Raw `[index]` section.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIndexSettings {
    /// Metadata keys merged into the `tuid` field.
    /// Accepts either a single string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub tuid_keys: Option<Vec<String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}
