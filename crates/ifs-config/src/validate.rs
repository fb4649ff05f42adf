//! Configuration validation.
//!
//! Settings that make the system unusable are errors. Conditions worth telling
//! the user about but not fatal, such as a missing master index, are warnings.

use std::fmt;

use crate::{Config, ConfigError};

/// Stemmer languages supported by the text analyzer.
pub const STEMMER_LANGUAGES: &[&str] = &[
    "arabic",
    "danish",
    "dutch",
    "english",
    "finnish",
    "french",
    "german",
    "greek",
    "hungarian",
    "italian",
    "norwegian",
    "portuguese",
    "romanian",
    "russian",
    "spanish",
    "swedish",
    "tamil",
    "turkish",
];

/// Most metadata keys the identifier field merges.
const MAX_TUID_KEYS: usize = 2;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The master index file does not exist.
    MasterIndexMissing {
        /// Configured path.
        path: String,
    },
    /// The index directory has not been built yet.
    IndexMissing {
        /// Configured path.
        path: String,
    },
    /// No configuration file was found; defaults are in effect.
    NoConfigFile,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MasterIndexMissing { path } => {
                write!(f, "master index does not exist: {path}")
            }
            Self::IndexMissing { path } => {
                write!(f, "search index not built yet: {path} (run `ifsearch build --create`)")
            }
            Self::NoConfigFile => write!(f, "no configuration file found, using defaults"),
        }
    }
}

/// Rejects settings the system cannot operate with.
pub fn validate_settings(config: &Config) -> Result<(), ConfigError> {
    let stemmer = config.search.stemmer.to_lowercase();
    if !STEMMER_LANGUAGES.contains(&stemmer.as_str()) {
        return Err(ConfigError::UnknownStemmer {
            name: config.search.stemmer.clone(),
        });
    }

    if config.search.page_length == 0 {
        return Err(ConfigError::ZeroPageLength);
    }

    match config.index.tuid_keys.len() {
        0 => Err(ConfigError::NoTuidKeys),
        count if count > MAX_TUID_KEYS => Err(ConfigError::TooManyTuidKeys { count }),
        _ => Ok(()),
    }
}

/// Checks the configured locations and returns any warnings.
pub fn check_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.config_file.is_none() {
        warnings.push(ConfigWarning::NoConfigFile);
    }

    if !config.archive.master_index.is_file() {
        warnings.push(ConfigWarning::MasterIndexMissing {
            path: config.archive.master_index.display().to_string(),
        });
    }

    if !config.archive.index_dir.join("meta.json").is_file() {
        warnings.push(ConfigWarning::IndexMissing {
            path: config.archive.index_dir.display().to_string(),
        });
    }

    warnings
}
