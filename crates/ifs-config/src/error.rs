//! Error types for ifsearch configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// The configured stemmer language is not supported.
    #[error("unsupported stemmer language: {name}")]
    UnknownStemmer {
        /// The configured name.
        name: String,
    },

    /// The default page length is zero.
    #[error("search.page_length must be at least 1")]
    ZeroPageLength,

    /// No metadata keys were configured for the identifier field.
    #[error("index.tuid_keys must name at least one metadata key")]
    NoTuidKeys,

    /// Too many metadata keys were configured for the identifier field.
    #[error("index.tuid_keys accepts at most two keys, got {count}")]
    TooManyTuidKeys {
        /// Number of keys configured.
        count: usize,
    },

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}
