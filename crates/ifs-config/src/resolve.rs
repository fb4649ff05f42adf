//! Resolution of configured file locations.
//!
//! The master index and index directory may be written relative to the
//! configuration file, absolute, or under `~`. Neither has to exist yet.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Turns a configured location into a usable path.
///
/// `~` and `~/...` expand under the home directory, absolute paths pass
/// through, and anything else is taken relative to `base_dir`.
pub fn resolve_path(path: &str, base_dir: &Path) -> Result<PathBuf, ConfigError> {
    let under_home = match path {
        "~" => Some(""),
        _ => path.strip_prefix("~/"),
    };

    let located = match under_home {
        Some(rest) => home()?.join(rest),
        None => PathBuf::from(path),
    };

    Ok(if located.is_absolute() {
        located
    } else {
        base_dir.join(located)
    })
}

/// The user's home directory.
fn home() -> Result<PathBuf, ConfigError> {
    let dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(dirs.home_dir().to_path_buf())
}
