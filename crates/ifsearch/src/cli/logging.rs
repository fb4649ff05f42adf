//! Diagnostic logging to stderr.
//!
//! Library crates emit `tracing` events; the binary decides what is shown.
//! `IFSEARCH_LOG` takes an `EnvFilter` directive such as `ifs_index=debug`.
//! Without it, `-v` flags raise the level from the default of `warn`.

use std::io;

use ifs_highlight::Styler;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "IFSEARCH_LOG";

/// Level directive for a `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter from `IFSEARCH_LOG` when it is set and valid, else from `verbose`.
pub fn build_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)))
}

/// Installs the stderr subscriber.
pub fn init(verbose: u8) {
    let installed = fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(io::stderr)
        .with_ansi(Styler::for_stderr().is_enabled())
        .with_target(false)
        .try_init();
    if let Err(e) = installed {
        eprintln!("warning: logging unavailable: {e}");
    }
}
