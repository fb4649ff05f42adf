//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use ifs_config::Config;
use ifs_highlight::Styler;
use ifs_index::{HandlePool, QueryExecutor, SearchIndex};
use tracing::debug;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (defaults if no config file was found).
    pub config: Config,
    /// Styling for standard output.
    pub styler: Styler,
    /// Styling for standard error.
    pub err_styler: Styler,
    /// Index opened for this invocation.
    index: Option<SearchIndex>,
}

impl CommandContext {
    /// Loads the working directory and configuration.
    ///
    /// An explicit `config_file` replaces discovery. Relative paths are taken
    /// from the working directory.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = match config_file {
            Some(path) => Config::load_file(&cwd.join(path)),
            None => Config::load(&cwd),
        }
        .map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::FAILURE
        })?;

        match &config.config_file {
            Some(path) => debug!(path = %path.display(), "loaded configuration"),
            None => debug!("no configuration file, using defaults"),
        }

        Ok(Self {
            cwd,
            config,
            styler: Styler::for_stdout(),
            err_styler: Styler::for_stderr(),
            index: None,
        })
    }

    /// Prints an error line to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{} {message}", self.err_styler.error("error:"));
    }

    /// Prints a warning line to stderr.
    pub fn warning(&self, message: &str) {
        eprintln!("{} {message}", self.err_styler.warning("warning:"));
    }

    /// Returns the search index, opening it on first use.
    pub fn index(&mut self) -> Result<&SearchIndex, ExitCode> {
        if self.index.is_none() {
            let index = SearchIndex::open_with_config(&self.config).map_err(|e| {
                self.error(&e.to_string());
                ExitCode::FAILURE
            })?;
            self.index = Some(index);
        }
        Ok(self.index.as_ref().expect("index just opened"))
    }

    /// Opens the index and returns a handle pool plus an executor for it.
    pub fn executor(&mut self) -> Result<(HandlePool, QueryExecutor), ExitCode> {
        let index = self.index()?.clone();
        let executor = QueryExecutor::with_config(&index, &self.config);
        Ok((HandlePool::new(index), executor))
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}
