//! Clap argument definitions for the `ifsearch` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "ifsearch", version)]
#[command(about = "Search the Interactive Fiction Archive master index")]
pub struct Cli {
    /// Configuration file to use instead of the nearest .ifsearch.toml
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `ifsearch build`.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildCommand {
    /// Clear the index directory and create a fresh index with the current schema
    #[arg(long)]
    pub create: bool,
}

/// Arguments for `ifsearch search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Results per page [default: 20]
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// Page of results to show
    #[arg(short = 'p', long, default_value = "1")]
    pub page: usize,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `ifsearch show`.
#[derive(Args, Debug, Clone)]
pub struct ShowCommand {
    /// Directory or file path, with or without the archive root prefix
    pub path: String,
}

/// Supported `ifsearch` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Build or rebuild the search index from the master index
    Build(BuildCommand),

    /// Search the index and print one page of results
    #[command(after_help = "\
QUERY SYNTAX:
  term              Term must appear in the description
  term1 term2       Both terms (implicit AND)
  \"phrase\"          Exact phrase match
  term1 OR term2    Either term
  -term             Term must NOT appear
  (expr)            Grouping

FIELD QUERIES:
  name:advent.z5    Exact file or directory name
  path:games/zcode  Exact path below the archive root
  dir:zcode         Any directory segment
  tuid:abc123       Identifier from metadata
  size:[0 TO 1000]  File size range in bytes

EXAMPLES:
  ifsearch search cave
  ifsearch search '\"colossal cave\"'
  ifsearch search 'dir:zcode adventure' --page 2
  ifsearch search 'tuid:fft0gvbsp9aq6wk0' --json")]
    Search(SearchCommand),

    /// Show a directory or file record from the master index
    Show(ShowCommand),

    /// Show effective configuration settings
    Config,
}

/// Parses CLI arguments, exiting with usage on error.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
