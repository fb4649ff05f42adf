//! Implementation of `ifsearch build`.

use std::process::ExitCode;

use ifs_index::{BuildMode, BuildStats, IndexBuilder, ProgressReporter};
use tracing::{debug, info};

use crate::cli::{args::BuildCommand, context::CommandContext};

/// How often progress is logged while adding documents.
const PROGRESS_INTERVAL: usize = 1000;

/// Reports build progress through the log.
struct LogReporter;

impl ProgressReporter for LogReporter {
    fn on_parsed(&mut self, directories: usize, files: usize) {
        info!(directories, files, "master index parsed");
    }

    fn on_document(&mut self, path: &str, current: usize, total: usize) {
        if current % PROGRESS_INTERVAL == 0 || current == total {
            debug!(path, current, total, "indexing");
        }
    }

    fn on_complete(&mut self, stats: &BuildStats) {
        debug!(
            symlinks_skipped = stats.symlinks_skipped,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "build finished"
        );
    }
}

/// Builds the index from the configured master index.
pub fn run(ctx: &CommandContext, cmd: &BuildCommand) -> ExitCode {
    let mode = if cmd.create {
        println!("Creating index from scratch...");
        BuildMode::Create
    } else {
        println!("Rebuilding index...");
        BuildMode::Rebuild
    };

    match IndexBuilder::new(&ctx.config).build(mode, &mut LogReporter) {
        Ok(stats) => {
            println!("Indexed {} items", stats.documents);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ctx.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
