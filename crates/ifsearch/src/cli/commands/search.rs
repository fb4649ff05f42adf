//! Implementation of `ifsearch search`.

use std::process::ExitCode;

use ifs_index::QueryOutcome;

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{render_json, render_page},
};

/// Searches the index and prints one page of results.
pub fn run(ctx: &mut CommandContext, cmd: &SearchCommand) -> ExitCode {
    let (pool, executor) = match ctx.executor() {
        Ok(pair) => pair,
        Err(code) => return code,
    };

    let outcome = pool
        .checkout()
        .and_then(|handle| executor.execute(&handle, &cmd.query, cmd.page, cmd.limit.unwrap_or(0)));

    let page = match outcome {
        Ok(QueryOutcome::Completed(page)) => page,
        Ok(QueryOutcome::TimedOut) => {
            ctx.error("search timed out");
            return ExitCode::FAILURE;
        }
        Ok(QueryOutcome::ParseFailed { message }) => {
            ctx.error(&format!("query parse failed ({message})"));
            return ExitCode::FAILURE;
        }
        Err(e) => {
            ctx.error(&format!("search failed: {e}"));
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        match render_json(&page) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                ctx.error(&format!("failed to serialize JSON: {e}"));
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    print!("{}", render_page(&page, ctx.styler));
    ExitCode::SUCCESS
}
