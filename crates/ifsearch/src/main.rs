//! Command-line interface for the `ifsearch` archive search tool.

use std::process::ExitCode;

use ifsearch::cli::{CommandContext, args::parse_cli, commands, logging};

fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init(cli.verbose);

    let mut ctx = match CommandContext::load(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &mut ctx)
}
