//! Implementation of `ifsearch config`.

use std::process::ExitCode;

use ifs_highlight::Highlighter;

use crate::cli::context::CommandContext;

/// Shows effective configuration settings and any warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    match &config.config_file {
        Some(path) => println!("# {}", path.display()),
        None => println!("# defaults"),
    }

    let toml = config.settings_to_toml();
    if ctx.styler.is_enabled() {
        print!("{}", Highlighter::new().highlight_toml(&toml));
    } else {
        print!("{toml}");
    }

    for warning in config.validate() {
        ctx.warning(&warning.to_string());
    }

    ExitCode::SUCCESS
}
