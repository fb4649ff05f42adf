//! Terminal styling for ifsearch output.
//!
//! [`Styler`] wraps text in ANSI styles when writing to a terminal and leaves
//! it untouched otherwise, so piped output and tests see plain text.
//! [`Highlighter`] colors TOML for the `config` command.

#![warn(missing_docs)]

use std::{
    env,
    io::{self, IsTerminal},
};

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// ANSI escape codes.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text.
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow text.
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text.
    pub const RED: &str = "\x1b[31m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Applies ANSI styles, or nothing when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styler {
    /// Whether escapes are emitted.
    enabled: bool,
}

impl Styler {
    /// A styler that emits escapes only if `enabled`.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A styler that emits escapes when stdout is a terminal and `NO_COLOR`
    /// is unset.
    pub fn for_stdout() -> Self {
        Self::new(io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none())
    }

    /// A styler that emits escapes when stderr is a terminal and `NO_COLOR`
    /// is unset.
    pub fn for_stderr() -> Self {
        Self::new(io::stderr().is_terminal() && env::var_os("NO_COLOR").is_none())
    }

    /// Returns true if escapes are emitted.
    pub fn is_enabled(self) -> bool {
        self.enabled
    }

    /// Wraps `text` in the given codes.
    fn paint(self, codes: &[&str], text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        format!("{}{text}{}", codes.concat(), colors::RESET)
    }

    /// Bold cyan, for section headers.
    pub fn header(self, text: &str) -> String {
        self.paint(&[colors::BOLD, colors::CYAN], text)
    }

    /// Bold, for result paths and record names.
    pub fn strong(self, text: &str) -> String {
        self.paint(&[colors::BOLD], text)
    }

    /// Dimmed, for secondary details.
    pub fn dim(self, text: &str) -> String {
        self.paint(&[colors::DIM], text)
    }

    /// Yellow, for suggestions and warnings.
    pub fn warning(self, text: &str) -> String {
        self.paint(&[colors::YELLOW], text)
    }

    /// Red, for errors.
    pub fn error(self, text: &str) -> String {
        self.paint(&[colors::RED], text)
    }
}

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including TOML.
    syntax_set: SyntaxSet,
    /// Embedded color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme to use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Nord theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Nord,
        }
    }

    /// Highlights TOML content for terminal output.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights content with the syntax registered for `extension`.
    ///
    /// Unknown syntaxes are rendered as plain text, still reset at the end.
    pub fn highlight(&self, content: &str, extension: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(extension)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::with_capacity(content.len() * 2);
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}
