//! Rendering and JSON serialization for search results.

use ifs_highlight::Styler;
use ifs_index::{ResultPage, SearchHit};
use serde::Serialize;

/// How hit dates are printed.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// JSON output for `ifsearch search --json`.
#[derive(Serialize)]
struct JsonResultPage<'a> {
    /// The page itself.
    #[serde(flatten)]
    page: &'a ResultPage,
    /// Number of pages needed for all matches.
    page_count: usize,
}

/// The `Did you mean` line for a suggestion.
pub fn suggestion_line(suggestion: &str) -> String {
    format!("Did you mean: \"{suggestion}\"")
}

/// The line introducing a non-empty page.
///
/// The page position is included only when matches span several pages.
pub fn summary_line(page: &ResultPage) -> String {
    let position = if page.is_paginated() {
        format!(
            "page {} ({}-{}) of ",
            page.window.page,
            page.show_min(),
            page.show_max()
        )
    } else {
        String::new()
    };
    format!(
        "Showing {position}{} results in {:.4} sec:",
        page.total,
        page.elapsed.as_secs_f64()
    )
}

/// The `* path  (type: date)` line for one hit.
pub fn hit_heading(hit: &SearchHit, styler: Styler) -> String {
    let tag = match hit.date {
        Some(date) => format!("({}: {})", hit.kind, date.format(DATE_FORMAT)),
        None => format!("({})", hit.kind),
    };
    format!("* {}  {}", styler.strong(&hit.path), styler.dim(&tag))
}

/// Renders a completed page as text.
pub fn render_page(page: &ResultPage, styler: Styler) -> String {
    let mut out = String::new();

    if let Some(suggestion) = &page.suggestion {
        out.push_str(&styler.warning(&suggestion_line(suggestion)));
        out.push('\n');
    }

    if page.total == 0 {
        out.push_str("No results\n");
        return out;
    }

    out.push_str(&styler.header(&summary_line(page)));
    out.push_str("\n\n");

    for hit in &page.hits {
        out.push_str(&hit_heading(hit, styler));
        out.push('\n');
        if let Some(desc) = &hit.short_description {
            out.push_str(&desc.replace('\n', " "));
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// Serializes a completed page as pretty JSON.
pub fn render_json(page: &ResultPage) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonResultPage {
        page,
        page_count: page.page_count(),
    })
}
