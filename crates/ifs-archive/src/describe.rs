//! Description aggregation.
//!
//! A record's searchable description is its own text followed by whatever its
//! ancestors contributed through `<parentdesc>`. The short form shown in search
//! results takes only the first available piece.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::Described;

/// Character limit for file short descriptions.
pub const SHORT_DESCRIPTION_LIMIT: usize = 300;

/// Matches a markdown inline link and captures its visible text.
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("link pattern should compile"));

/// Replaces every markdown link `[text](target)` with `text`.
///
/// Replacement repeats until nothing matches, so applying this twice gives
/// the same result as applying it once.
pub fn strip_markdown_links(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = MARKDOWN_LINK.replace_all(&current, "$1").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Collects the local description and inherited descriptions of a record.
///
/// With `include_all` false, stops at the first non-empty piece. Pieces are
/// joined with newlines after link stripping. Returns `None` if nothing was
/// collected.
pub fn aggregate_description(record: &impl Described, include_all: bool) -> Option<String> {
    let mut pieces: Vec<&str> = Vec::new();

    if let Some(local) = record.description().filter(|d| !d.is_empty()) {
        pieces.push(local);
    }

    for inherited in record.parent_descriptions().values() {
        if !include_all && !pieces.is_empty() {
            break;
        }
        if !inherited.is_empty() {
            pieces.push(inherited);
        }
    }

    if pieces.is_empty() {
        return None;
    }

    let stripped: Vec<String> = pieces.into_iter().map(strip_markdown_links).collect();
    Some(stripped.join("\n"))
}

/// Builds the short description shown in result listings.
///
/// Takes the first available description piece and trims it. When `limit` is
/// given and the text is longer than `limit` characters, it is cut there and
/// `...` is appended.
pub fn short_description(record: &impl Described, limit: Option<usize>) -> Option<String> {
    let text = aggregate_description(record, false)?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match limit {
        Some(limit) if text.chars().count() > limit => {
            let cut: String = text.chars().take(limit).collect();
            Some(format!("{cut}..."))
        }
        _ => Some(text.to_string()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::{DirectoryRecord, FileRecord};

    fn file_with(local: Option<&str>, inherited: &[(&str, &str)]) -> FileRecord {
        let mut file = FileRecord::new("if-archive/d/f", "f", "if-archive/d");
        file.description = local.map(str::to_string);
        file.parent_descriptions = inherited.iter().copied().collect();
        file
    }

    #[test]
    fn local_description_comes_first() {
        let file = file_with(Some("Local."), &[("if-archive/d", "Parent.")]);

        assert_eq!(
            aggregate_description(&file, true).as_deref(),
            Some("Local.\nParent.")
        );
        assert_eq!(aggregate_description(&file, false).as_deref(), Some("Local."));
    }

    #[test]
    fn first_found_mode_returns_first_nonempty_inherited() {
        let file = file_with(
            None,
            &[("if-archive/d", ""), ("if-archive", "Archive root.")],
        );
        assert_eq!(
            aggregate_description(&file, false).as_deref(),
            Some("Archive root.")
        );
    }

    #[test]
    fn first_found_is_prefix_of_all() {
        let file = file_with(
            Some("Own."),
            &[("a", "First."), ("b", ""), ("c", "Third.")],
        );
        let first = aggregate_description(&file, false).unwrap();
        let all = aggregate_description(&file, true).unwrap();

        assert!(all.starts_with(&first));
        assert_eq!(all, "Own.\nFirst.\nThird.");
    }

    #[test]
    fn no_descriptions_is_none() {
        let file = file_with(Some(""), &[("a", "")]);
        assert_eq!(aggregate_description(&file, true), None);
        assert_eq!(short_description(&file, None), None);
    }

    #[test]
    fn links_collapse_to_their_text() {
        let file = file_with(
            Some("See [the FAQ](https://example.org/faq) and [docs](../info/)."),
            &[],
        );
        assert_eq!(
            aggregate_description(&file, true).as_deref(),
            Some("See the FAQ and docs.")
        );
    }

    #[test]
    fn link_stripping_is_idempotent() {
        for text in [
            "plain",
            "[a](b)",
            "[[inner](x)](y)",
            "[outer [inner](x)](y) tail",
            "unbalanced [bracket](",
        ] {
            let once = strip_markdown_links(text);
            assert_eq!(strip_markdown_links(&once), once, "input: {text}");
        }
        assert_eq!(strip_markdown_links("[[inner](x)](y)"), "inner");
    }

    #[test]
    fn short_description_truncates_long_text() {
        let long = "x".repeat(301);
        let file = file_with(Some(&long), &[]);
        let short = short_description(&file, Some(SHORT_DESCRIPTION_LIMIT)).unwrap();

        assert_eq!(short.chars().count(), 303);
        assert!(short.ends_with("..."));
        assert_eq!(&short[..300], "x".repeat(300));
    }

    #[test]
    fn short_description_keeps_text_at_limit() {
        let exact = "y".repeat(300);
        let file = file_with(Some(&exact), &[]);
        assert_eq!(
            short_description(&file, Some(SHORT_DESCRIPTION_LIMIT)),
            Some(exact)
        );
    }

    #[test]
    fn short_description_counts_characters() {
        let text = "é".repeat(5);
        let file = file_with(Some(&text), &[]);
        assert_eq!(
            short_description(&file, Some(3)).as_deref(),
            Some("ééé...")
        );
    }

    #[test]
    fn short_description_trims_whitespace() {
        let file = file_with(Some("   \n  "), &[("a", "  Inherited.  ")]);
        // The local piece is whitespace, not empty, so it wins first-found mode.
        assert_eq!(short_description(&file, None), None);

        let file = file_with(None, &[("a", "  Inherited.  ")]);
        assert_eq!(short_description(&file, None).as_deref(), Some("Inherited."));
    }

    #[test]
    fn directories_are_not_truncated_without_limit() {
        let mut dir = DirectoryRecord::new("if-archive/games", "if-archive");
        dir.description = Some("z".repeat(500));
        assert_eq!(short_description(&dir, None).map(|s| s.len()), Some(500));
    }
}
