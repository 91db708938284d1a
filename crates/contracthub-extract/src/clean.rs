//! Text normalization applied to every extraction result.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Page \d+ of \d+").expect("valid page marker regex"));

/// Collapse whitespace runs to one space, strip `Page N of M` markers,
/// normalize line endings, and trim.
pub fn clean_text(raw: &str) -> String {
    let text = WHITESPACE.replace_all(raw, " ");
    let text = PAGE_MARKER.replace_all(&text, "");
    text.replace('\u{c}', "\n")
        .replace("\r\n", "\n")
        .trim()
        .to_string()
}
