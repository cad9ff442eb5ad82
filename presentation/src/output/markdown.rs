//! Markdown cleanup for plain-terminal display.
//!
//! The coach answers in light markdown. A terminal shows the markers
//! literally, so they are stripped before printing a complete reply.

use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").expect("valid regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+)\*\*|__([^_\n]+)__").expect("valid regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s][^*\n]*)\*").expect("valid regex"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("valid regex"));
static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("valid regex"));

/// Strip heading, emphasis and inline-code markers and squeeze blank lines.
///
/// List bullets (`* item`, `- item`) are left alone.
pub fn clean_markdown(text: &str) -> String {
    let text = HEADING.replace_all(text, "");
    let text = BOLD.replace_all(&text, "$1$2");
    let text = ITALIC.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}
