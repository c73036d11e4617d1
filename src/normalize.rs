use regex::Regex;
use std::sync::LazyLock;

static PAGE_ABBREV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\s(,])pp?\.\s*(\d)").unwrap());
static NUMERIC_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)-(\d)").unwrap());

/// Normalizes a raw note before any matching: drops "p."/"pp." prefixes that
/// sit between a separator and a digit, rewrites numeric ranges to use an en
/// dash, and trims surrounding whitespace.
pub fn clean_citation_text(text: &str) -> String {
    let text = PAGE_ABBREV_RE.replace_all(text, "${1}${2}");
    let text = NUMERIC_RANGE_RE.replace_all(&text, "${1}–${2}");
    text.trim().to_string()
}
