use crate::normalize::clean_citation_text;
use crate::types::CitationRecord;
use regex::Regex;
use std::sync::LazyLock;

pub mod archival;
pub mod book;
pub mod common;
pub mod journal;
pub mod legal;
pub mod medical;
pub mod transcript;

static TRAILING_PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,.]\s*(\d+[-–]?\d*)\.?$").unwrap());

/// Outcome of a type-specific matcher. `Faulted` means the matcher claimed
/// the text but could not assemble a record from it; the cascade logs that
/// and keeps going instead of failing the note.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(CitationRecord),
    NoMatch,
    Faulted(String),
}

type MatcherFn = fn(&str) -> MatchOutcome;

/// Priority order matters: archival and transcript locators would otherwise
/// be swallowed by the looser book and journal shapes further down.
const MATCHERS: &[(&str, MatcherFn)] = &[
    ("archival", archival::match_citation),
    ("transcript", transcript::match_citation),
    ("legal", legal::match_citation),
    ("medical", medical::match_citation),
    ("book", book::match_citation),
];

/// Classifies one note: normalize, peel off a trailing page reference, then
/// try each matcher in priority order. The journal/generic fallback always
/// produces a record, so every note parses to something.
pub fn parse_citation(raw: &str) -> CitationRecord {
    let cleaned = clean_citation_text(raw);
    let (text, page) = extract_trailing_page(&cleaned);

    for (label, matcher) in MATCHERS {
        match matcher(&text) {
            MatchOutcome::Matched(mut record) => {
                record.page = page.clone();
                return record;
            }
            MatchOutcome::NoMatch => {}
            MatchOutcome::Faulted(reason) => {
                tracing::warn!("{label} matcher faulted, continuing cascade: {reason}");
            }
        }
    }

    let mut record = journal::parse_fallback(&text);
    record.page = page;
    record
}

/// Splits "…, 45." style endings into (text, page). The page may be a range;
/// ranges already use an en dash after normalization.
fn extract_trailing_page(text: &str) -> (String, Option<String>) {
    if let Some(caps) = TRAILING_PAGE_RE.captures(text) {
        if let (Some(whole), Some(page)) = (caps.get(0), caps.get(1)) {
            let rest = text[..whole.start()].trim().trim_end_matches(['.', ',']);
            return (rest.to_string(), Some(page.as_str().to_string()));
        }
    }
    (text.to_string(), None)
}
