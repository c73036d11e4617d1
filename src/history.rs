use crate::fingerprint::fingerprint;
use crate::matchers::parse_citation;
use crate::normalize::clean_citation_text;
use crate::types::{CitationKind, CitationRecord};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static LEADING_ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(The|A|An)\s+").unwrap());

/// What `process_detailed` reports for one note, for callers that surface
/// per-note results (preview, inspection) rather than just the text.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedNote {
    pub formatted: String,
    pub kind: CitationKind,
    pub fingerprint: Option<String>,
}

/// Ibid/short/full decision state for one document conversion. Notes must
/// arrive in ascending numeric id order; the adjacency rule reads the most
/// recent entry, so reordering or reusing an engine across documents would
/// corrupt every decision after the first.
#[derive(Debug, Default)]
pub struct CitationHistory {
    entries: Vec<CitationRecord>,
    seen_works: HashMap<Option<String>, CitationRecord>,
}

impl CitationHistory {
    pub fn new() -> Self {
        CitationHistory::default()
    }

    /// Formats one note in document order: "Ibid." when the previous note
    /// cites the same work, a short note when the work was seen earlier, a
    /// full note the first time. Notes with neither author nor title pass
    /// through as normalized text and leave the history untouched.
    pub fn process(&mut self, raw_text: &str) -> String {
        self.process_detailed(raw_text).formatted
    }

    pub fn process_detailed(&mut self, raw_text: &str) -> ProcessedNote {
        let mut record = parse_citation(raw_text);
        if record.title.is_none() && record.author.is_none() {
            return ProcessedNote {
                formatted: clean_citation_text(raw_text),
                kind: record.kind,
                fingerprint: None,
            };
        }

        let key = fingerprint(record.author.as_deref(), record.title.as_deref());

        let formatted = if self.entries.last().is_some_and(|prev| prev.fingerprint == key) {
            with_page("Ibid.".to_string(), record.page.as_deref())
        } else if let Some(first_seen) = self.seen_works.get(&key) {
            with_page(short_note(&record, first_seen), record.page.as_deref())
        } else {
            let full = full_note(&record);
            self.seen_works.insert(key.clone(), record.clone());
            with_page(full, record.page.as_deref())
        };

        let kind = record.kind;
        record.fingerprint = key.clone();
        self.entries.push(record);
        ProcessedNote {
            formatted,
            kind,
            fingerprint: key,
        }
    }
}

fn with_page(base: String, page: Option<&str>) -> String {
    match page {
        Some(page) => format!("{base}, {page}"),
        None => base,
    }
}

/// Second and later references to a work already in the seen map. Legal and
/// archival material keep their own conventions; everything else gets the
/// Chicago author + short title form, with the short title derived from the
/// first-seen record so later citations of the same work agree.
fn short_note(record: &CitationRecord, first_seen: &CitationRecord) -> String {
    match record.kind {
        CitationKind::Legal => {
            let title = record.title.as_deref().unwrap_or("");
            title.split(',').next().unwrap_or(title).to_string()
        }
        CitationKind::Archival | CitationKind::Transcript => {
            record.title.clone().unwrap_or_default()
        }
        _ => {
            let short = short_title(first_seen.title.as_deref().unwrap_or(""));
            match record.author.as_deref() {
                Some(author) => format!("{author}, {short}"),
                None => short,
            }
        }
    }
}

fn full_note(record: &CitationRecord) -> String {
    let title = record.title.as_deref().unwrap_or("");
    match record.kind {
        CitationKind::Legal => title.to_string(),
        CitationKind::Archival => {
            format!("{title}, {}", record.details.as_deref().unwrap_or(""))
        }
        CitationKind::Book if record.publication.is_some() => {
            let pub_info = record.publication.as_deref().unwrap_or("");
            match record.author.as_deref() {
                Some(author) => format!("{author}, {title} ({pub_info})"),
                None => format!("{title} ({pub_info})"),
            }
        }
        _ => {
            let base = match record.author.as_deref() {
                Some(author) => format!("{author}, {title}"),
                None => title.to_string(),
            };
            if record.kind == CitationKind::Medical {
                format!("{base} {}", record.publication.as_deref().unwrap_or(""))
            } else {
                base
            }
        }
    }
}

/// Chicago short-title form: subtitle dropped at the first colon, a leading
/// article dropped, truncated to five words.
pub fn short_title(full_title: &str) -> String {
    if full_title.is_empty() {
        return String::new();
    }
    let short = full_title.split(':').next().unwrap_or(full_title);
    let short = LEADING_ARTICLE_RE.replace(short, "");
    let words: Vec<&str> = short.split_whitespace().collect();
    if words.len() > 5 {
        words[..5].join(" ")
    } else {
        short.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_short_titles() {
        assert_eq!(
            short_title("The Quiet Revolution: A Study of Reform"),
            "Quiet Revolution"
        );
        assert_eq!(short_title("A History of Psychiatry"), "History of Psychiatry");
        assert_eq!(
            short_title("An Unusually Long Title With Many Trailing Words"),
            "Unusually Long Title With Many"
        );
        assert_eq!(short_title(""), "");
    }

    #[test]
    fn short_title_keeps_internal_articles() {
        assert_eq!(
            short_title("Interpretation of The Dreams"),
            "Interpretation of The Dreams"
        );
    }
}
