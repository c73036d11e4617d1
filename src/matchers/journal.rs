use super::common;
use crate::types::{CitationKind, CitationRecord};

/// Last resort after every matcher has declined. A leading "Last, First."
/// segment makes it a journal-style record; anything else becomes a generic
/// record whose title is the whole text, so no note is ever dropped.
pub fn parse_fallback(text: &str) -> CitationRecord {
    if let Some((head, tail)) = common::split_author_title(text) {
        if head.contains(',') {
            let mut record = CitationRecord::new(CitationKind::Journal);
            record.author = common::non_empty(common::reorder_comma_name(head));
            record.title = common::non_empty(tail.to_string());
            return record;
        }
    }
    let mut record = CitationRecord::new(CitationKind::Generic);
    record.title = common::non_empty(text.to_string());
    record
}
