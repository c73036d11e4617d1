use super::MatchOutcome;
use crate::types::{CitationKind, CitationRecord};
use regex::Regex;
use std::sync::LazyLock;

static LOCATOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)^(.+?)\s*,\s*(Box|Folder|Tape|Reel|Carton)\s+(\d+)").unwrap(),
        Regex::new(r"(?i)^(.+?)\s+Arbitration\s+(Videos?|Tapes?|Transcripts?)(?:,\s*(.+))?")
            .unwrap(),
        Regex::new(r"(?i)^(.+?)\s+Papers\s*,\s*(.+)").unwrap(),
        Regex::new(r"(?i)^(.+?)\s+Archives?\s*,\s*(.+)").unwrap(),
        Regex::new(r"(?i)^(.+?)\s+Collection\s*,\s*(.+)").unwrap(),
        Regex::new(r"(?i)^(.+?)\s+Personal\s+Archive(?:,\s*(.+))?").unwrap(),
    ]
});

/// Archival holdings: boxes, folders, collections, personal papers. These
/// look enough like book or journal citations that they must be claimed
/// before the looser matchers see them.
pub fn match_citation(text: &str) -> MatchOutcome {
    for pattern in LOCATOR_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            return MatchOutcome::Faulted("locator pattern matched without a span".to_string());
        };

        let mut record = CitationRecord::new(CitationKind::Archival);
        if text.contains("Arbitration") {
            // The arbitration series is titled by its lead segment and keeps
            // the entire text as the locator detail.
            let title = whole.as_str().split(',').next().unwrap_or(whole.as_str());
            record.title = Some(title.to_string());
            record.details = Some(text.to_string());
        } else {
            let Some(entity) = caps.get(1) else {
                return MatchOutcome::Faulted(
                    "locator pattern matched without an entity capture".to_string(),
                );
            };
            record.title = Some(entity.as_str().trim().to_string());
            record.details = Some(whole.as_str().to_string());
        }
        return MatchOutcome::Matched(record);
    }
    MatchOutcome::NoMatch
}
