use super::{common, MatchOutcome};
use crate::types::{CitationKind, CitationRecord};

const KEYWORDS: &[&str] = &["Deposition", "Testimony", "Transcript"];

/// Court and hearing records ("Klerman Deposition, Oct 15"). The segment
/// before the first comma serves as both author and title, which keeps later
/// short notes stable for these sources.
pub fn match_citation(text: &str) -> MatchOutcome {
    if !KEYWORDS.iter().any(|k| text.contains(k)) {
        return MatchOutcome::NoMatch;
    }

    let (head, rest) = match text.split_once(',') {
        Some((head, rest)) => (head, Some(rest)),
        None => (text, None),
    };
    let head = head.trim().to_string();

    let mut record = CitationRecord::new(CitationKind::Transcript);
    record.author = common::non_empty(head.clone());
    record.title = common::non_empty(head);
    record.publication = rest.and_then(|r| common::non_empty(r.trim().to_string()));
    MatchOutcome::Matched(record)
}
