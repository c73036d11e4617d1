use super::{common, MatchOutcome};
use crate::types::{CitationKind, CitationRecord};
use regex::Regex;
use std::sync::LazyLock;

/// "City: Publisher, YYYY", optionally parenthesized. The city segment is
/// letters and spaces only so the match cannot reach back across sentence
/// periods into the title.
static PUBLICATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?([A-Za-z][A-Za-z\s]*:\s*[^,()]+,\s*\d{4})\)?").unwrap());

/// "Last, First" (with optional generational suffix and middle initial) at
/// the very start of the pre-publication segment.
static NAME_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][\w\-']+(?:,\s+(?:Jr\.|Sr\.|III))?,\s+[A-Z][\w\-'\.]+(?:\s+[A-Z]\.)?)")
        .unwrap()
});

pub fn match_citation(text: &str) -> MatchOutcome {
    let Some(caps) = PUBLICATION_RE.captures(text) else {
        return MatchOutcome::NoMatch;
    };
    let (whole, publication) = match (caps.get(0), caps.get(1)) {
        (Some(w), Some(p)) => (w, p),
        _ => {
            return MatchOutcome::Faulted(
                "publication pattern matched without captures".to_string(),
            )
        }
    };
    let pre_pub = text[..whole.start()].trim().trim_end_matches(['.', ',']);

    let mut record = CitationRecord::new(CitationKind::Book);
    record.publication = Some(publication.as_str().to_string());

    if let Some(name) = NAME_START_RE.captures(pre_pub).and_then(|c| c.get(1)) {
        let remainder = pre_pub[name.end()..].trim_matches([',', '.', ' ']);
        record.author = common::non_empty(common::reorder_comma_name(name.as_str()));
        record.title = common::non_empty(remainder.to_string());
    } else {
        match common::split_author_title(pre_pub) {
            Some((author, title)) => {
                record.author = common::non_empty(author.trim().to_string());
                record.title = common::non_empty(title.trim().to_string());
            }
            None => {
                record.title = common::non_empty(pre_pub.to_string());
            }
        }
    }
    MatchOutcome::Matched(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(text: &str) -> CitationRecord {
        match match_citation(text) {
            MatchOutcome::Matched(record) => record,
            other => panic!("expected a match for {text:?}, got {other:?}"),
        }
    }

    #[test]
    fn extracts_reordered_author_title_and_publication() {
        let record = matched("Freud, S. The Interpretation of Dreams. New York: Macmillan, 1913");
        assert_eq!(record.kind, CitationKind::Book);
        assert_eq!(record.author.as_deref(), Some("S. Freud"));
        assert_eq!(record.title.as_deref(), Some("The Interpretation of Dreams"));
        assert_eq!(record.publication.as_deref(), Some("New York: Macmillan, 1913"));
    }

    #[test]
    fn handles_parenthesized_publication() {
        let record = matched("Shorter, E. A History of Psychiatry (New York: Wiley, 1997)");
        assert_eq!(record.author.as_deref(), Some("E. Shorter"));
        assert_eq!(record.title.as_deref(), Some("A History of Psychiatry"));
        assert_eq!(record.publication.as_deref(), Some("New York: Wiley, 1997"));
    }

    #[test]
    fn falls_back_to_period_split_without_a_name_shape() {
        let record = matched("The Menninger Clinic. A Guide to Services. Topeka: Menninger, 1960");
        assert_eq!(record.author.as_deref(), Some("The Menninger Clinic"));
        assert_eq!(record.title.as_deref(), Some("A Guide to Services"));
    }

    #[test]
    fn title_only_when_nothing_splits() {
        let record = matched("Annual Report Boston: Beacon, 1950");
        assert_eq!(record.author, None);
        assert_eq!(record.title, None);
        assert_eq!(record.publication.as_deref(), Some("Annual Report Boston: Beacon, 1950"));
    }

    #[test]
    fn requires_a_year_to_match() {
        assert_eq!(match_citation("Notes on a conference: summary, draft"), MatchOutcome::NoMatch);
    }
}
