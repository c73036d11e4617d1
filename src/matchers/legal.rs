use super::{common, MatchOutcome};
use crate::types::{CitationKind, CitationRecord};
use regex::Regex;
use std::sync::LazyLock;

static VERSUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+v\.\s+").unwrap());

/// Case citations, detected by the party-versus-party token. The whole text
/// becomes the title; the history engine derives the short form from it.
pub fn match_citation(text: &str) -> MatchOutcome {
    if !VERSUS_RE.is_match(text) {
        return MatchOutcome::NoMatch;
    }
    let mut record = CitationRecord::new(CitationKind::Legal);
    record.title = common::non_empty(text.to_string());
    MatchOutcome::Matched(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_party_versus_party_text() {
        let outcome = match_citation("Osheroff v. Chestnut Lodge, 62 Md. App. 519");
        let MatchOutcome::Matched(record) = outcome else {
            panic!("expected a match, got {outcome:?}");
        };
        assert_eq!(record.kind, CitationKind::Legal);
        assert_eq!(
            record.title.as_deref(),
            Some("Osheroff v. Chestnut Lodge, 62 Md. App. 519")
        );
        assert_eq!(record.author, None);
    }

    #[test]
    fn requires_the_spaced_token() {
        assert_eq!(match_citation("very important study"), MatchOutcome::NoMatch);
        assert_eq!(match_citation("v. 2 of the collected works"), MatchOutcome::NoMatch);
    }
}
