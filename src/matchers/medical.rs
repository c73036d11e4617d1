use super::{common, MatchOutcome};
use crate::types::{CitationKind, CitationRecord};

/// Journal names recognized as medical literature, abbreviated and full
/// forms both. Matched as literal substrings.
const JOURNALS: &[&str] = &[
    "Am J Psychiatry",
    "American Journal of Psychiatry",
    "JAMA",
    "NEJM",
    "New England Journal of Medicine",
    "Arch Gen Psychiatry",
    "Archives of General Psychiatry",
    "Lancet",
    "BMJ",
    "British Medical Journal",
    "Psychiatric Services",
    "J Clin Psychiatry",
    "Journal of Clinical Psychiatry",
    "Biological Psychiatry",
    "Psychological Medicine",
    "Hospital and Community Psychiatry",
    "Bulletin of the Menninger Clinic",
    "J Nerv Ment Dis",
    "Journal of Nervous and Mental Disease",
];

/// Medical journal articles: "Author. Title. Am J Psychiatry 142(4), …".
/// When several journal names occur, the longest literal wins, so a spelled
/// out journal is never shadowed by an abbreviation it happens to contain.
pub fn match_citation(text: &str) -> MatchOutcome {
    let mut best: Option<&str> = None;
    for journal in JOURNALS {
        if !text.contains(journal) {
            continue;
        }
        match best {
            Some(b) if journal.len() <= b.len() => {}
            _ => best = Some(journal),
        }
    }
    let Some(journal) = best else {
        return MatchOutcome::NoMatch;
    };

    let Some((before, after)) = text.split_once(journal) else {
        return MatchOutcome::Faulted(format!("journal {journal:?} matched but did not split"));
    };
    let before = before.trim();

    let (author, title) = match common::split_author_title(before) {
        Some((author, title)) => (
            author.trim().to_string(),
            title.trim_matches([' ', '.']).to_string(),
        ),
        None => (before.to_string(), "Title Unknown".to_string()),
    };

    let author = common::normalize_et_al(&author);
    let author = if author.contains(',') && !author.contains("et al.") {
        common::reorder_comma_name(&author)
    } else {
        author
    };

    let mut record = CitationRecord::new(CitationKind::Medical);
    record.author = common::non_empty(author);
    record.title = common::non_empty(title);
    record.publication = Some(format!("{journal} {}", after.trim()));
    MatchOutcome::Matched(record)
}
