use crate::history::CitationHistory;
use crate::incipit::sentence_start;
use crate::types::{
    BookmarkSpec, ConvertOptions, NoteBlock, RawNote, ReferenceSite, RestructurePlan,
};
use std::collections::{HashMap, HashSet};

/// Separator and continuation notices carry these ids; they are part of the
/// endnote machinery, not content.
const STRUCTURAL_IDS: &[&str] = &["0", "-1"];

const BOOKMARK_ID_BASE: usize = 10000;

pub fn bookmark_name(note_id: &str) -> String {
    format!("REF_NOTE_{note_id}")
}

pub fn is_structural_id(id: &str) -> bool {
    STRUCTURAL_IDS.contains(&id)
}

/// Builds the whole edit plan for one document: one bookmark per reference
/// site (in document order) and the consolidated notes section in ascending
/// numeric id order. The plan never touches the document format; the docx
/// layer applies it.
pub fn build_plan(
    sites: &[ReferenceSite],
    notes: &[RawNote],
    options: &ConvertOptions,
) -> RestructurePlan {
    let mut bookmarks = Vec::new();
    let mut incipits: HashMap<String, String> = HashMap::new();

    for site in sites {
        if is_structural_id(&site.reference_id) {
            continue;
        }
        let incipit = sentence_start(&site.paragraph_text, site.offset, options.word_count);
        incipits.insert(site.reference_id.clone(), incipit);
        bookmarks.push(BookmarkSpec {
            reference_id: site.reference_id.clone(),
            bookmark_id: (BOOKMARK_ID_BASE + bookmarks.len()).to_string(),
            name: bookmark_name(&site.reference_id),
        });
    }

    // Ids keep their first-reference document order before the numeric sort
    // so equal keys (non-numeric ids all sort as 0) stay stable.
    let mut seen = HashSet::new();
    let mut ids: Vec<String> = Vec::new();
    for bookmark in &bookmarks {
        if seen.insert(bookmark.reference_id.clone()) {
            ids.push(bookmark.reference_id.clone());
        }
    }
    ids.sort_by_key(|id| id.parse::<i64>().unwrap_or(0));

    let note_texts: HashMap<&str, &str> = notes
        .iter()
        .map(|note| (note.note_id.as_str(), note.text.as_str()))
        .collect();

    let mut history = CitationHistory::new();
    let mut blocks = Vec::new();
    for id in &ids {
        let Some(raw) = note_texts.get(id.as_str()) else {
            tracing::warn!("reference {id} has no matching endnote body, skipping its note");
            continue;
        };
        let text = if options.apply_citation_style {
            history.process(raw)
        } else {
            (*raw).to_string()
        };
        blocks.push(NoteBlock {
            note_id: id.clone(),
            bookmark_name: bookmark_name(id),
            incipit: incipits.get(id.as_str()).cloned().unwrap_or_default(),
            text,
        });
    }

    RestructurePlan {
        bookmarks,
        notes: blocks,
        notes_processed: ids.len(),
    }
}
