use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
    Archival,
    Transcript,
    Legal,
    Medical,
    Book,
    Journal,
    Generic,
}

impl CitationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationKind::Archival => "archival",
            CitationKind::Transcript => "transcript",
            CitationKind::Legal => "legal",
            CitationKind::Medical => "medical",
            CitationKind::Book => "book",
            CitationKind::Journal => "journal",
            CitationKind::Generic => "generic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    #[serde(rename = "type")]
    pub kind: CitationKind,
    pub author: Option<String>,
    pub title: Option<String>,
    pub publication: Option<String>,
    pub details: Option<String>,
    pub page: Option<String>,
    pub fingerprint: Option<String>,
}

impl CitationRecord {
    pub fn new(kind: CitationKind) -> Self {
        CitationRecord {
            kind,
            author: None,
            title: None,
            publication: None,
            details: None,
            page: None,
            fingerprint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisStyle {
    Bold,
    Italic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    pub word_count: usize,
    pub emphasis: EmphasisStyle,
    pub apply_citation_style: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            word_count: 3,
            emphasis: EmphasisStyle::Bold,
            apply_citation_style: true,
        }
    }
}

/// One endnote reference found in the document body. `offset` is the byte
/// position just past the referencing run within `paragraph_text`, always on
/// a character boundary because it is a sum of whole-run lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSite {
    pub reference_id: String,
    pub paragraph_text: String,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawNote {
    pub note_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkSpec {
    pub reference_id: String,
    pub bookmark_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteBlock {
    pub note_id: String,
    pub bookmark_name: String,
    pub incipit: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestructurePlan {
    pub bookmarks: Vec<BookmarkSpec>,
    pub notes: Vec<NoteBlock>,
    pub notes_processed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotePreview {
    pub id: String,
    pub raw: String,
    pub processed: String,
    #[serde(rename = "type")]
    pub kind: CitationKind,
    pub fingerprint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSummary {
    pub notes_processed: usize,
    pub generated_at: String,
}
