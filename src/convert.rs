use crate::docx::{self, document, endnotes, writer};
use crate::history::CitationHistory;
use crate::restructure::{self, is_structural_id};
use crate::types::{ConversionSummary, ConvertOptions, NotePreview};
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Runs the whole conversion against an in-memory docx package and returns
/// the restructured package plus a summary. A fresh citation history is
/// built per call, so repeated conversions of the same bytes are identical.
pub fn convert_docx_bytes(
    package: &[u8],
    options: &ConvertOptions,
) -> Result<(Vec<u8>, ConversionSummary), String> {
    let document_xml = docx::read_part(package, docx::DOCUMENT_PART)?;
    let endnotes_xml = docx::read_part(package, docx::ENDNOTES_PART)?;

    let sites = document::scan_reference_sites(&document_xml)?;
    let notes = endnotes::extract_notes(&endnotes_xml)?;
    let plan = restructure::build_plan(&sites, &notes, options);

    let rewritten = writer::rewrite_document_xml(&document_xml, &plan, options)?;
    let converted = docx::replace_document(package, &rewritten)?;

    tracing::info!("Converted {} notes", plan.notes_processed);

    Ok((
        converted,
        ConversionSummary {
            notes_processed: plan.notes_processed,
            generated_at: Utc::now().to_rfc3339(),
        },
    ))
}

pub fn convert_docx_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConversionSummary, String> {
    let package =
        fs::read(input).map_err(|e| format!("Failed to read {}: {e}", input.display()))?;
    let (converted, summary) = convert_docx_bytes(&package, options)?;
    fs::write(output, converted)
        .map_err(|e| format!("Failed to write {}: {e}", output.display()))?;
    Ok(summary)
}

/// Reports what the conversion would do to each endnote without touching
/// the document. Separator notes and blank notes are left out; the rest
/// come back in ascending note id order, the order the notes section would
/// use.
pub fn preview_docx_bytes(package: &[u8]) -> Result<Vec<NotePreview>, String> {
    let endnotes_xml = docx::read_part(package, docx::ENDNOTES_PART)?;
    let mut notes = endnotes::extract_notes(&endnotes_xml)?;
    notes.retain(|note| !is_structural_id(&note.note_id) && !note.text.trim().is_empty());
    notes.sort_by_key(|note| note.note_id.parse::<i64>().unwrap_or(0));

    let mut history = CitationHistory::new();
    let previews = notes
        .iter()
        .map(|note| {
            let processed = history.process_detailed(&note.text);
            NotePreview {
                id: note.note_id.clone(),
                raw: note.text.clone(),
                processed: processed.formatted,
                kind: processed.kind,
                fingerprint: processed.fingerprint,
            }
        })
        .collect();
    Ok(previews)
}
