use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

pub mod document;
pub mod endnotes;
pub mod writer;

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const ENDNOTES_PART: &str = "word/endnotes.xml";

/// Reads one XML part out of an in-memory docx package.
pub fn read_part(package: &[u8], part: &str) -> Result<String, String> {
    let mut archive = ZipArchive::new(Cursor::new(package))
        .map_err(|e| format!("Failed to open docx package: {e}"))?;
    let mut entry = archive
        .by_name(part)
        .map_err(|_| format!("Docx package has no {part} entry"))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| format!("Failed to read {part}: {e}"))?;
    Ok(xml)
}

/// Repacks the archive with `word/document.xml` swapped out. Every other
/// entry is copied through unchanged, keeping its compression method.
pub fn replace_document(package: &[u8], document_xml: &str) -> Result<Vec<u8>, String> {
    let mut archive = ZipArchive::new(Cursor::new(package))
        .map_err(|e| format!("Failed to open docx package: {e}"))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| format!("Failed to read docx entry: {e}"))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let options = SimpleFileOptions::default().compression_method(entry.compression());
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| format!("Failed to write docx entry {name}: {e}"))?;
        if name == DOCUMENT_PART {
            writer
                .write_all(document_xml.as_bytes())
                .map_err(|e| format!("Failed to write docx entry {name}: {e}"))?;
        } else {
            let mut original = Vec::new();
            entry
                .read_to_end(&mut original)
                .map_err(|e| format!("Failed to read docx entry {name}: {e}"))?;
            writer
                .write_all(&original)
                .map_err(|e| format!("Failed to write docx entry {name}: {e}"))?;
        }
    }

    let cursor = writer
        .finish()
        .map_err(|e| format!("Failed to finish docx package: {e}"))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_package(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn reads_named_part() {
        let package = build_package(&[
            ("word/document.xml", "<w:document/>"),
            ("word/endnotes.xml", "<w:endnotes/>"),
        ]);
        assert_eq!(read_part(&package, DOCUMENT_PART).unwrap(), "<w:document/>");
        assert_eq!(read_part(&package, ENDNOTES_PART).unwrap(), "<w:endnotes/>");
    }

    #[test]
    fn missing_part_is_an_error() {
        let package = build_package(&[("word/document.xml", "<w:document/>")]);
        let err = read_part(&package, ENDNOTES_PART).unwrap_err();
        assert!(err.contains("word/endnotes.xml"));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(read_part(b"not a zip archive", DOCUMENT_PART).is_err());
    }

    #[test]
    fn replaces_document_and_keeps_other_entries() {
        let package = build_package(&[
            ("[Content_Types].xml", "<Types/>"),
            ("word/document.xml", "<w:document>old</w:document>"),
            ("word/endnotes.xml", "<w:endnotes/>"),
        ]);
        let updated = replace_document(&package, "<w:document>new</w:document>").unwrap();

        assert_eq!(
            read_part(&updated, DOCUMENT_PART).unwrap(),
            "<w:document>new</w:document>"
        );
        assert_eq!(read_part(&updated, ENDNOTES_PART).unwrap(), "<w:endnotes/>");
        assert_eq!(read_part(&updated, "[Content_Types].xml").unwrap(), "<Types/>");
    }
}
