#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/endnotes.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.endnotes+xml"/></Types>"#;

pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    )
}

pub fn endnotes_xml(notes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:endnotes xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{notes}</w:endnotes>"#
    )
}

pub fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
}

/// A paragraph ending in an endnote reference mark, shaped the way Word
/// writes one: the text run first, then a superscript run holding the
/// `w:endnoteReference` element.
pub fn referenced_paragraph(text: &str, note_id: &str) -> String {
    format!(
        "<w:p><w:r><w:t>{text}</w:t></w:r>\
         <w:r><w:rPr><w:rStyle w:val=\"EndnoteReference\"/></w:rPr>\
         <w:endnoteReference w:id=\"{note_id}\"/></w:r></w:p>"
    )
}

/// An endnote whose first run carries the `w:endnoteRef` marker, as Word
/// emits it, followed by the note text.
pub fn endnote(id: &str, text: &str) -> String {
    format!(
        "<w:endnote w:id=\"{id}\"><w:p>\
         <w:r><w:rPr><w:rStyle w:val=\"EndnoteReference\"/></w:rPr><w:endnoteRef/></w:r>\
         <w:r><w:t>{text}</w:t></w:r>\
         </w:p></w:endnote>"
    )
}

/// The separator and continuation-separator notes every real endnotes part
/// opens with.
pub fn separator_endnotes() -> String {
    "<w:endnote w:id=\"-1\"><w:p><w:r><w:separator/></w:r></w:p></w:endnote>\
     <w:endnote w:id=\"0\"><w:p><w:r><w:continuationSeparator/></w:r></w:p></w:endnote>"
        .to_string()
}

pub fn build_package(entries: &[(&str, String)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap_or_else(|e| panic!("Failed to start zip entry {name}: {e}"));
        writer
            .write_all(content.as_bytes())
            .unwrap_or_else(|e| panic!("Failed to write zip entry {name}: {e}"));
    }
    writer
        .finish()
        .unwrap_or_else(|e| panic!("Failed to finish test package: {e}"))
        .into_inner()
}

/// A minimal but complete docx package: content types plus the two parts
/// the converter reads.
pub fn build_docx(document_body: &str, endnote_elements: &str) -> Vec<u8> {
    build_package(&[
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("word/document.xml", document_xml(document_body)),
        ("word/endnotes.xml", endnotes_xml(endnote_elements)),
    ])
}
