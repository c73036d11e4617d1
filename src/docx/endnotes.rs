use crate::types::RawNote;
use quick_xml::events::Event;
use quick_xml::Reader;

struct NoteFrame {
    id: String,
    text: String,
    run_text: String,
    run_has_marker: bool,
}

/// Pulls the plain text of every endnote in `word/endnotes.xml`, in file
/// order. Runs holding the `w:endnoteRef` marker are dropped so the note
/// number never leaks into the citation text. Blank notes are kept; what a
/// blank note means is the caller's call.
pub fn extract_notes(xml: &str) -> Result<Vec<RawNote>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut notes = Vec::new();
    let mut current: Option<NoteFrame> = None;
    let mut capturing = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "w:endnote" => {
                        if let Some(id) = note_id_attr(e) {
                            current = Some(NoteFrame {
                                id,
                                text: String::new(),
                                run_text: String::new(),
                                run_has_marker: false,
                            });
                        }
                    }
                    "w:t" if in_note_run(&stack) => capturing = current.is_some(),
                    "w:endnoteRef" if in_note_run(&stack) => {
                        if let Some(note) = current.as_mut() {
                            note.run_has_marker = true;
                        }
                    }
                    _ => {}
                }
                stack.push(tag);
            }
            Ok(Event::Empty(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "w:endnote" => {
                        if let Some(id) = note_id_attr(e) {
                            notes.push(RawNote {
                                note_id: id,
                                text: String::new(),
                            });
                        }
                    }
                    "w:endnoteRef" if in_note_run(&stack) => {
                        if let Some(note) = current.as_mut() {
                            note.run_has_marker = true;
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if capturing {
                    if let Ok(text) = e.unescape() {
                        if let Some(note) = current.as_mut() {
                            note.run_text.push_str(&text);
                        }
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "w:t" => capturing = false,
                    "w:r" if in_note_run(&stack) => {
                        if let Some(note) = current.as_mut() {
                            if !note.run_has_marker {
                                let run_text = std::mem::take(&mut note.run_text);
                                note.text.push_str(&run_text);
                            } else {
                                note.run_text.clear();
                            }
                            note.run_has_marker = false;
                        }
                    }
                    "w:endnote" => {
                        if let Some(note) = current.take() {
                            notes.push(RawNote {
                                note_id: note.id,
                                text: note.text,
                            });
                        }
                    }
                    _ => {}
                }
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("Malformed endnotes XML: {e}")),
        }
        buf.clear();
    }

    Ok(notes)
}

// True when the element stack sits at a run directly under a top-level note
// paragraph. Notes can hold tables; their nested paragraphs do not count,
// matching how the rest of the pipeline reads note bodies.
fn in_note_run(stack: &[String]) -> bool {
    let n = stack.len();
    n >= 3 && stack[n - 3] == "w:endnote" && stack[n - 2] == "w:p" && stack[n - 1] == "w:r"
}

fn note_id_attr(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"w:id" {
            return Some(String::from_utf8_lossy(attr.value.as_ref()).to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endnotes(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:endnotes xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{body}</w:endnotes>"#
        )
    }

    #[test]
    fn extracts_note_text_without_the_marker_run() {
        let xml = endnotes(
            "<w:endnote w:id=\"2\"><w:p>\
             <w:r><w:rPr><w:rStyle w:val=\"EndnoteReference\"/></w:rPr><w:endnoteRef/></w:r>\
             <w:r><w:t xml:space=\"preserve\"> Smith, John. A History. Boston: Bell, 1922.</w:t></w:r>\
             </w:p></w:endnote>",
        );
        let notes = extract_notes(&xml).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].note_id, "2");
        assert_eq!(notes[0].text, " Smith, John. A History. Boston: Bell, 1922.");
    }

    #[test]
    fn keeps_structural_and_blank_notes() {
        let xml = endnotes(
            "<w:endnote w:id=\"0\"><w:p><w:r><w:separator/></w:r></w:p></w:endnote>\
             <w:endnote w:id=\"-1\"><w:p><w:r><w:continuationSeparator/></w:r></w:p></w:endnote>\
             <w:endnote w:id=\"5\"><w:p><w:r><w:t>  </w:t></w:r></w:p></w:endnote>",
        );
        let notes = extract_notes(&xml).unwrap();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].note_id, "0");
        assert_eq!(notes[1].note_id, "-1");
        assert_eq!(notes[2].note_id, "5");
        assert_eq!(notes[2].text, "  ");
    }

    #[test]
    fn joins_every_text_element_across_runs_and_paragraphs() {
        let xml = endnotes(
            "<w:endnote w:id=\"3\">\
             <w:p><w:r><w:t>Part one</w:t><w:t> and two.</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Part three.</w:t></w:r></w:p>\
             </w:endnote>",
        );
        let notes = extract_notes(&xml).unwrap();
        assert_eq!(notes[0].text, "Part one and two.Part three.");
    }

    #[test]
    fn unescapes_entities_in_note_text() {
        let xml = endnotes(
            "<w:endnote w:id=\"7\"><w:p><w:r><w:t>Brown &amp; Co. v. Lee</w:t></w:r></w:p></w:endnote>",
        );
        let notes = extract_notes(&xml).unwrap();
        assert_eq!(notes[0].text, "Brown & Co. v. Lee");
    }

    #[test]
    fn notes_without_an_id_are_dropped() {
        let xml = endnotes("<w:endnote><w:p><w:r><w:t>stray</w:t></w:r></w:p></w:endnote>");
        assert!(extract_notes(&xml).unwrap().is_empty());
    }
}
