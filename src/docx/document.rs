use crate::types::ReferenceSite;
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Default)]
struct RunFrame {
    depth: usize,
    text: String,
    reference_id: Option<String>,
    first_text_taken: bool,
    capturing: bool,
}

#[derive(Default)]
struct ParagraphFrame {
    text: String,
    // (reference id, byte offset just past the referencing run)
    refs: Vec<(String, usize)>,
    run: Option<RunFrame>,
}

/// Walks `word/document.xml` and returns one site per referencing run, in
/// document order. Only runs sitting directly under a paragraph count, and
/// only the first `w:t` of each run contributes text, which is how Word
/// lays out reference marks.
pub fn scan_reference_sites(xml: &str) -> Result<Vec<ReferenceSite>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut paragraphs: Vec<ParagraphFrame> = Vec::new();
    let mut sites = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let parent = stack.last().map(String::as_str);

                match tag.as_str() {
                    "w:p" => paragraphs.push(ParagraphFrame::default()),
                    "w:r" if parent == Some("w:p") => {
                        if let Some(paragraph) = paragraphs.last_mut() {
                            paragraph.run = Some(RunFrame {
                                depth: stack.len() + 1,
                                ..RunFrame::default()
                            });
                        }
                    }
                    "w:t" => {
                        if let Some(run) = direct_run(&mut paragraphs, stack.len()) {
                            if !run.first_text_taken {
                                run.first_text_taken = true;
                                run.capturing = true;
                            }
                        }
                    }
                    "w:endnoteReference" => {
                        if let Some(run) = direct_run(&mut paragraphs, stack.len()) {
                            if run.reference_id.is_none() {
                                run.reference_id = reference_id_attr(e);
                            }
                        }
                    }
                    _ => {}
                }
                stack.push(tag);
            }
            Ok(Event::Empty(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "w:t" => {
                        if let Some(run) = direct_run(&mut paragraphs, stack.len()) {
                            run.first_text_taken = true;
                        }
                    }
                    "w:endnoteReference" => {
                        if let Some(run) = direct_run(&mut paragraphs, stack.len()) {
                            if run.reference_id.is_none() {
                                run.reference_id = reference_id_attr(e);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Ok(text) = e.unescape() {
                    if let Some(run) = paragraphs.last_mut().and_then(|p| p.run.as_mut()) {
                        if run.capturing {
                            run.text.push_str(&text);
                        }
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "w:t" => {
                        if let Some(run) = paragraphs.last_mut().and_then(|p| p.run.as_mut()) {
                            run.capturing = false;
                        }
                    }
                    "w:r" => {
                        let closes_run = paragraphs
                            .last()
                            .and_then(|p| p.run.as_ref())
                            .is_some_and(|run| run.depth == stack.len());
                        if closes_run {
                            if let Some(paragraph) = paragraphs.last_mut() {
                                if let Some(run) = paragraph.run.take() {
                                    paragraph.text.push_str(&run.text);
                                    if let Some(id) = run.reference_id {
                                        paragraph.refs.push((id, paragraph.text.len()));
                                    }
                                }
                            }
                        }
                    }
                    "w:p" => {
                        if let Some(paragraph) = paragraphs.pop() {
                            for (reference_id, offset) in paragraph.refs {
                                sites.push(ReferenceSite {
                                    reference_id,
                                    paragraph_text: paragraph.text.clone(),
                                    offset,
                                });
                            }
                        }
                    }
                    _ => {}
                }
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("Malformed document XML: {e}")),
        }
        buf.clear();
    }

    Ok(sites)
}

fn direct_run(paragraphs: &mut [ParagraphFrame], depth: usize) -> Option<&mut RunFrame> {
    paragraphs
        .last_mut()?
        .run
        .as_mut()
        .filter(|run| run.depth == depth)
}

fn reference_id_attr(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"w:id" {
            return Some(String::from_utf8_lossy(attr.value.as_ref()).to_string());
        }
    }
    None
}
