use crate::restructure::is_structural_id;
use crate::types::{BookmarkSpec, ConvertOptions, EmphasisStyle, NoteBlock, RestructurePlan};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::{HashMap, VecDeque};

/// Applies a restructure plan to `word/document.xml` in one streaming pass.
///
/// Each referencing run is wrapped in a `w:bookmarkStart`/`w:bookmarkEnd`
/// pair and loses its reference mark and first text element. The notes
/// section lands at the end of the body: a page break, a "Notes" heading,
/// then one paragraph per note with a PAGEREF field pointing back at the
/// bookmark.
pub fn rewrite_document_xml(
    xml: &str,
    plan: &RestructurePlan,
    options: &ConvertOptions,
) -> Result<String, String> {
    let mut queues: HashMap<&str, VecDeque<&BookmarkSpec>> = HashMap::new();
    for bookmark in &plan.bookmarks {
        queues
            .entry(bookmark.reference_id.as_str())
            .or_default()
            .push_back(bookmark);
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::new());

    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    // Buffered events of currently open direct-child runs, innermost last.
    // A run is held back until its end tag so the reference check can see
    // the whole run before deciding how to emit it.
    let mut runs: Vec<(usize, Vec<Event<'static>>)> = Vec::new();
    let mut notes_written = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let parent = stack.last().map(String::as_str);
                if tag == "w:r" && parent == Some("w:p") {
                    runs.push((stack.len() + 1, vec![Event::Start(e).into_owned()]));
                } else {
                    emit(&mut writer, &mut runs, Event::Start(e))?;
                }
                stack.push(tag);
            }
            Ok(Event::End(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let closes_run = tag == "w:r"
                    && runs.last().is_some_and(|(depth, _)| *depth == stack.len());
                if closes_run {
                    if let Some((_, mut events)) = runs.pop() {
                        events.push(Event::End(e).into_owned());
                        flush_run(&mut writer, &mut runs, events, &mut queues)?;
                    }
                } else {
                    if tag == "w:body" && !notes_written {
                        notes_written = true;
                        write_notes_section(&mut writer, plan, options)?;
                    }
                    emit(&mut writer, &mut runs, Event::End(e))?;
                }
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Ok(event) => emit(&mut writer, &mut runs, event)?,
            Err(e) => return Err(format!("Malformed document XML: {e}")),
        }
        buf.clear();
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| format!("Rewritten document is not UTF-8: {e}"))
}

/// Emits one buffered run. Runs carrying an endnote reference are wrapped
/// in their bookmark and stripped of the reference mark and first text
/// element; everything else passes through untouched.
fn flush_run(
    writer: &mut Writer<Vec<u8>>,
    runs: &mut Vec<(usize, Vec<Event<'static>>)>,
    events: Vec<Event<'static>>,
    queues: &mut HashMap<&str, VecDeque<&BookmarkSpec>>,
) -> Result<(), String> {
    let Some(reference_id) = first_direct_reference_id(&events) else {
        for event in events {
            emit(writer, runs, event)?;
        }
        return Ok(());
    };

    let spec = queues
        .get_mut(reference_id.as_str())
        .and_then(VecDeque::pop_front);
    let Some(spec) = spec else {
        if !is_structural_id(&reference_id) {
            tracing::warn!("no bookmark allocated for endnote reference {reference_id}");
        }
        for event in events {
            emit(writer, runs, event)?;
        }
        return Ok(());
    };

    let mut start = BytesStart::new("w:bookmarkStart");
    start.push_attribute(("w:id", spec.bookmark_id.as_str()));
    start.push_attribute(("w:name", spec.name.as_str()));
    emit(writer, runs, Event::Empty(start.into_owned()))?;

    let mut depth = 0usize;
    let mut skip_from: Option<usize> = None;
    let mut dropped_reference = false;
    let mut dropped_text = false;
    for event in events {
        match event {
            Event::Start(ref e) => {
                let is_reference = e.name().as_ref() == b"w:endnoteReference";
                let is_text = e.name().as_ref() == b"w:t";
                if depth == 1 && skip_from.is_none() {
                    if is_reference && !dropped_reference {
                        dropped_reference = true;
                        skip_from = Some(depth);
                        depth += 1;
                        continue;
                    }
                    if is_text && !dropped_text {
                        dropped_text = true;
                        skip_from = Some(depth);
                        depth += 1;
                        continue;
                    }
                }
                depth += 1;
                if skip_from.is_none() {
                    emit(writer, runs, event)?;
                }
            }
            Event::Empty(ref e) => {
                let is_reference = e.name().as_ref() == b"w:endnoteReference";
                let is_text = e.name().as_ref() == b"w:t";
                if depth == 1 && skip_from.is_none() {
                    if is_reference && !dropped_reference {
                        dropped_reference = true;
                        continue;
                    }
                    if is_text && !dropped_text {
                        dropped_text = true;
                        continue;
                    }
                }
                if skip_from.is_none() {
                    emit(writer, runs, event)?;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if let Some(mark) = skip_from {
                    if depth == mark {
                        skip_from = None;
                    }
                    continue;
                }
                emit(writer, runs, event)?;
            }
            _ => {
                if skip_from.is_none() {
                    emit(writer, runs, event)?;
                }
            }
        }
    }

    let mut end = BytesStart::new("w:bookmarkEnd");
    end.push_attribute(("w:id", spec.bookmark_id.as_str()));
    emit(writer, runs, Event::Empty(end.into_owned()))
}

// First reference id among the run's direct children, same element the
// body scan keyed its site on.
fn first_direct_reference_id(events: &[Event<'static>]) -> Option<String> {
    let mut depth = 0usize;
    for event in events {
        match event {
            Event::Start(e) => {
                if depth == 1 && e.name().as_ref() == b"w:endnoteReference" {
                    return reference_id_attr(e);
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if depth == 1 && e.name().as_ref() == b"w:endnoteReference" {
                    return reference_id_attr(e);
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

fn reference_id_attr(e: &BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"w:id" {
            return Some(String::from_utf8_lossy(attr.value.as_ref()).to_string());
        }
    }
    None
}

fn write_notes_section(
    writer: &mut Writer<Vec<u8>>,
    plan: &RestructurePlan,
    options: &ConvertOptions,
) -> Result<(), String> {
    // Page break so the notes open on a fresh page.
    write_start(writer, "w:p")?;
    write_start(writer, "w:r")?;
    write_empty(writer, "w:br", &[("w:type", "page")])?;
    write_end(writer, "w:r")?;
    write_end(writer, "w:p")?;

    write_start(writer, "w:p")?;
    write_start(writer, "w:pPr")?;
    write_empty(writer, "w:pStyle", &[("w:val", "Heading1")])?;
    write_end(writer, "w:pPr")?;
    write_text_run(writer, "Notes")?;
    write_end(writer, "w:p")?;

    for block in &plan.notes {
        write_note_paragraph(writer, block, options)?;
    }
    Ok(())
}

fn write_note_paragraph(
    writer: &mut Writer<Vec<u8>>,
    block: &NoteBlock,
    options: &ConvertOptions,
) -> Result<(), String> {
    write_start(writer, "w:p")?;
    write_start(writer, "w:pPr")?;
    write_empty(writer, "w:spacing", &[("w:after", "240")])?;
    write_end(writer, "w:pPr")?;

    // PAGEREF with a placeholder digit; Word fills in the real page when
    // fields refresh.
    let instr = format!(" PAGEREF {} \\h ", block.bookmark_name);
    let mut field = BytesStart::new("w:fldSimple");
    field.push_attribute(("w:instr", instr.as_str()));
    write_ev(writer, Event::Start(field))?;
    write_text_run(writer, "0")?;
    write_end(writer, "w:fldSimple")?;

    write_separator_run(writer, ". ")?;

    if !block.incipit.is_empty() {
        write_start(writer, "w:r")?;
        write_start(writer, "w:rPr")?;
        match options.emphasis {
            EmphasisStyle::Bold => write_empty(writer, "w:b", &[])?,
            EmphasisStyle::Italic => write_empty(writer, "w:i", &[])?,
        }
        write_end(writer, "w:rPr")?;
        write_start(writer, "w:t")?;
        write_ev(writer, Event::Text(BytesText::new(block.incipit.as_str())))?;
        write_end(writer, "w:t")?;
        write_end(writer, "w:r")?;
        write_separator_run(writer, ": ")?;
    }

    write_text_run(writer, &block.text)?;
    write_end(writer, "w:p")
}

fn write_text_run(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), String> {
    write_start(writer, "w:r")?;
    write_start(writer, "w:t")?;
    write_ev(writer, Event::Text(BytesText::new(text)))?;
    write_end(writer, "w:t")?;
    write_end(writer, "w:r")
}

// Separator glue starts or ends with a space, which Word strips unless the
// text element claims xml:space="preserve".
fn write_separator_run(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), String> {
    write_start(writer, "w:r")?;
    let mut t = BytesStart::new("w:t");
    t.push_attribute(("xml:space", "preserve"));
    write_ev(writer, Event::Start(t))?;
    write_ev(writer, Event::Text(BytesText::new(text)))?;
    write_end(writer, "w:t")?;
    write_end(writer, "w:r")
}

fn write_start(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), String> {
    write_ev(writer, Event::Start(BytesStart::new(name)))
}

fn write_end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), String> {
    write_ev(writer, Event::End(BytesEnd::new(name)))
}

fn write_empty(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    attrs: &[(&str, &str)],
) -> Result<(), String> {
    let mut elem = BytesStart::new(name);
    for (key, value) in attrs {
        elem.push_attribute((*key, *value));
    }
    write_ev(writer, Event::Empty(elem))
}

fn write_ev(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), String> {
    writer
        .write_event(event)
        .map_err(|e| format!("Failed to write document XML: {e}"))
}

fn emit(
    writer: &mut Writer<Vec<u8>>,
    runs: &mut Vec<(usize, Vec<Event<'static>>)>,
    event: Event<'_>,
) -> Result<(), String> {
    if let Some((_, events)) = runs.last_mut() {
        events.push(event.into_owned());
        Ok(())
    } else {
        write_ev(writer, event)
    }
}
