//! PPTX reading: slides, titles, body text and speaker notes.
//!
//! A `.pptx` is a zip of Office Open XML parts. Slide order is the order of
//! `<p:sldId>` entries in `ppt/presentation.xml`, resolved to part names via
//! `ppt/_rels/presentation.xml.rels`. Notes are reached from each slide's own
//! relationship part.

use crate::error::ExtractError;
use crate::output::{DeckOverview, SlideContent};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

pub(crate) const PRESENTATION_PART: &str = "ppt/presentation.xml";
pub(crate) const NOTES_SLIDE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

/// One `<Relationship>` of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// A text-bearing shape (`<p:sp>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Shape {
    name: String,
    placeholder: Option<String>,
    text: String,
}

/// Read every slide of the presentation at `path`. Blocking.
pub fn read_deck(path: &Path) -> Result<DeckOverview, ExtractError> {
    let malformed = |detail: String| ExtractError::Malformed {
        format: "PPTX",
        path: path.to_path_buf(),
        detail,
    };

    let file = File::open(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| malformed(e.to_string()))?;

    let slide_parts = slide_part_names(&mut archive).map_err(malformed)?;
    let mut slides = Vec::with_capacity(slide_parts.len());

    for (idx, part) in slide_parts.iter().enumerate() {
        let xml = read_part(&mut archive, part).map_err(malformed)?;
        let shapes = parse_shapes(&xml).map_err(|e| malformed(format!("{part}: {e}")))?;

        let mut slide = SlideContent {
            slide_number: idx + 1,
            ..Default::default()
        };
        for shape in shapes {
            if shape.text.trim().is_empty() {
                continue;
            }
            if slide.title.is_empty() && shape.name.contains("Title") {
                slide.title = shape.text;
            } else {
                slide.content.push(shape.text);
            }
        }
        slide.notes = read_notes(&mut archive, part).map_err(malformed)?;
        slides.push(slide);
    }

    debug!("Read {} slides from {}", slides.len(), path.display());

    Ok(DeckOverview {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        total_slides: slides.len(),
        slides,
    })
}

/// Slide part names in presentation order.
pub(crate) fn slide_part_names<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Vec<String>, String> {
    let presentation = read_part(archive, PRESENTATION_PART)?;
    let ids = slide_rel_ids(&presentation)?;

    let rels = match read_part(archive, &rels_part_name(PRESENTATION_PART)) {
        Ok(xml) => parse_relationships(&xml)?,
        Err(_) => Vec::new(),
    };
    let targets: HashMap<&str, &str> = rels
        .iter()
        .map(|r| (r.id.as_str(), r.target.as_str()))
        .collect();

    ids.iter()
        .map(|id| {
            targets
                .get(id.as_str())
                .map(|t| resolve_target(PRESENTATION_PART, t))
                .ok_or_else(|| format!("slide relationship '{id}' has no target"))
        })
        .collect()
}

/// `r:id` of every `<p:sldId>` in `presentation.xml`, in order.
pub(crate) fn slide_rel_ids(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut ids = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"p:sldId" => {
                if let Some(id) = attr_value(&e, &reader, b"r:id") {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parse error in presentation.xml: {e}")),
            _ => {}
        }
        buf.clear();
    }
    Ok(ids)
}

pub(crate) fn parse_relationships(xml: &str) -> Result<Vec<Relationship>, String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut rels = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"Relationship" => {
                rels.push(Relationship {
                    id: attr_value(&e, &reader, b"Id").unwrap_or_default(),
                    rel_type: attr_value(&e, &reader, b"Type").unwrap_or_default(),
                    target: attr_value(&e, &reader, b"Target").unwrap_or_default(),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parse error in relationships: {e}")),
            _ => {}
        }
        buf.clear();
    }
    Ok(rels)
}

/// `ppt/slides/slide1.xml` → `ppt/slides/_rels/slide1.xml.rels`
pub(crate) fn rels_part_name(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target relative to the part that owns the rels.
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = source_part.split('/').collect();
    segments.pop();
    for seg in target.split('/') {
        match seg {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            s => segments.push(s),
        }
    }
    segments.join("/")
}

pub(crate) fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, String> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| format!("Missing {name}: {e}"))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| format!("Failed to read {name}: {e}"))?;
    Ok(content)
}

fn read_notes<R: Read + Seek>(archive: &mut ZipArchive<R>, slide_part: &str) -> Result<String, String> {
    let rels_xml = match read_part(archive, &rels_part_name(slide_part)) {
        Ok(xml) => xml,
        Err(_) => return Ok(String::new()),
    };
    let Some(notes_rel) = parse_relationships(&rels_xml)?
        .into_iter()
        .find(|r| r.rel_type == NOTES_SLIDE_REL)
    else {
        return Ok(String::new());
    };

    let notes_part = resolve_target(slide_part, &notes_rel.target);
    let xml = read_part(archive, &notes_part)?;
    let notes = parse_shapes(&xml)?
        .into_iter()
        .find(|s| s.placeholder.as_deref() == Some("body"))
        .map(|s| s.text)
        .unwrap_or_default();

    if notes.trim().is_empty() {
        Ok(String::new())
    } else {
        Ok(notes)
    }
}

fn attr_value(e: &BytesStart<'_>, reader: &Reader<&[u8]>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.decode_and_unescape_value(reader).ok())
        .map(|v| v.into_owned())
}

/// Every `<p:sp>` of a slide-like part, with its paragraphs joined by `\n`.
fn parse_shapes(xml: &str) -> Result<Vec<Shape>, String> {
    let mut reader = Reader::from_str(xml);
    // Keep whitespace inside <a:t> runs.
    reader.trim_text(false);
    let mut buf = Vec::new();

    let mut shapes = Vec::new();
    let mut current: Option<Shape> = None;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"p:sp" => {
                    current = Some(Shape::default());
                    paragraphs.clear();
                }
                b"p:cNvPr" => set_shape_name(&mut current, &e, &reader),
                b"p:ph" => set_placeholder(&mut current, &e, &reader),
                b"a:p" if current.is_some() => paragraph = Some(String::new()),
                b"a:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"p:cNvPr" => set_shape_name(&mut current, &e, &reader),
                b"p:ph" => set_placeholder(&mut current, &e, &reader),
                b"a:p" if current.is_some() => paragraphs.push(String::new()),
                b"a:br" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                if let (Some(p), Ok(text)) = (paragraph.as_mut(), t.unescape()) {
                    p.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:p" => {
                    if let Some(p) = paragraph.take() {
                        paragraphs.push(p);
                    }
                }
                b"p:sp" => {
                    if let Some(mut shape) = current.take() {
                        shape.text = paragraphs.join("\n");
                        shapes.push(shape);
                    }
                    paragraphs.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML parse error: {e}")),
            _ => {}
        }
        buf.clear();
    }
    Ok(shapes)
}

fn set_shape_name(current: &mut Option<Shape>, e: &BytesStart<'_>, reader: &Reader<&[u8]>) {
    if let Some(shape) = current.as_mut() {
        if shape.name.is_empty() {
            shape.name = attr_value(e, reader, b"name").unwrap_or_default();
        }
    }
}

fn set_placeholder(current: &mut Option<Shape>, e: &BytesStart<'_>, reader: &Reader<&[u8]>) {
    if let Some(shape) = current.as_mut() {
        // A placeholder without a type attribute is a body placeholder.
        shape.placeholder = Some(attr_value(e, reader, b"type").unwrap_or_else(|| "body".into()));
    }
}
