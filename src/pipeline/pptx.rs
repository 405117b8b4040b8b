//! Executive-summary PPTX rendering.
//!
//! The package is written part by part with `zip`: one blank-layout slide
//! on a 10in × 7.5in canvas, white background, a centred 44pt title, an
//! optional 18pt subtitle and a word-wrapped 16pt body. Every summary line
//! becomes one body paragraph.
//!
//! [`insert_summary_slide`] instead copies an existing deck and splices the
//! same slide in front of its first slide.

use crate::error::StudioError;
use crate::output::{OutputFormat, RenderedDocument, SummarySlide};
use crate::pipeline::deck::{
    parse_relationships, read_part, rels_part_name, resolve_target, slide_part_names,
    PRESENTATION_PART,
};
use crate::pipeline::{ensure_extension, write_atomic};
use chrono::Utc;
use quick_xml::escape::escape;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const EMU_PER_INCH: f64 = 914_400.0;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";

const TITLE_COLOR: &str = "003366";
const SUBTITLE_COLOR: &str = "646464";
const BODY_COLOR: &str = "000000";

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Position and size of a text box, in inches.
#[derive(Debug, Clone, Copy)]
struct BoxGeometry {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl BoxGeometry {
    fn xfrm(self) -> String {
        format!(
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            emu(self.left),
            emu(self.top),
            emu(self.width),
            emu(self.height)
        )
    }
}

const TITLE_BOX: BoxGeometry = BoxGeometry {
    left: 0.5,
    top: 0.5,
    width: 9.0,
    height: 1.0,
};
const SUBTITLE_BOX: BoxGeometry = BoxGeometry {
    left: 0.5,
    top: 1.6,
    width: 9.0,
    height: 0.5,
};
const BODY_TOP_WITH_SUBTITLE: f64 = 2.3;
const BODY_TOP: f64 = 1.8;

fn body_box(has_subtitle: bool) -> BoxGeometry {
    BoxGeometry {
        left: 0.8,
        top: if has_subtitle { BODY_TOP_WITH_SUBTITLE } else { BODY_TOP },
        width: 8.4,
        height: 5.0,
    }
}

/// Render a one-slide deck in memory.
pub fn render_summary_deck(slide: &SummarySlide) -> Result<Vec<u8>, StudioError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let parts: [(&str, String); 13] = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", package_rels_xml()),
        ("docProps/core.xml", core_props_xml()),
        ("docProps/app.xml", app_props_xml()),
        (PRESENTATION_PART, presentation_xml()),
        ("ppt/_rels/presentation.xml.rels", presentation_rels_xml()),
        ("ppt/slideMasters/slideMaster1.xml", slide_master_xml()),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            rels_xml(&[
                ("rId1", REL_LAYOUT, "../slideLayouts/slideLayout1.xml"),
                ("rId2", REL_THEME, "../theme/theme1.xml"),
            ]),
        ),
        ("ppt/slideLayouts/slideLayout1.xml", slide_layout_xml()),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            rels_xml(&[("rId1", REL_MASTER, "../slideMasters/slideMaster1.xml")]),
        ),
        ("ppt/slides/slide1.xml", slide_xml(slide)),
        (
            "ppt/slides/_rels/slide1.xml.rels",
            rels_xml(&[("rId1", REL_LAYOUT, "../slideLayouts/slideLayout1.xml")]),
        ),
        ("ppt/theme/theme1.xml", THEME_XML.to_string()),
    ];
    for (name, xml) in parts {
        write_entry(&mut zip, name, &xml)?;
    }
    finish(zip)
}

/// Render and write a one-slide deck to `path` (must end in `.pptx`).
///
/// The extension is checked before anything is built or written.
pub fn save_summary_deck(slide: &SummarySlide, path: &Path) -> Result<RenderedDocument, StudioError> {
    ensure_extension(path, OutputFormat::Pptx)?;
    let bytes = render_summary_deck(slide)?;
    write_atomic(path, &bytes)?;
    info!("Summary deck written to {} ({} bytes)", path.display(), bytes.len());
    Ok(rendered(path))
}

/// Copy `original` to `output` with the summary slide inserted as slide 1.
pub fn insert_summary_slide(
    original: &Path,
    slide: &SummarySlide,
    output: &Path,
) -> Result<RenderedDocument, StudioError> {
    ensure_extension(output, OutputFormat::Pptx)?;
    let file = File::open(original).map_err(|_| StudioError::NotFound {
        path: original.to_path_buf(),
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| render_err(format!("{e}")))?;
    let bytes = splice_slide(&mut archive, slide)?;
    write_atomic(output, &bytes)?;
    info!(
        "Summary slide inserted into copy of {} at {}",
        original.display(),
        output.display()
    );
    Ok(rendered(output))
}

fn splice_slide<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    slide: &SummarySlide,
) -> Result<Vec<u8>, StudioError> {
    let existing = slide_part_names(archive).map_err(render_err)?;
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();

    // Fresh slide part name.
    let next = (1..)
        .find(|n| !names.iter().any(|f| f == &format!("ppt/slides/slide{n}.xml")))
        .unwrap_or(1);
    let slide_part = format!("ppt/slides/slide{next}.xml");

    let layout = layout_for_new_slide(archive, &existing, &names)?;
    let layout_target = relative_from_slides(&layout);

    let presentation = read_part(archive, PRESENTATION_PART).map_err(render_err)?;
    let pres_rels_name = rels_part_name(PRESENTATION_PART);
    let pres_rels = read_part(archive, &pres_rels_name).map_err(render_err)?;
    let content_types = read_part(archive, "[Content_Types].xml").map_err(render_err)?;

    let used: HashSet<String> = parse_relationships(&pres_rels)
        .map_err(render_err)?
        .into_iter()
        .map(|r| r.id)
        .collect();
    let rel_id = (1..)
        .map(|n| format!("rId{n}"))
        .find(|id| !used.contains(id))
        .unwrap_or_else(|| "rIdSummary".to_string());

    let presentation = insert_slide_id(&presentation, &rel_id)?;
    let pres_rels = insert_before(
        &pres_rels,
        "</Relationships>",
        &format!(
            r#"<Relationship Id="{rel_id}" Type="{REL_SLIDE}" Target="slides/slide{next}.xml"/>"#
        ),
    )?;
    let content_types = insert_before(
        &content_types,
        "</Types>",
        &format!(r#"<Override PartName="/{slide_part}" ContentType="{CT_SLIDE}"/>"#),
    )?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(|e| render_err(format!("{e}")))?;
        let name = entry.name().to_string();
        match name.as_str() {
            PRESENTATION_PART => {
                drop(entry);
                write_entry(&mut zip, &name, &presentation)?;
            }
            "[Content_Types].xml" => {
                drop(entry);
                write_entry(&mut zip, &name, &content_types)?;
            }
            n if n == pres_rels_name => {
                drop(entry);
                write_entry(&mut zip, &name, &pres_rels)?;
            }
            _ => zip
                .raw_copy_file(entry)
                .map_err(|e| render_err(format!("copying {name}: {e}")))?,
        }
    }
    write_entry(&mut zip, &slide_part, &slide_xml(slide))?;
    write_entry(
        &mut zip,
        &rels_part_name(&slide_part),
        &rels_xml(&[("rId1", REL_LAYOUT, &layout_target)]),
    )?;
    debug!("Spliced {} as {} ({})", slide_part, rel_id, layout);
    finish(zip)
}

/// Layout of the deck's first slide, else any layout in the package.
fn layout_for_new_slide<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    existing: &[String],
    names: &[String],
) -> Result<String, StudioError> {
    if let Some(first) = existing.first() {
        if let Ok(xml) = read_part(archive, &rels_part_name(first)) {
            let rels = parse_relationships(&xml).map_err(render_err)?;
            if let Some(rel) = rels.iter().find(|r| r.rel_type == REL_LAYOUT) {
                return Ok(resolve_target(first, &rel.target));
            }
        }
    }
    names
        .iter()
        .filter(|n| n.starts_with("ppt/slideLayouts/") && n.ends_with(".xml"))
        .min()
        .cloned()
        .ok_or_else(|| render_err("presentation has no slide layouts".to_string()))
}

/// `ppt/slideLayouts/x.xml` as seen from `ppt/slides/`.
fn relative_from_slides(part: &str) -> String {
    match part.strip_prefix("ppt/") {
        Some(rest) => format!("../{rest}"),
        None => format!("/{part}"),
    }
}

/// Put a new `<p:sldId>` first in `sldIdLst`, creating the list if absent.
fn insert_slide_id(presentation: &str, rel_id: &str) -> Result<String, StudioError> {
    let max_id = slide_ids(presentation).into_iter().max().unwrap_or(255);
    let entry = format!(r#"<p:sldId id="{}" r:id="{rel_id}"/>"#, max_id + 1);

    if let Some(pos) = presentation.find("<p:sldIdLst>") {
        let at = pos + "<p:sldIdLst>".len();
        return Ok(format!("{}{entry}{}", &presentation[..at], &presentation[at..]));
    }
    if presentation.contains("<p:sldIdLst/>") {
        return Ok(presentation.replacen(
            "<p:sldIdLst/>",
            &format!("<p:sldIdLst>{entry}</p:sldIdLst>"),
            1,
        ));
    }
    insert_after(
        presentation,
        "</p:sldMasterIdLst>",
        &format!("<p:sldIdLst>{entry}</p:sldIdLst>"),
    )
}

/// Numeric `id` of every `<p:sldId>`.
fn slide_ids(presentation: &str) -> Vec<u32> {
    presentation
        .split("<p:sldId ")
        .skip(1)
        .filter_map(|chunk| {
            let rest = chunk.split(" id=\"").nth(1).or_else(|| chunk.strip_prefix("id=\""))?;
            rest.split('"').next()?.parse().ok()
        })
        .collect()
}

fn insert_before(xml: &str, marker: &str, insert: &str) -> Result<String, StudioError> {
    let pos = xml
        .rfind(marker)
        .ok_or_else(|| render_err(format!("missing {marker}")))?;
    Ok(format!("{}{insert}{}", &xml[..pos], &xml[pos..]))
}

fn insert_after(xml: &str, marker: &str, insert: &str) -> Result<String, StudioError> {
    let pos = xml
        .find(marker)
        .ok_or_else(|| render_err(format!("missing {marker}")))?
        + marker.len();
    Ok(format!("{}{insert}{}", &xml[..pos], &xml[pos..]))
}

fn write_entry<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str, xml: &str) -> Result<(), StudioError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(name, options)
        .map_err(|e| render_err(format!("{name}: {e}")))?;
    zip.write_all(xml.as_bytes())
        .map_err(|e| render_err(format!("{name}: {e}")))
}

fn finish(zip: ZipWriter<Cursor<Vec<u8>>>) -> Result<Vec<u8>, StudioError> {
    zip.finish()
        .map(Cursor::into_inner)
        .map_err(|e| render_err(format!("{e}")))
}

fn render_err(detail: String) -> StudioError {
    StudioError::Render {
        detail: format!("PPTX: {detail}"),
    }
}

fn rendered(path: &Path) -> RenderedDocument {
    RenderedDocument {
        file_path: path.to_path_buf(),
        format: OutputFormat::Pptx,
        created_at: Utc::now(),
    }
}

// ── Slide XML ────────────────────────────────────────────────────────────

fn slide_xml(slide: &SummarySlide) -> String {
    let subtitle = slide.subtitle.as_deref().filter(|s| !s.is_empty());

    let mut shapes = text_box(
        2,
        "Title 1",
        TITLE_BOX,
        true,
        &paragraph(&slide.title, CENTERED_PPR, 4400, true, TITLE_COLOR),
    );
    let mut next_id = 3;
    if let Some(sub) = subtitle {
        shapes.push_str(&text_box(
            next_id,
            "Subtitle 2",
            SUBTITLE_BOX,
            false,
            &paragraph(sub, CENTERED_PPR, 1800, false, SUBTITLE_COLOR),
        ));
        next_id += 1;
    }

    let body: String = slide
        .summary
        .split('\n')
        .map(|line| paragraph(line, BODY_PPR, 1600, false, BODY_COLOR))
        .collect();
    shapes.push_str(&text_box(
        next_id,
        "Content 3",
        body_box(subtitle.is_some()),
        true,
        &body,
    ));

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn text_box(id: u32, name: &str, geometry: BoxGeometry, wrap: bool, paragraphs: &str) -> String {
    let wrap = if wrap { "square" } else { "none" };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="{wrap}" rtlCol="0"/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        geometry.xfrm()
    )
}

const CENTERED_PPR: &str = r#"<a:pPr algn="ctr"/>"#;
const BODY_PPR: &str = r#"<a:pPr lvl="0"><a:spcBef><a:spcPts val="600"/></a:spcBef><a:spcAft><a:spcPts val="600"/></a:spcAft></a:pPr>"#;

fn paragraph(text: &str, ppr: &str, size: u32, bold: bool, color: &str) -> String {
    let b = if bold { r#" b="1""# } else { "" };
    let rpr_fill = format!(r#"<a:solidFill><a:srgbClr val="{color}"/></a:solidFill>"#);
    if text.is_empty() {
        return format!(
            r#"<a:p>{ppr}<a:endParaRPr lang="en-US" sz="{size}"{b} dirty="0">{rpr_fill}</a:endParaRPr></a:p>"#
        );
    }
    format!(
        r#"<a:p>{ppr}<a:r><a:rPr lang="en-US" sz="{size}"{b} dirty="0">{rpr_fill}</a:rPr><a:t>{}</a:t></a:r></a:p>"#,
        escape(text)
    )
}

// ── Package skeleton ─────────────────────────────────────────────────────

fn rels_xml(rels: &[(&str, &str, &str)]) -> String {
    let body: String = rels
        .iter()
        .map(|(id, ty, target)| {
            format!(r#"<Relationship Id="{id}" Type="{ty}" Target="{target}"/>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_PKG_RELS}">{body}</Relationships>"#
    )
}

fn content_types_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/slides/slide1.xml" ContentType="{CT_SLIDE}"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#
    )
}

fn package_rels_xml() -> String {
    rels_xml(&[
        (
            "rId1",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
            "ppt/presentation.xml",
        ),
        (
            "rId2",
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties",
            "docProps/core.xml",
        ),
        (
            "rId3",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties",
            "docProps/app.xml",
        ),
    ])
}

fn core_props_xml() -> String {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>Executive Summary</dc:title><dc:creator>docstudio</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified></cp:coreProperties>"#
    )
}

fn app_props_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>docstudio</Application><Slides>1</Slides></Properties>"#
        .to_string()
}

fn presentation_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        emu(10.0),
        emu(7.5)
    )
}

fn presentation_rels_xml() -> String {
    rels_xml(&[
        ("rId1", REL_MASTER, "slideMasters/slideMaster1.xml"),
        ("rId2", REL_SLIDE, "slides/slide1.xml"),
        ("rId3", REL_THEME, "theme/theme1.xml"),
    ])
}

fn slide_master_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn slide_layout_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#;
