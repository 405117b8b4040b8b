//! Case-study PDF export.
//!
//! A4 portrait with 50pt margins in the standard Helvetica faces. The page
//! content is laid out first as a flat list of [`PdfLine`]s, then painted
//! with pdfium, breaking onto a new page whenever the bottom margin is
//! reached. Line widths are estimated from an average glyph width, which is
//! close enough for Helvetica body text.

use crate::error::StudioError;
use crate::output::{CaseStudy, OutputFormat, RenderedDocument};
use crate::pipeline::docx::SECTION_TITLES;
use crate::pipeline::extract::bind_pdfium;
use crate::pipeline::{ensure_extension, write_atomic};
use chrono::{Local, Utc};
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::info;

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 50.0;

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 9.0;
const LINE_SPACING: f32 = 1.3;
// Helvetica averages roughly half an em per glyph.
const AVG_GLYPH_EM: f32 = 0.5;
const FOOTER_GRAY: PdfColor = PdfColor::new(153, 153, 153, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
    Italic,
}

/// One painted line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLine {
    pub text: String,
    pub face: Face,
    pub size: f32,
    pub centered: bool,
    pub muted: bool,
    /// Extra vertical gap above the line, in points.
    pub space_before: f32,
}

impl PdfLine {
    fn new(text: impl Into<String>, face: Face, size: f32) -> Self {
        Self {
            text: text.into(),
            face,
            size,
            centered: false,
            muted: false,
            space_before: 0.0,
        }
    }

    fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    fn gap(mut self, points: f32) -> Self {
        self.space_before = points;
        self
    }
}

/// Estimated rendered width of `text` at `size` points.
pub fn estimated_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_EM
}

/// Greedy word wrap to `width` points. Embedded newlines start new lines;
/// a single word wider than the line is split by characters.
pub fn wrap_text(text: &str, size: f32, width: f32) -> Vec<String> {
    let max_chars = ((width / (size * AVG_GLYPH_EM)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let mut line = String::new();
        for word in raw.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..max_chars).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = line.chars().count() + usize::from(!line.is_empty()) + word.chars().count();
            if needed > max_chars && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        lines.push(line);
    }
    lines
}

/// Lay out `case_study` as lines, top to bottom.
pub fn layout_case_study(case_study: &CaseStudy, generated_on: &str) -> Vec<PdfLine> {
    let meta = &case_study.metadata;
    let body = &case_study.body;
    let width = PAGE_WIDTH - 2.0 * MARGIN;
    let mut lines = vec![
        PdfLine::new("CASE STUDY", Face::Bold, TITLE_SIZE).centered(),
        PdfLine::new(meta.project_name.as_str(), Face::Bold, HEADING_SIZE).gap(8.0),
        PdfLine::new(format!("Client: {}", meta.client_name), Face::Regular, BODY_SIZE),
        PdfLine::new(format!("Industry: {}", meta.industry), Face::Regular, BODY_SIZE),
    ];

    let paragraph = |lines: &mut Vec<PdfLine>, text: &str| {
        for wrapped in wrap_text(text, BODY_SIZE, width) {
            lines.push(PdfLine::new(wrapped, Face::Regular, BODY_SIZE));
        }
    };

    let texts = [
        Some(body.problem_statement.as_str()),
        Some(body.solution_approach.as_str()),
        None,
        Some(body.impact_summary.as_str()),
        Some(body.implementation_details.as_str()),
        Some(body.lessons_learned.as_str()),
    ];
    for (title, text) in SECTION_TITLES.iter().zip(texts) {
        lines.push(PdfLine::new(*title, Face::Bold, HEADING_SIZE).gap(12.0));
        match text {
            Some(text) => paragraph(&mut lines, text),
            None => {
                for metric in &body.key_metrics {
                    paragraph(&mut lines, &format!("• {metric}"));
                }
            }
        }
    }

    let mut footer = PdfLine::new(
        format!("Generated on {generated_on} | {}", meta.model_used),
        Face::Italic,
        FOOTER_SIZE,
    )
    .centered()
    .gap(16.0);
    footer.muted = true;
    lines.push(footer);
    lines
}

fn pdf_err(e: PdfiumError) -> StudioError {
    StudioError::Render {
        detail: format!("PDF rendering failed: {e:?}"),
    }
}

/// Render `case_study` to PDF bytes. Blocking; binds pdfium on each call.
pub fn render_case_study_pdf(case_study: &CaseStudy) -> Result<Vec<u8>, StudioError> {
    let lines = layout_case_study(case_study, &Local::now().format("%Y-%m-%d").to_string());

    let pdfium = bind_pdfium().map_err(|e| StudioError::Render {
        detail: e.to_string(),
    })?;
    let mut document = pdfium.create_new_pdf().map_err(pdf_err)?;
    let regular = document.fonts_mut().helvetica();
    let bold = document.fonts_mut().helvetica_bold();
    let italic = document.fonts_mut().helvetica_oblique();

    let mut page = document
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::a4())
        .map_err(pdf_err)?;
    let mut pages = 1;
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in &lines {
        let leading = line.size * LINE_SPACING;
        y -= line.space_before + leading;
        if y < MARGIN {
            page = document
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::a4())
                .map_err(pdf_err)?;
            pages += 1;
            y = PAGE_HEIGHT - MARGIN - leading;
        }
        if line.text.is_empty() {
            continue;
        }

        let x = if line.centered {
            ((PAGE_WIDTH - estimated_width(&line.text, line.size)) / 2.0).max(MARGIN)
        } else {
            MARGIN
        };
        let font = match line.face {
            Face::Regular => regular,
            Face::Bold => bold,
            Face::Italic => italic,
        };
        let mut object = page
            .objects_mut()
            .create_text_object(
                PdfPoints::new(x),
                PdfPoints::new(y),
                &line.text,
                font,
                PdfPoints::new(line.size),
            )
            .map_err(pdf_err)?;
        if line.muted {
            object.set_fill_color(FOOTER_GRAY).map_err(pdf_err)?;
        }
    }
    drop(page);

    let bytes = document.save_to_bytes().map_err(pdf_err)?;
    info!("Case study PDF rendered: {} page(s), {} bytes", pages, bytes.len());
    Ok(bytes)
}

/// Render and write `case_study` to `path` (must end in `.pdf`).
pub fn save_case_study_pdf(case_study: &CaseStudy, path: &Path) -> Result<RenderedDocument, StudioError> {
    ensure_extension(path, OutputFormat::Pdf)?;
    let bytes = render_case_study_pdf(case_study)?;
    write_atomic(path, &bytes)?;
    Ok(RenderedDocument {
        file_path: path.to_path_buf(),
        format: OutputFormat::Pdf,
        created_at: Utc::now(),
    })
}
