//! Case-study DOCX rendering.
//!
//! Fixed layout: centred title and metadata line, one heading plus body per
//! section, bulleted metrics, grey footer naming the model. Nothing about
//! the layout is configurable.

use crate::error::StudioError;
use crate::output::{CaseStudy, OutputFormat, RenderedDocument};
use crate::pipeline::{ensure_extension, write_atomic};
use chrono::Utc;
use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, IndentLevel, Level, LevelJc, LevelText,
    NumberFormat, Numbering, NumberingId, Paragraph, Run, SpecialIndentType, Start, Style,
    StyleType,
};
use std::io::Cursor;
use std::path::Path;
use tracing::info;

const BULLETS: usize = 1;

/// Section headings in render order.
pub const SECTION_TITLES: [&str; 6] = [
    "Problem Statement",
    "Solution Approach",
    "Key Metrics",
    "Impact Summary",
    "Implementation Details",
    "Lessons Learned",
];

/// Footer prefix; the model name follows.
pub const FOOTER_PREFIX: &str = "Generated using Case Study AI Generator";

// Sizes are in half-points.
const TITLE_SIZE: usize = 36;
const METADATA_SIZE: usize = 20;
const HEADING_SIZE: usize = 26;
const FOOTER_SIZE: usize = 16;

enum Section<'a> {
    Text(&'a str),
    List(&'a [String]),
}

/// Build the DOCX package in memory.
pub fn render_case_study(case_study: &CaseStudy) -> Result<Vec<u8>, StudioError> {
    let meta = &case_study.metadata;
    let body = &case_study.body;

    let mut docx = Docx::new()
        .add_style(
            Style::new("Heading2", StyleType::Paragraph)
                .name("Heading 2")
                .size(HEADING_SIZE)
                .bold()
                .color("2E74B5"),
        )
        .add_style(Style::new("ListBullet", StyleType::Paragraph).name("List Bullet"))
        .add_abstract_numbering(
            AbstractNumbering::new(BULLETS).add_level(
                Level::new(
                    0,
                    Start::new(1),
                    NumberFormat::new("bullet"),
                    LevelText::new("•"),
                    LevelJc::new("left"),
                )
                .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
            ),
        )
        .add_numbering(Numbering::new(BULLETS, BULLETS))
        .add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(format!("{} - Case Study", meta.project_name))
                        .size(TITLE_SIZE)
                        .bold(),
                )
                .align(AlignmentType::Center),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(format!(
                            "Client: {} | Industry: {}",
                            meta.client_name, meta.industry
                        ))
                        .size(METADATA_SIZE)
                        .italic(),
                )
                .align(AlignmentType::Center),
        )
        .add_paragraph(Paragraph::new());

    let sections = [
        Section::Text(&body.problem_statement),
        Section::Text(&body.solution_approach),
        Section::List(&body.key_metrics),
        Section::Text(&body.impact_summary),
        Section::Text(&body.implementation_details),
        Section::Text(&body.lessons_learned),
    ];

    for (title, section) in SECTION_TITLES.iter().zip(sections) {
        docx = docx.add_paragraph(
            Paragraph::new()
                .style("Heading2")
                .add_run(Run::new().add_text(*title)),
        );
        docx = match section {
            Section::Text(text) => docx.add_paragraph(Paragraph::new().add_run(text_run(text))),
            Section::List(items) => items.iter().fold(docx, |d, item| {
                d.add_paragraph(
                    Paragraph::new()
                        .style("ListBullet")
                        .numbering(NumberingId::new(BULLETS), IndentLevel::new(0))
                        .add_run(text_run(item)),
                )
            }),
        };
        docx = docx.add_paragraph(Paragraph::new());
    }

    docx = docx.add_paragraph(
        Paragraph::new().add_run(
            Run::new()
                .add_break(BreakType::TextWrapping)
                .add_text(format!("{FOOTER_PREFIX} | {}", meta.model_used))
                .size(FOOTER_SIZE)
                .italic()
                .color("808080"),
        ),
    );

    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).map_err(|e| StudioError::Render {
        detail: format!("DOCX packaging failed: {e}"),
    })?;
    Ok(buf.into_inner())
}

/// Render and write `case_study` to `path` (must end in `.docx`).
///
/// The extension is checked before anything is built or written; the file
/// appears at `path` complete or not at all.
pub fn save_case_study(case_study: &CaseStudy, path: &Path) -> Result<RenderedDocument, StudioError> {
    ensure_extension(path, OutputFormat::Docx)?;
    let bytes = render_case_study(case_study)?;
    write_atomic(path, &bytes)?;
    info!("Case study written to {} ({} bytes)", path.display(), bytes.len());
    Ok(RenderedDocument {
        file_path: path.to_path_buf(),
        format: OutputFormat::Docx,
        created_at: Utc::now(),
    })
}

/// Write `case_study` as pretty-printed JSON to `path` (must end in `.json`).
pub fn save_case_study_json(
    case_study: &CaseStudy,
    path: &Path,
) -> Result<RenderedDocument, StudioError> {
    ensure_extension(path, OutputFormat::Json)?;
    let json = serde_json::to_vec_pretty(case_study)
        .map_err(|e| StudioError::Internal(format!("case study JSON: {e}")))?;
    write_atomic(path, &json)?;
    Ok(RenderedDocument {
        file_path: path.to_path_buf(),
        format: OutputFormat::Json,
        created_at: Utc::now(),
    })
}

/// One run per paragraph; embedded newlines become line breaks.
fn text_run(text: &str) -> Run {
    text.split('\n')
        .enumerate()
        .fold(Run::new(), |run, (i, line)| {
            let run = if i > 0 {
                run.add_break(BreakType::TextWrapping)
            } else {
                run
            };
            run.add_text(line)
        })
}
