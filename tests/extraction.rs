//! Extraction against real files of each supported format.
//!
//! The PDF test needs a pdfium shared library and is skipped unless
//! `PDFIUM_LIB_PATH` points at one.

mod common;

use common::fixtures::{write_docx, write_file, write_pptx, write_xlsx, NotesShape};
use docstudio::pipeline::extract::{extract_documents, DocumentSource};
use docstudio::{extract_content, DocumentFormat, ExtractError, StudioError};
use std::path::PathBuf;

#[test]
fn two_sheet_workbook_in_order_with_empty_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.xlsx");
    write_xlsx(
        &path,
        &[
            (
                "A",
                vec![
                    vec![Some("Region"), Some("Revenue")],
                    vec![Some("North"), None, Some("flag")],
                ],
            ),
            ("B", vec![vec![Some("only")]]),
        ],
    );

    let text = extract_content(&path).unwrap();
    let a = text.find("=== Sheet: A ===").expect("sheet A marker");
    let b = text.find("=== Sheet: B ===").expect("sheet B marker");
    assert!(a < b, "sheets out of order:\n{text}");
    assert!(text.contains("North |  | flag"), "{text}");
    assert!(text.contains("only"));
    assert!(!text.contains("None"));
    assert!(!text.contains("null"));
}

#[test]
fn docx_tables_follow_paragraphs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.docx");
    write_docx(
        &path,
        &["Executive overview", "", "Second paragraph"],
        &[vec!["Metric", "Value"], vec!["Uptime", "99.9%"]],
    );

    let text = extract_content(&path).unwrap();
    assert_eq!(
        text,
        "Executive overview\nSecond paragraph\nMetric\nValue\nUptime\n99.9%"
    );
}

#[test]
fn unsupported_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "tool.exe", b"MZ");
    match extract_content(&path) {
        Err(StudioError::Extraction(ExtractError::UnsupportedFormat { extension })) => {
            assert_eq!(extension, "exe")
        }
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn speaker_notes_reach_the_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.pptx");
    write_pptx(
        &path,
        &[
            (
                "T",
                "S",
                Some(NotesShape {
                    placeholder: "body",
                    text: "Say hello",
                }),
            ),
            (
                "Second",
                "More",
                Some(NotesShape {
                    placeholder: "sldNum",
                    text: "2",
                }),
            ),
            ("Third", "Last", None),
        ],
    );

    let deck = docstudio::read_deck(&path).unwrap();
    assert_eq!(deck.total_slides, 3);
    assert_eq!(deck.slides[0].title, "T");
    assert_eq!(deck.slides[0].content, vec!["S".to_string()]);
    assert_eq!(deck.slides[0].notes, "Say hello");
    assert_eq!(deck.slides[1].notes, "", "no body placeholder in notes part");
    assert_eq!(deck.slides[2].notes, "");

    let transcript = deck.transcript();
    assert!(
        transcript.starts_with("Slide 1: T\nS\nNotes: Say hello\n"),
        "{transcript}"
    );
    assert_eq!(transcript.matches("Notes:").count(), 1);
}

#[tokio::test]
async fn one_bad_file_does_not_sink_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(dir.path(), "notes.txt", "Q1 revenue grew 20%.".as_bytes());
    let bad = write_file(dir.path(), "broken.docx", b"not a zip");
    let sources = vec![
        DocumentSource {
            path: bad,
            name: "broken.docx".into(),
        },
        DocumentSource {
            path: good,
            name: "notes.txt".into(),
        },
    ];

    let docs = extract_documents(&sources).await;
    assert_eq!(docs.len(), 2);
    assert!(docs[0].failed);
    assert!(docs[0].text.starts_with("Error processing: "));
    assert!(!docs[1].failed);
    assert_eq!(docs[1].text, "Q1 revenue grew 20%.");
}

#[test]
fn pdf_text_in_page_order() {
    use pdfium_render::prelude::*;

    let Some(lib) = std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from) else {
        println!("SKIP — set PDFIUM_LIB_PATH to run the PDF extraction test");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two-pages.pdf");

    {
        let pdfium = pdfium_auto::bind_pdfium_from_path(&lib).unwrap();
        let mut document = pdfium.create_new_pdf().unwrap();
        let font = document.fonts_mut().helvetica();
        for text in ["First page text", "Second page text"] {
            let mut page = document
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::a4())
                .unwrap();
            page.objects_mut()
                .create_text_object(
                    PdfPoints::new(72.0),
                    PdfPoints::new(720.0),
                    text,
                    font,
                    PdfPoints::new(14.0),
                )
                .unwrap();
        }
        document.save_to_file(&path).unwrap();
    }

    assert_eq!(DocumentFormat::from_path(&path).unwrap(), DocumentFormat::Pdf);
    let text = extract_content(&path).unwrap();
    let first = text.find("First page text").expect("page 1 text");
    let second = text.find("Second page text").expect("page 2 text");
    assert!(first < second);
}
