//! Pipeline stages shared by the case-study and presentation surfaces.
//!
//! ```text
//! extract ──▶ prompts ──▶ llm ──▶ parse ──▶ docx / pptx
//! (per format) (bounded)  (one call) (never fails) (atomic write)
//! ```
//!
//! 1. [`extract`]: closed dispatch over the supported input formats; library
//!    work is blocking and runs under `spawn_blocking` in async callers
//! 2. [`deck`]: slide/notes reader for `.pptx` input
//! 3. [`llm`]: the only stage with network I/O
//! 4. [`parse`]: JSON decode with a positional-slicing fallback
//! 5. [`docx`], [`pptx`]: fixed-layout renderers; [`pdf`] exports a case
//!    study through pdfium

pub mod deck;
pub mod docx;
pub mod extract;
pub mod llm;
pub mod parse;
pub mod pdf;
pub mod pptx;

use crate::error::StudioError;
use crate::output::OutputFormat;
use std::io::Write;
use std::path::Path;

/// Fail with [`StudioError::InvalidOutputPath`] unless `path` ends in the
/// extension of `format` (case-insensitive).
pub(crate) fn ensure_extension(path: &Path, format: OutputFormat) -> Result<(), StudioError> {
    let expected = format.extension();
    let ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(expected));
    if ok {
        Ok(())
    } else {
        Err(StudioError::InvalidOutputPath {
            path: path.to_path_buf(),
            expected,
        })
    }
}

/// Write `bytes` to a temp file beside `path`, then rename it into place.
///
/// Parent directories are created as needed. On any error the temp file is
/// removed and `path` is left untouched.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StudioError> {
    let write_err = |source: std::io::Error| StudioError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_ignores_case() {
        assert!(ensure_extension(Path::new("out/DECK.PPTX"), OutputFormat::Pptx).is_ok());
        assert!(ensure_extension(Path::new("out/deck"), OutputFormat::Pptx).is_err());
        assert!(ensure_extension(Path::new("out/deck.docx"), OutputFormat::Pptx).is_err());
    }

    #[test]
    fn atomic_write_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("f.bin");
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"two");
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1, "temp file left behind");
    }
}
