//! Stage callbacks for the presentation summarizer.
//!
//! Pass an implementation of [`SummaryProgressCallback`] to
//! [`crate::summarize::run_deck_summary`] to hear about each stage as it
//! starts and finishes. The CLI uses it to drive a spinner; library callers
//! that don't care pass [`NoopProgress`].
//!
//! # Example
//!
//! ```rust
//! use docstudio::progress::SummaryProgressCallback;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct SlideCounter(AtomicUsize);
//!
//! impl SummaryProgressCallback for SlideCounter {
//!     fn on_deck_read(&self, total_slides: usize) {
//!         self.0.store(total_slides, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = SlideCounter(AtomicUsize::new(0));
//! counter.on_deck_read(12);
//! assert_eq!(counter.0.load(Ordering::SeqCst), 12);
//! ```

use std::path::Path;

/// Called by the summarizer as it moves through its stages.
///
/// Every method has a no-op default so implementations only override the
/// events they care about.
pub trait SummaryProgressCallback: Send + Sync {
    /// Before the input deck is opened.
    fn on_read_start(&self, path: &Path) {
        let _ = path;
    }

    /// After the deck has been read.
    fn on_deck_read(&self, total_slides: usize) {
        let _ = total_slides;
    }

    /// Before the summary request is sent.
    fn on_summary_start(&self, max_words: usize) {
        let _ = max_words;
    }

    /// After the summary reply arrived.
    fn on_summary_complete(&self, summary_len: usize) {
        let _ = summary_len;
    }

    /// Before the title request is sent.
    fn on_title_start(&self) {}

    /// After a title was chosen (generated or fallback).
    fn on_title_complete(&self, title: &str) {
        let _ = title;
    }

    /// Before the output deck is written.
    fn on_render_start(&self, output: &Path) {
        let _ = output;
    }

    /// After the output deck is on disk.
    fn on_render_complete(&self, output: &Path) {
        let _ = output;
    }
}

/// Ignores every event.
pub struct NoopProgress;

impl SummaryProgressCallback for NoopProgress {}
