//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to be told
//! how many pages were rendered and when each PNG lands in the workspace.
//!
//! # Example
//!
//! ```rust
//! use pdf2png::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_written(&self, page_index: usize, total_pages: usize, file_name: &str, png_bytes: usize) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{file_name} ({}/{total_pages}, {png_bytes} bytes)", page_index + 1);
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .workspace_dir("/tmp/ws")
//!     .input_file("report.pdf")
//!     .progress_callback(Arc::new(CountingCallback { written: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it writes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. With `write_concurrency > 1` the page events may
/// arrive out of page order.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after rasterisation, before any page is written.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page's PNG has been written to the workspace.
    ///
    /// # Arguments
    /// * `page_index`: 0-indexed page number
    /// * `total_pages`: pages in the document
    /// * `file_name`: generated name, e.g. `report_page_0.png`
    /// * `png_bytes`: encoded size
    fn on_page_written(
        &self,
        page_index: usize,
        total_pages: usize,
        file_name: &str,
        png_bytes: usize,
    ) {
        let _ = (page_index, total_pages, file_name, png_bytes);
    }

    /// Called once after every page has been written.
    fn on_conversion_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
