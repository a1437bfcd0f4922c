//! Error types for the pdf2png library.
//!
//! Every failure is fatal: the conversion either completes end-to-end or
//! aborts on the first error. Pages already written to the workspace are
//! left in place. A single [`Pdf2PngError`] therefore covers the whole run,
//! grouped below by the stage that raises it.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2png library.
#[derive(Debug, Error)]
pub enum Pdf2PngError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// A required setting was missing or empty.
    #[error("Required setting '{name}' is missing or empty.\nSet the {env} environment variable.")]
    MissingSetting {
        name: &'static str,
        env: &'static str,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// The input name cannot be mapped to a local file name.
    #[error("Invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    /// The file exists in the workspace, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: Vec<u8> },

    // ── Workspace errors ──────────────────────────────────────────────────
    /// The workspace has no file at the given path.
    #[error("Workspace file not found: '{path}'")]
    WorkspaceNotFound { path: String },

    /// The workspace could not be reached or refused the read.
    #[error("Failed to read '{path}' from the workspace: {reason}")]
    WorkspaceReadFailed { path: String, reason: String },

    /// The workspace could not be reached or rejected the write.
    #[error("Failed to write '{path}' to the workspace: {reason}")]
    WorkspaceWriteFailed { path: String, reason: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with PDF2PNG_PASSWORD.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium-render returned an error for a specific page (0-indexed).
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// PNG encoding of a rendered page failed.
    #[error("PNG encoding failed for page {page}: {source}")]
    EncodeFailed {
        page: usize,
        #[source]
        source: image::ImageError,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the scratch directory or write the staged input.
    #[error("Failed to write scratch file '{path}': {source}")]
    ScratchWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium on the system library path, or\n\
set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
