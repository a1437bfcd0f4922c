//! Pipeline stages for PDF-to-PNG conversion.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the rendering backend can be swapped without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ naming ──▶ workspace write
//! (stage)   (pdfium)   (PNG)      (page names)
//! ```
//!
//! 1. [`input`]: create the scratch directory and copy the PDF out of the
//!    workspace into it
//! 2. [`render`]: rasterise every page at `dpi / 72`; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`encode`]: PNG-encode each page into an in-memory buffer
//! 4. [`naming`]: derive `{base}_page_{i}.png` output names

pub mod encode;
pub mod input;
pub mod naming;
pub mod render;
