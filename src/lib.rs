//! # pdf2png
//!
//! Rasterise every page of a PDF held in a workspace file store and write the
//! pages back to the same store as PNG files.
//!
//! ## Pipeline Overview
//!
//! ```text
//! workspace: files/report.pdf
//!  │
//!  ├─ 1. Stage   read from the workspace, copy into {workspace_dir}/scratch/
//!  ├─ 2. Render  rasterise pages via pdfium at dpi / 72 (spawn_blocking)
//!  ├─ 3. Encode  RGB bitmap → PNG bytes, in memory
//!  ├─ 4. Write   files/report_page_{i}.png back to the workspace
//!  └─ 5. Output  {"images": ["report_page_0.png", ...]}
//! ```
//!
//! Workspace keys are rooted under `files/` by [`paths::prepend_base_path`].
//! Output names are `{base}_page_{i}.png`, where `base` is the input name
//! with one trailing `.pdf` removed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2png::{convert, ConversionConfig, HttpWorkspace};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = HttpWorkspace::new("http://127.0.0.1:9090", "ws-123")?;
//!     let config = ConversionConfig::builder()
//!         .workspace_dir("/var/run/workspace")
//!         .input_file("report.pdf")
//!         .build()?;
//!     let output = convert(&store, &config).await?;
//!     println!("{}", serde_json::to_string(&output)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2png` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod progress;
pub mod workspace;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_DPI};
pub use convert::{convert, convert_sync, convert_with};
pub use error::Pdf2PngError;
pub use output::ConversionOutput;
pub use paths::{prepend_base_path, WORKSPACE_BASE_DIR};
pub use pipeline::render::{PdfiumRasterizer, Rasterizer};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use workspace::{HttpWorkspace, LocalWorkspace, MemoryWorkspace, WorkspaceStore};
