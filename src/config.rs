//! Configuration types for PDF-to-PNG conversion.
//!
//! Everything a run needs is carried in one [`ConversionConfig`], built once
//! at startup via [`ConversionConfigBuilder`] and passed by reference into
//! [`crate::convert::convert`]. The library never reads the environment
//! itself; the `pdf2png` binary maps environment variables and flags onto the
//! builder.

use crate::error::Pdf2PngError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Default rendering resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 300;

/// Accepted DPI range. 72 is the PDF's native unit; 600 keeps an A4 page
/// below ~35 megapixels.
pub const DPI_RANGE: std::ops::RangeInclusive<u32> = 72..=600;

/// Name of the scratch directory created under the workspace root.
pub const SCRATCH_DIR_NAME: &str = "scratch";

/// Configuration for a PDF-to-PNG conversion.
///
/// # Example
/// ```rust
/// use pdf2png::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .workspace_dir("/var/run/workspace")
///     .input_file("report.pdf")
///     .dpi(150)
///     .build()
///     .unwrap();
/// assert_eq!(config.scratch_dir().to_str(), Some("/var/run/workspace/scratch"));
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Local workspace root. The scratch directory is created beneath it.
    pub workspace_dir: PathBuf,

    /// Workspace-relative path of the PDF to convert, e.g. `report.pdf` or
    /// `files/reports/q3.pdf`.
    pub input_file: String,

    /// Rendering DPI. Range: 72–600. Default: 300.
    ///
    /// Pages are scaled by `dpi / 72` on both axes.
    pub dpi: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Number of page writes allowed in flight at once. Default: 1.
    ///
    /// Output names never collide, so overlapping writes are safe; the
    /// returned list stays in page order regardless.
    pub write_concurrency: usize,

    /// Explicit pdfium shared library. If None, the system library is used.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::new(),
            input_file: String::new(),
            dpi: DEFAULT_DPI,
            password: None,
            write_concurrency: 1,
            pdfium_lib_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("workspace_dir", &self.workspace_dir)
            .field("input_file", &self.input_file)
            .field("dpi", &self.dpi)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("write_concurrency", &self.write_concurrency)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// `{workspace_dir}/scratch`.
    pub fn scratch_dir(&self) -> PathBuf {
        self.workspace_dir.join(SCRATCH_DIR_NAME)
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn workspace_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.workspace_dir = dir.into();
        self
    }

    pub fn input_file(mut self, file: impl Into<String>) -> Self {
        self.config.input_file = file.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(*DPI_RANGE.start(), *DPI_RANGE.end());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn write_concurrency(mut self, n: usize) -> Self {
        self.config.write_concurrency = n.max(1);
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PngError> {
        let c = &self.config;
        if c.workspace_dir.as_os_str().is_empty() {
            return Err(Pdf2PngError::MissingSetting {
                name: "workspace_dir",
                env: "GPTSCRIPT_WORKSPACE_DIR",
            });
        }
        if c.input_file.trim().is_empty() {
            return Err(Pdf2PngError::MissingSetting {
                name: "input_file",
                env: "PDF_FILE",
            });
        }
        if !DPI_RANGE.contains(&c.dpi) {
            return Err(Pdf2PngError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.write_concurrency == 0 {
            return Err(Pdf2PngError::InvalidConfig(
                "Write concurrency must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
