//! PDF rasterisation: render every page to an RGB `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! [`render_pages`] moves the work onto tokio's blocking pool so the runtime
//! threads keep serving I/O while a page renders.
//!
//! ## Resolution
//!
//! PDF user space is 72 points per inch. Each page is scaled by `dpi / 72`
//! on both axes, so a US-Letter page at the default 300 DPI comes out as
//! 2550 × 3300 px. Whole pages are materialised in memory; there is no tiling.

use crate::error::Pdf2PngError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Native resolution of PDF user space.
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Scale factor for rendering at `dpi`.
pub fn scale_factor(dpi: u32) -> f32 {
    dpi as f32 / PDF_POINTS_PER_INCH
}

/// Turns a PDF on local disk into one bitmap per page, in page order.
///
/// Implementations are called from a blocking thread and must not assume an
/// async runtime. A document without pages yields an empty vector.
pub trait Rasterizer: Send + Sync {
    fn rasterize(
        &self,
        pdf_path: &Path,
        dpi: u32,
        password: Option<&str>,
    ) -> Result<Vec<DynamicImage>, Pdf2PngError>;
}

/// Rasterise all pages of `pdf_path` on the blocking pool.
pub async fn render_pages(
    rasterizer: Arc<dyn Rasterizer>,
    pdf_path: &Path,
    dpi: u32,
    password: Option<&str>,
) -> Result<Vec<DynamicImage>, Pdf2PngError> {
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || rasterizer.rasterize(&path, dpi, password.as_deref()))
        .await
        .map_err(|e| Pdf2PngError::Internal(format!("Render task panicked: {}", e)))?
}

/// [`Rasterizer`] backed by the pdfium library.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRasterizer {
    lib_path: Option<PathBuf>,
}

impl PdfiumRasterizer {
    /// Bind to the library at `lib_path`, or the system library when None.
    pub fn new(lib_path: Option<PathBuf>) -> Self {
        Self { lib_path }
    }

    fn bind(&self) -> Result<Pdfium, Pdf2PngError> {
        let bindings = match &self.lib_path {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| {
            let target = self
                .lib_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "system library".to_string());
            Pdf2PngError::PdfiumBindingFailed(format!("{target}: {e:?}"))
        })?;

        Ok(Pdfium::new(bindings))
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn rasterize(
        &self,
        pdf_path: &Path,
        dpi: u32,
        password: Option<&str>,
    ) -> Result<Vec<DynamicImage>, Pdf2PngError> {
        let pdfium = self.bind()?;

        let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    Pdf2PngError::WrongPassword {
                        path: pdf_path.to_path_buf(),
                    }
                } else {
                    Pdf2PngError::PasswordRequired {
                        path: pdf_path.to_path_buf(),
                    }
                }
            } else {
                Pdf2PngError::CorruptPdf {
                    path: pdf_path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        let scale = scale_factor(dpi);
        info!("PDF loaded: {} pages, rendering at {} DPI (×{:.3})", total_pages, dpi, scale);

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let mut images = Vec::with_capacity(total_pages);

        for (idx, page) in pages.iter().enumerate() {
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                Pdf2PngError::RasterisationFailed {
                    page: idx,
                    detail: format!("{:?}", e),
                }
            })?;

            let image = DynamicImage::ImageRgb8(bitmap.as_image().to_rgb8());
            debug!(
                "Rendered page {} → {}x{} px",
                idx,
                image.width(),
                image.height()
            );
            images.push(image);
        }

        Ok(images)
    }
}
