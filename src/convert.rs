//! Conversion entry points.
//!
//! [`convert`] runs the whole job against an injected workspace store:
//! stage the PDF into scratch, rasterise it, then PNG-encode and write each
//! page back. The first error aborts the run; pages already written stay in
//! the workspace.

use crate::config::ConversionConfig;
use crate::error::Pdf2PngError;
use crate::output::ConversionOutput;
use crate::paths::workspace_path;
use crate::pipeline::render::{PdfiumRasterizer, Rasterizer};
use crate::pipeline::{encode, input, naming, render};
use crate::workspace::WorkspaceStore;
use futures::stream::{self, StreamExt, TryStreamExt};
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert the configured PDF to one PNG per page using pdfium.
///
/// # Returns
/// The generated file names, in page order. A PDF without pages yields an
/// empty list and no writes.
///
/// # Errors
/// Any failure while staging, rendering, encoding, or writing.
pub async fn convert(
    store: &dyn WorkspaceStore,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PngError> {
    let rasterizer = Arc::new(PdfiumRasterizer::new(config.pdfium_lib_path.clone()));
    convert_with(store, rasterizer, config).await
}

/// [`convert`] with a caller-supplied rasteriser.
pub async fn convert_with(
    store: &dyn WorkspaceStore,
    rasterizer: Arc<dyn Rasterizer>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PngError> {
    if config.write_concurrency == 0 {
        return Err(Pdf2PngError::InvalidConfig(
            "Write concurrency must be ≥ 1".into(),
        ));
    }

    let total_start = Instant::now();
    info!("Starting conversion: {}", config.input_file);

    // ── Step 1: Scratch directory ────────────────────────────────────────
    let scratch_dir = input::create_scratch_dir(&config.scratch_dir()).await?;

    // ── Step 2: Output base name ─────────────────────────────────────────
    let base = naming::base_name(&config.input_file);

    // ── Step 3: Stage input ──────────────────────────────────────────────
    let local_pdf = input::stage_input(store, &scratch_dir, &config.input_file).await?;

    // ── Step 4: Rasterise pages ──────────────────────────────────────────
    let render_start = Instant::now();
    let pages = render::render_pages(
        rasterizer,
        &local_pdf,
        config.dpi,
        config.password.as_deref(),
    )
    .await?;
    let total_pages = pages.len();
    info!(
        "Rendered {} pages in {}ms",
        total_pages,
        render_start.elapsed().as_millis()
    );

    if total_pages == 0 {
        warn!("{} has no pages; nothing to write", config.input_file);
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_pages);
    }

    // ── Step 5: Encode and write back ────────────────────────────────────
    // `buffered` keeps results in page order even when writes overlap.
    let images: Vec<String> = stream::iter(pages.into_iter().enumerate())
        .map(|(idx, page)| write_page(store, config, base, idx, page, total_pages))
        .buffered(config.write_concurrency)
        .try_collect()
        .await?;

    let output = ConversionOutput { images };
    info!(
        "Conversion complete: {} pages, {}ms total",
        output.page_count(),
        total_start.elapsed().as_millis()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total_pages);
    }

    Ok(output)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    store: &dyn WorkspaceStore,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PngError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2PngError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(store, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Encode one page, write it to the workspace, and return its output name.
async fn write_page(
    store: &dyn WorkspaceStore,
    config: &ConversionConfig,
    base: &str,
    idx: usize,
    page: DynamicImage,
    total_pages: usize,
) -> Result<String, Pdf2PngError> {
    let png = encode::encode_page(idx, &page)?;
    drop(page);

    let file_name = naming::page_file_name(base, idx);
    let key = workspace_path(&file_name);
    store.write_file(&key, &png).await?;
    debug!("Wrote page {} → {} ({} bytes)", idx, key, png.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_page_written(idx, total_pages, &file_name, png.len());
    }
    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::MemoryWorkspace;
    use image::{Rgb, RgbImage};
    use std::path::Path;
    use tempfile::TempDir;

    struct SolidRasterizer(usize);

    impl Rasterizer for SolidRasterizer {
        fn rasterize(
            &self,
            _pdf_path: &Path,
            _dpi: u32,
            _password: Option<&str>,
        ) -> Result<Vec<DynamicImage>, Pdf2PngError> {
            Ok((0..self.0)
                .map(|i| DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([i as u8, 0, 0]))))
                .collect())
        }
    }

    fn config(dir: &TempDir, input: &str) -> ConversionConfig {
        ConversionConfig::builder()
            .workspace_dir(dir.path())
            .input_file(input)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn writes_pages_under_files_prefix() {
        let dir = TempDir::new().unwrap();
        let ws = MemoryWorkspace::new();
        ws.insert("files/report.pdf", b"%PDF-1.7".to_vec());

        let out = convert_with(&ws, Arc::new(SolidRasterizer(2)), &config(&dir, "report.pdf"))
            .await
            .unwrap();

        assert_eq!(out.images, vec!["report_page_0.png", "report_page_1.png"]);
        assert_eq!(
            ws.writes(),
            vec!["files/report_page_0.png", "files/report_page_1.png"]
        );
        assert!(dir.path().join("scratch/report.pdf").exists());
    }

    #[tokio::test]
    async fn zero_write_concurrency_is_rejected() {
        let dir = TempDir::new().unwrap();
        let ws = MemoryWorkspace::new();
        ws.insert("files/report.pdf", b"%PDF-1.7".to_vec());

        // Struct literal skips the builder's validation.
        let config = ConversionConfig {
            workspace_dir: dir.path().to_path_buf(),
            input_file: "report.pdf".into(),
            write_concurrency: 0,
            ..Default::default()
        };

        let res = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            convert_with(&ws, Arc::new(SolidRasterizer(2)), &config),
        )
        .await
        .expect("conversion must not hang");

        assert!(matches!(res, Err(Pdf2PngError::InvalidConfig(_))));
        assert!(ws.writes().is_empty());
    }

    #[tokio::test]
    async fn nested_input_keeps_directory_in_output_names() {
        let dir = TempDir::new().unwrap();
        let ws = MemoryWorkspace::new();
        ws.insert("files/q3/report.pdf", b"%PDF-1.7".to_vec());

        let out = convert_with(
            &ws,
            Arc::new(SolidRasterizer(1)),
            &config(&dir, "files/q3/report.pdf"),
        )
        .await
        .unwrap();

        assert_eq!(out.images, vec!["files/q3/report_page_0.png"]);
        assert_eq!(ws.writes(), vec!["files/q3/report_page_0.png"]);
        assert!(dir.path().join("scratch/report.pdf").exists());
    }
}
