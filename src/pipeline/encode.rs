//! Image encoding: `DynamicImage` → PNG bytes.
//!
//! Pages are encoded into an in-memory buffer and handed straight to the
//! workspace; nothing touches local disk.

use crate::error::Pdf2PngError;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as PNG.
pub fn encode_page(page_index: usize, img: &DynamicImage) -> Result<Vec<u8>, Pdf2PngError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| Pdf2PngError::EncodeFailed {
            page: page_index,
            source: e,
        })?;

    debug!(
        "Encoded page {} ({}x{}) → {} bytes PNG",
        page_index,
        img.width(),
        img.height(),
        buf.len()
    );
    Ok(buf)
}
