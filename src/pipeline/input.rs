//! Input staging: copy the PDF out of the workspace into the scratch directory.
//!
//! pdfium opens documents from a file-system path, so the workspace bytes are
//! written to `{workspace_dir}/scratch/{file name}` first. The scratch file is
//! left in place after the run. The `%PDF` magic bytes are checked before
//! anything is written so a wrong input fails with a clear error rather than
//! a pdfium parse failure.

use crate::error::Pdf2PngError;
use crate::paths::workspace_path;
use crate::workspace::WorkspaceStore;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Leading bytes of every PDF file.
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Create `{workspace_dir}/scratch` if it does not exist yet.
pub async fn create_scratch_dir(scratch_dir: &Path) -> Result<PathBuf, Pdf2PngError> {
    tokio::fs::create_dir_all(scratch_dir)
        .await
        .map_err(|e| Pdf2PngError::ScratchWriteFailed {
            path: scratch_dir.to_path_buf(),
            source: e,
        })?;
    debug!("Scratch directory ready: {}", scratch_dir.display());
    Ok(scratch_dir.to_path_buf())
}

/// Local file name for a workspace input: its last path segment.
pub fn local_file_name(input_file: &str) -> Result<String, Pdf2PngError> {
    Path::new(input_file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Pdf2PngError::InvalidInput {
            input: input_file.to_string(),
            reason: "has no file name component".into(),
        })
}

/// Check the `%PDF` header. Files shorter than four bytes are rejected too.
pub fn check_pdf_magic(bytes: &[u8], path: &Path) -> Result<(), Pdf2PngError> {
    if bytes.len() < PDF_MAGIC.len() || &bytes[..PDF_MAGIC.len()] != PDF_MAGIC {
        return Err(Pdf2PngError::NotAPdf {
            path: path.to_path_buf(),
            magic: bytes.iter().take(PDF_MAGIC.len()).copied().collect(),
        });
    }
    Ok(())
}

/// Read `input_file` from the workspace and write it into `scratch_dir`.
///
/// The workspace key is rooted under `files/`; the local copy keeps only the
/// file name. Returns the local path.
pub async fn stage_input(
    store: &dyn WorkspaceStore,
    scratch_dir: &Path,
    input_file: &str,
) -> Result<PathBuf, Pdf2PngError> {
    let file_name = local_file_name(input_file)?;
    let key = workspace_path(input_file);

    info!("Reading {} from {} workspace", key, store.name());
    let bytes = store.read_file(&key).await?;

    let local_path = scratch_dir.join(&file_name);
    check_pdf_magic(&bytes, &local_path)?;

    tokio::fs::write(&local_path, &bytes)
        .await
        .map_err(|e| Pdf2PngError::ScratchWriteFailed {
            path: local_path.clone(),
            source: e,
        })?;

    info!(
        "Staged {} bytes to {}",
        bytes.len(),
        local_path.display()
    );
    Ok(local_path)
}
