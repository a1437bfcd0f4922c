//! The workspace file store: source of the PDF and destination of the PNGs.
//!
//! The store is an external collaborator addressed by logical string keys
//! (`files/report.pdf`), not host paths. [`WorkspaceStore`] is the seam the
//! conversion pipeline talks to; one handle is built at startup and passed
//! by reference into [`crate::convert::convert`].
//!
//! | Implementation | Backing |
//! |----------------|---------|
//! | [`HttpWorkspace`]   | host workspace API over HTTP |
//! | [`LocalWorkspace`]  | a directory on disk |
//! | [`MemoryWorkspace`] | an in-process map, for tests |

pub mod http;
pub mod local;
pub mod memory;

pub use http::HttpWorkspace;
pub use local::LocalWorkspace;
pub use memory::MemoryWorkspace;

use crate::error::Pdf2PngError;
use async_trait::async_trait;

/// Read/write-by-path access to a workspace.
///
/// Uses `async_trait` because the pipeline holds the store as
/// `&dyn WorkspaceStore`.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Backend name for logging (e.g. "http", "local").
    fn name(&self) -> &str;

    /// Read the whole file at `path`.
    ///
    /// Fails with [`Pdf2PngError::WorkspaceNotFound`] when no such file exists
    /// and [`Pdf2PngError::WorkspaceReadFailed`] when the store errors.
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, Pdf2PngError>;

    /// Create or overwrite the file at `path`.
    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<(), Pdf2PngError>;
}
