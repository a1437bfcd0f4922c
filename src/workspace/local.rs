//! A directory on disk used as the workspace store.
//!
//! Keys map onto paths below the root (`files/a.pdf` → `{root}/files/a.pdf`).
//! Keys that would leave the root (`..`, absolute paths) are refused.

use super::WorkspaceStore;
use crate::error::Pdf2PngError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Workspace store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a workspace key to a host path below the root.
    fn resolve(&self, key: &str) -> Option<PathBuf> {
        let rel = Path::new(key);
        let escapes = rel.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || key.is_empty() {
            return None;
        }
        Some(self.root.join(rel))
    }
}

#[async_trait]
impl WorkspaceStore for LocalWorkspace {
    fn name(&self) -> &str {
        "local"
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, Pdf2PngError> {
        let host_path = self
            .resolve(path)
            .ok_or_else(|| Pdf2PngError::WorkspaceReadFailed {
                path: path.to_string(),
                reason: "path escapes the workspace root".into(),
            })?;

        match tokio::fs::read(&host_path).await {
            Ok(bytes) => {
                debug!("Read {} bytes from {}", bytes.len(), host_path.display());
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Pdf2PngError::WorkspaceNotFound {
                path: path.to_string(),
            }),
            Err(e) => Err(Pdf2PngError::WorkspaceReadFailed {
                path: path.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<(), Pdf2PngError> {
        let write_err = |reason: String| Pdf2PngError::WorkspaceWriteFailed {
            path: path.to_string(),
            reason,
        };

        let host_path = self
            .resolve(path)
            .ok_or_else(|| write_err("path escapes the workspace root".into()))?;

        if let Some(parent) = host_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_err(e.to_string()))?;
        }

        tokio::fs::write(&host_path, contents)
            .await
            .map_err(|e| write_err(e.to_string()))?;

        debug!("Wrote {} bytes to {}", contents.len(), host_path.display());
        Ok(())
    }
}
