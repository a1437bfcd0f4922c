//! In-process workspace store.
//!
//! Holds files in a map and records every write in order, which makes it the
//! fake of choice when testing code that takes a `&dyn WorkspaceStore`.

use super::WorkspaceStore;
use crate::error::Pdf2PngError;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<String, Vec<u8>>,
    writes: Vec<String>,
    reject_writes: HashSet<String>,
}

/// Workspace store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    inner: Mutex<Inner>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without recording a write.
    pub fn insert(&self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.lock().files.insert(path.into(), contents.into());
    }

    /// Contents of `path`, if present.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().files.get(path).cloned()
    }

    /// Paths passed to [`WorkspaceStore::write_file`], in call order.
    pub fn writes(&self) -> Vec<String> {
        self.lock().writes.clone()
    }

    /// Make every later write to `path` fail.
    pub fn reject_writes_to(&self, path: impl Into<String>) {
        self.lock().reject_writes.insert(path.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-write; the map is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl WorkspaceStore for MemoryWorkspace {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, Pdf2PngError> {
        self.get(path).ok_or_else(|| Pdf2PngError::WorkspaceNotFound {
            path: path.to_string(),
        })
    }

    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<(), Pdf2PngError> {
        let mut inner = self.lock();
        if inner.reject_writes.contains(path) {
            return Err(Pdf2PngError::WorkspaceWriteFailed {
                path: path.to_string(),
                reason: "write rejected".into(),
            });
        }
        inner.writes.push(path.to_string());
        inner.files.insert(path.to_string(), contents.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_seeded_file() {
        let ws = MemoryWorkspace::new();
        ws.insert("files/a.pdf", b"%PDF-1.7".to_vec());
        assert_eq!(ws.read_file("files/a.pdf").await.unwrap(), b"%PDF-1.7");
        assert!(ws.writes().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let ws = MemoryWorkspace::new();
        assert!(matches!(
            ws.read_file("files/a.pdf").await,
            Err(Pdf2PngError::WorkspaceNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn writes_are_recorded_in_order() {
        let ws = MemoryWorkspace::new();
        ws.write_file("files/b.png", b"b").await.unwrap();
        ws.write_file("files/a.png", b"a").await.unwrap();
        assert_eq!(ws.writes(), vec!["files/b.png", "files/a.png"]);
        assert_eq!(ws.get("files/a.png").unwrap(), b"a");
    }

    #[tokio::test]
    async fn rejected_write_fails_and_is_not_stored() {
        let ws = MemoryWorkspace::new();
        ws.reject_writes_to("files/x.png");
        assert!(ws.write_file("files/x.png", b"x").await.is_err());
        assert!(ws.get("files/x.png").is_none());
        assert!(ws.writes().is_empty());
    }
}
