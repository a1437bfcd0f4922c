//! Mapping logical workspace paths onto the `files/` namespace.
//!
//! Workspace keys are plain strings. Callers may pass them already rooted
//! (`files/report.pdf`) or relative (`report.pdf`); [`prepend_base_path`]
//! makes both land under the same base directory.
//!
//! The rooted check looks at the first segment only. A base name that appears
//! deeper in the path (`bar/files/x.txt`) does not count, so that path is
//! prefixed like any other.

use std::path::{Component, Path, PathBuf};

/// Base directory of every workspace key read or written by this crate.
pub const WORKSPACE_BASE_DIR: &str = "files";

/// Lexically normalise a path.
///
/// Collapses repeated separators and `.` segments, resolves `..` against a
/// preceding normal segment, and renders the result with the platform
/// separator. The file system is never touched. An empty result is `.`.
pub fn normalize_path(path: &str) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is still `/`.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Root `file_path` under `base_path` unless it already is.
///
/// Returns `file_path` untouched when the first segment of its normalised
/// form equals `base_path`; otherwise joins `base_path` with the original,
/// un-normalised `file_path`.
///
/// ```
/// use pdf2png::paths::prepend_base_path;
///
/// assert_eq!(prepend_base_path("files", "my-file.txt"), "files/my-file.txt");
/// assert_eq!(prepend_base_path("files", "files/my-file.txt"), "files/my-file.txt");
/// assert_eq!(
///     prepend_base_path("files", "bar/files/my-file.txt"),
///     "files/bar/files/my-file.txt"
/// );
/// ```
pub fn prepend_base_path(base_path: &str, file_path: &str) -> String {
    let normalized = normalize_path(file_path);
    let first = normalized.components().next();

    if let Some(Component::Normal(segment)) = first {
        if segment == base_path {
            return file_path.to_string();
        }
    }

    Path::new(base_path)
        .join(file_path)
        .to_string_lossy()
        .into_owned()
}

/// [`prepend_base_path`] with [`WORKSPACE_BASE_DIR`] as the base.
pub fn workspace_path(file_path: &str) -> String {
    prepend_base_path(WORKSPACE_BASE_DIR, file_path)
}
