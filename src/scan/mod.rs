// src/scan/mod.rs

//! Workspace discovery.
//!
//! Turns the configured roots (e.g. `apps/`, `packages/`) into the ordered
//! list of candidate project directories. A root that does not exist is
//! logged and skipped; it never aborts the run.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::fs::FileSystem;

/// One candidate project found under a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_directory: bool,
}

impl ProjectEntry {
    /// The workspace directory itself, processed as a project named `root`.
    pub fn workspace_root(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into(),
            name: "root".to_string(),
            is_directory: true,
        }
    }
}

/// Enumerates project directories below a list of roots.
#[derive(Debug)]
pub struct Scanner<'a> {
    fs: &'a dyn FileSystem,
    reserved: &'a [String],
}

impl<'a> Scanner<'a> {
    pub fn new(fs: &'a dyn FileSystem, reserved: &'a [String]) -> Self {
        Self { fs, reserved }
    }

    /// Lazily yield every accepted directory under `roots`.
    ///
    /// Roots are visited in the given order; entries within a root are
    /// sorted by name. Files, hidden entries and reserved names are skipped.
    pub fn scan<'s>(&'s self, roots: &'s [PathBuf]) -> impl Iterator<Item = ProjectEntry> + 's {
        roots.iter().flat_map(move |root| self.scan_root(root))
    }

    fn scan_root(&self, root: &Path) -> Vec<ProjectEntry> {
        if !self.fs.is_dir(root) {
            warn!(root = ?root, "skipping missing directory");
            return Vec::new();
        }

        let children = match self.fs.read_dir(root) {
            Ok(children) => children,
            Err(err) => {
                warn!(root = ?root, error = %err, "skipping unreadable directory");
                return Vec::new();
            }
        };

        let mut entries: Vec<ProjectEntry> = children
            .into_iter()
            .filter_map(|path| self.accept(path))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(root = ?root, count = entries.len(), "scanned root");
        entries
    }

    fn accept(&self, path: PathBuf) -> Option<ProjectEntry> {
        let name = path.file_name()?.to_string_lossy().into_owned();

        if name.starts_with('.') || self.reserved.iter().any(|r| *r == name) {
            debug!(path = ?path, "skipping reserved entry");
            return None;
        }

        if !self.fs.is_dir(&path) {
            return None;
        }

        Some(ProjectEntry {
            path,
            name,
            is_directory: true,
        })
    }
}
