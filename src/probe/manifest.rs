// src/probe/manifest.rs

//! Typed view of a project's `package.json` scripts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::ManifestError;
use crate::fs::FileSystem;

/// File name of the per-project manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Script table of one project, parsed once before any capability check.
///
/// Only entries whose value is a non-blank string survive parsing, so a
/// lookup hit always names something runnable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptManifest {
    path: PathBuf,
    scripts: BTreeMap<String, String>,
}

impl ScriptManifest {
    /// Read and parse `<project_dir>/package.json`.
    pub fn load(fs: &dyn FileSystem, project_dir: &Path) -> Result<Self, ManifestError> {
        let path = project_dir.join(MANIFEST_FILE);
        if !fs.exists(&path) {
            return Err(ManifestError::Missing(path));
        }

        let contents = fs
            .read_to_string(&path)
            .map_err(|e| ManifestError::Unreadable {
                path: path.clone(),
                reason: format!("{e:#}"),
            })?;

        Self::parse(path, &contents)
    }

    /// Parse manifest text. `path` is only used for error messages.
    pub fn parse(path: impl Into<PathBuf>, contents: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let malformed = |reason: String| ManifestError::Malformed {
            path: path.clone(),
            reason,
        };

        let value: Value = serde_json::from_str(contents).map_err(|e| malformed(e.to_string()))?;

        let Value::Object(root) = value else {
            return Err(malformed("top level is not an object".to_string()));
        };

        let scripts = match root.get("scripts") {
            None | Some(Value::Null) => BTreeMap::new(),
            Some(Value::Object(table)) => table
                .iter()
                .filter_map(|(name, cmd)| match cmd {
                    Value::String(cmd) if !cmd.trim().is_empty() => {
                        Some((name.clone(), cmd.clone()))
                    }
                    _ => None,
                })
                .collect(),
            Some(_) => return Err(malformed("`scripts` is not an object".to_string())),
        };

        Ok(Self { path, scripts })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.scripts.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    pub fn script_names(&self) -> impl Iterator<Item = &str> {
        self.scripts.keys().map(String::as_str)
    }
}
