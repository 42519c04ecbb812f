// src/probe/mod.rs

//! Capability detection.
//!
//! For every scanned project the prober loads the manifest once and decides
//! whether the run's operation applies. The script key is derived from the
//! run's [`Operation`] up front, so every project is asked the same question.

pub mod manifest;

use std::fmt;

use tracing::debug;

use crate::config::Operation;
use crate::errors::ManifestError;
use crate::fs::FileSystem;
use crate::scan::ProjectEntry;

pub use manifest::{MANIFEST_FILE, ScriptManifest};

/// Resolved manifest key such as `lint`, `format:staged` or `typecheck:tsgo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptName(String);

impl ScriptName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a project was left out of a run. Never counts as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoManifest,
    UnreadableManifest(String),
    MalformedManifest(String),
    MissingScript(ScriptName),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoManifest => write!(f, "no {MANIFEST_FILE}"),
            SkipReason::UnreadableManifest(why) => write!(f, "unreadable {MANIFEST_FILE}: {why}"),
            SkipReason::MalformedManifest(why) => write!(f, "malformed {MANIFEST_FILE}: {why}"),
            SkipReason::MissingScript(name) => {
                write!(f, "no {name} script in {MANIFEST_FILE}")
            }
        }
    }
}

impl From<ManifestError> for SkipReason {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::Missing(_) => SkipReason::NoManifest,
            ManifestError::Unreadable { reason, .. } => SkipReason::UnreadableManifest(reason),
            ManifestError::Malformed { reason, .. } => SkipReason::MalformedManifest(reason),
        }
    }
}

/// Result of probing one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Eligible(ScriptName),
    Absent(SkipReason),
}

/// Answers "does this project support the run's operation, and via which
/// script?" for every project of a run.
#[derive(Debug)]
pub struct Prober<'a> {
    fs: &'a dyn FileSystem,
    desired: ScriptName,
    requires_script_entry: bool,
}

impl<'a> Prober<'a> {
    pub fn new(fs: &'a dyn FileSystem, operation: &Operation) -> Self {
        Self {
            fs,
            desired: operation.script_name(),
            requires_script_entry: operation.requires_script_entry(),
        }
    }

    /// Script key every project is checked for.
    pub fn desired(&self) -> &ScriptName {
        &self.desired
    }

    pub fn probe(&self, project: &ProjectEntry) -> Probe {
        let manifest = match ScriptManifest::load(self.fs, &project.path) {
            Ok(manifest) => manifest,
            Err(err) => {
                debug!(project = ?project.path, error = %err, "manifest not usable");
                return Probe::Absent(err.into());
            }
        };

        if self.requires_script_entry && !manifest.contains(self.desired.as_str()) {
            return Probe::Absent(SkipReason::MissingScript(self.desired.clone()));
        }

        Probe::Eligible(self.desired.clone())
    }
}
