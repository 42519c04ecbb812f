// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::exec::VersionMarker;
use crate::probe::ScriptName;
use crate::types::{Capability, StdioMode, Strategy};

/// Optional `monorun.toml` as read from disk.
///
/// ```toml
/// [workspace]
/// roots = ["apps", "packages"]
/// reserved = ["_"]
/// tool = "bun"
/// strategy = "parallel"
/// stdio = "capture"
///
/// [timeouts]
/// lint_ms = 600000
///
/// [update]
/// roots = ["apps"]
/// include_workspace_root = true
/// ```
///
/// Every key is optional; unset keys fall through to built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub workspace: WorkspaceSection,

    #[serde(default)]
    pub timeouts: TimeoutSection,

    #[serde(default)]
    pub update: UpdateSection,
}

/// `[workspace]` section, shared by every operation family.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceSection {
    /// Directories (relative to the workspace) whose children are projects.
    #[serde(default)]
    pub roots: Option<Vec<String>>,

    /// Child names that are never treated as projects.
    #[serde(default)]
    pub reserved: Option<Vec<String>>,

    /// Package manager binary used to run scripts.
    #[serde(default)]
    pub tool: Option<String>,

    #[serde(default)]
    pub strategy: Option<Strategy>,

    #[serde(default)]
    pub stdio: Option<StdioMode>,

    /// Name of the per-project version marker written by `update`.
    #[serde(default)]
    pub version_file: Option<String>,
}

/// `[timeouts]` section, in milliseconds per family.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeoutSection {
    #[serde(default)]
    pub lint_ms: Option<u64>,

    #[serde(default)]
    pub typecheck_ms: Option<u64>,

    #[serde(default)]
    pub update_ms: Option<u64>,
}

impl TimeoutSection {
    pub fn for_capability(&self, capability: Capability) -> Option<u64> {
        match capability {
            Capability::Lint => self.lint_ms,
            Capability::Typecheck => self.typecheck_ms,
            Capability::Update => self.update_ms,
        }
    }
}

/// `[update]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSection {
    /// Roots used by `update` instead of `[workspace].roots`.
    #[serde(default)]
    pub roots: Option<Vec<String>>,

    /// Whether the workspace directory itself is updated before the roots.
    #[serde(default)]
    pub include_workspace_root: Option<bool>,
}

/// The requested operation family together with its globally selected
/// variant. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Lint {
        /// Run `format` instead of `lint`.
        fix: bool,
        /// Use the `:staged` flavour of the script.
        staged: bool,
        /// Forward `--debug` to the script.
        debug: bool,
    },
    Typecheck {
        /// Use the alternate `typecheck:tsgo` script.
        tsgo: bool,
    },
    Update {
        /// Pull latest versions instead of semver-compatible ones.
        latest: bool,
    },
}

impl Default for Operation {
    fn default() -> Self {
        Operation::Lint {
            fix: false,
            staged: false,
            debug: false,
        }
    }
}

impl Operation {
    pub fn capability(&self) -> Capability {
        match self {
            Operation::Lint { .. } => Capability::Lint,
            Operation::Typecheck { .. } => Capability::Typecheck,
            Operation::Update { .. } => Capability::Update,
        }
    }

    /// Manifest key this run looks for in every project.
    pub fn script_name(&self) -> ScriptName {
        match self {
            Operation::Lint { fix, staged, .. } => {
                let base = if *fix { "format" } else { "lint" };
                if *staged {
                    ScriptName::new(format!("{base}:staged"))
                } else {
                    ScriptName::new(base)
                }
            }
            Operation::Typecheck { tsgo: true } => ScriptName::new("typecheck:tsgo"),
            Operation::Typecheck { tsgo: false } => ScriptName::new("typecheck"),
            Operation::Update { latest: true } => ScriptName::new("update:latest"),
            Operation::Update { latest: false } => ScriptName::new("update"),
        }
    }

    /// Whether eligibility depends on a matching `scripts` entry.
    ///
    /// `update` is served by the package manager itself, so any project with
    /// a well-formed manifest qualifies.
    pub fn requires_script_entry(&self) -> bool {
        !matches!(self, Operation::Update { .. })
    }

    /// Arguments forwarded to the script after `--`.
    pub fn extra_args(&self) -> Vec<String> {
        match self {
            Operation::Lint { debug: true, .. } => vec!["--debug".to_string()],
            _ => Vec::new(),
        }
    }
}

/// Values coming from the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub roots: Vec<PathBuf>,
    pub parallel: bool,
    pub capture: bool,
    pub timeout_ms: Option<u64>,
    pub tool: Option<String>,
    pub include_workspace_root: Option<bool>,
}

/// Fully resolved, immutable configuration of a single run.
///
/// Built once by `RunConfig::resolve` and passed by
/// reference into the orchestrator.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub operation: Operation,
    /// Directory the run is anchored at; relative roots resolve against it.
    pub workspace_dir: PathBuf,
    /// Ordered project roots, already joined onto `workspace_dir`.
    pub roots: Vec<PathBuf>,
    pub reserved: Vec<String>,
    /// Process `workspace_dir` itself as the first project.
    pub include_workspace_root: bool,
    pub tool: String,
    pub strategy: Strategy,
    pub stdio: StdioMode,
    pub timeout: Duration,
    pub version_file: String,
}

impl RunConfig {
    pub fn capability(&self) -> Capability {
        self.operation.capability()
    }

    /// Full argv for running `script` in a project.
    pub fn command_for(&self, script: &ScriptName) -> Vec<String> {
        match &self.operation {
            Operation::Update { latest } => {
                let mut argv = vec![self.tool.clone(), "update".to_string()];
                if *latest {
                    argv.push("--latest".to_string());
                }
                argv
            }
            op => {
                let mut argv = vec![
                    self.tool.clone(),
                    "run".to_string(),
                    script.as_str().to_string(),
                ];
                let extra = op.extra_args();
                if !extra.is_empty() {
                    argv.push("--".to_string());
                    argv.extend(extra);
                }
                argv
            }
        }
    }

    /// Version marker to refresh before running in `project_dir`, if this
    /// operation family writes one.
    pub fn version_marker(&self, project_dir: &Path) -> Option<VersionMarker> {
        match self.operation {
            Operation::Update { .. } => Some(VersionMarker {
                path: project_dir.join(&self.version_file),
                query: vec![self.tool.clone(), "--version".to_string()],
            }),
            _ => None,
        }
    }
}
