#![allow(dead_code)]

use std::path::{Path, PathBuf};

use monorun::config::{EnvSnapshot, Operation, RawConfigFile, RunConfig, RunOverrides};
use monorun::types::{StdioMode, Strategy};

/// Builder for `RunConfig` that goes through `RunConfig::resolve`, so tests
/// exercise the same merge/validation path as the binary.
pub struct RunConfigBuilder {
    operation: Operation,
    workspace: PathBuf,
    file: RawConfigFile,
    overrides: RunOverrides,
    env: Vec<(String, String)>,
}

impl RunConfigBuilder {
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        let mut overrides = RunOverrides::default();
        overrides.include_workspace_root = Some(false);
        Self {
            operation: Operation::default(),
            workspace: workspace.as_ref().to_path_buf(),
            file: RawConfigFile::default(),
            overrides,
            env: Vec::new(),
        }
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    /// Add a project root (relative to the workspace or absolute).
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.overrides.roots.push(root.into());
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.file.workspace.strategy = Some(strategy);
        self
    }

    pub fn stdio(mut self, stdio: StdioMode) -> Self {
        self.file.workspace.stdio = Some(stdio);
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.overrides.timeout_ms = Some(ms);
        self
    }

    pub fn tool(mut self, tool: impl AsRef<Path>) -> Self {
        self.overrides.tool = Some(tool.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn reserved(mut self, names: &[&str]) -> Self {
        self.file.workspace.reserved = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn include_workspace_root(mut self, val: bool) -> Self {
        self.overrides.include_workspace_root = Some(val);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> RunConfig {
        RunConfig::resolve(
            self.operation,
            self.workspace,
            &self.file,
            &EnvSnapshot::from_pairs(self.env),
            &self.overrides,
        )
        .expect("Failed to build valid config from builder")
    }
}
