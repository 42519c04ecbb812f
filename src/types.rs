use std::fmt;

use serde::Deserialize;

/// Operation family the orchestrator can run across the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Lint,
    Typecheck,
    Update,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Lint => "lint",
            Capability::Typecheck => "typecheck",
            Capability::Update => "update",
        }
    }

    /// Environment variable that overrides this family's per-task timeout.
    pub fn timeout_env_var(&self) -> &'static str {
        match self {
            Capability::Lint => "LINT_TIMEOUT_MS",
            Capability::Typecheck => "TYPECHECK_TIMEOUT_MS",
            Capability::Update => "UPDATE_TIMEOUT_MS",
        }
    }

    /// Built-in per-task timeout in milliseconds.
    pub fn default_timeout_ms(&self) -> u64 {
        match self {
            Capability::Lint | Capability::Typecheck => 10 * 60 * 1000,
            Capability::Update => 5 * 60 * 1000,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the eligible projects of a run are driven through the executor.
///
/// - `Sequential`: one project at a time, in scan order (default).
/// - `Parallel`: every eligible project at once, no concurrency cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Sequential,
    Parallel,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Sequential
    }
}

/// What happens to a child's stdout/stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    /// Stream straight to our own stdout/stderr. Output of parallel tasks
    /// may interleave.
    Inherit,
    /// Pipe both streams into buffers; failing tasks report stderr then
    /// stdout as their diagnostic.
    Capture,
}

impl Default for StdioMode {
    fn default() -> Self {
        StdioMode::Inherit
    }
}

