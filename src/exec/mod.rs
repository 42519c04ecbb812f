// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs one project's command with `tokio::process::Command` and turns the
//! way it ended into a [`TaskResult`].
//!
//! - [`deadline`] is the shared timeout + terminate-once primitive.
//! - [`marker`] refreshes the per-project tool version file for `update`.
//! - [`task_runner`] spawns and supervises a single task process.
//! - [`backend`] provides the [`TaskExecutor`] trait the controller drives,
//!   with [`ProcessExecutor`] as the production implementation. Tests swap
//!   in a fake.

pub mod backend;
pub mod deadline;
pub mod marker;
pub mod task_runner;

use std::time::Duration;

use crate::probe::{ScriptName, SkipReason};
use crate::scan::ProjectEntry;
use crate::types::StdioMode;

pub use backend::{ProcessExecutor, TaskExecutor};
pub use deadline::{ChildEnd, Deadline, DeadlineChild, within};
pub use marker::VersionMarker;
pub use task_runner::execute;

/// Everything needed to run one project's command. Consumed by exactly one
/// `execute` call.
#[derive(Debug, Clone)]
pub struct TaskRequest {
    pub project: ProjectEntry,
    pub script: ScriptName,
    /// argv; the first element is the program.
    pub command: Vec<String>,
    pub timeout: Duration,
    pub stdio: StdioMode,
    /// Refreshed before the command runs, regardless of its outcome.
    pub version_marker: Option<VersionMarker>,
}

/// How a project fared in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    /// Non-zero exit. `diagnostic` is stderr followed by stdout when output
    /// was captured and non-empty.
    Failure {
        exit_code: i32,
        diagnostic: Option<String>,
    },
    /// Killed after running for `after`.
    TimedOut { after: Duration },
    Skipped(SkipReason),
    /// Spawn or IO failure while handling the project.
    Error(String),
}

impl TaskOutcome {
    /// Whether this outcome makes the whole run fail.
    pub fn fails_run(&self) -> bool {
        matches!(
            self,
            TaskOutcome::Failure { .. } | TaskOutcome::TimedOut { .. } | TaskOutcome::Error(_)
        )
    }
}

/// One entry of the run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub project: ProjectEntry,
    /// `None` when the project was skipped before a script was chosen.
    pub script: Option<ScriptName>,
    pub outcome: TaskOutcome,
    pub elapsed: Duration,
}

impl TaskResult {
    pub fn skipped(project: ProjectEntry, reason: SkipReason) -> Self {
        Self {
            project,
            script: None,
            outcome: TaskOutcome::Skipped(reason),
            elapsed: Duration::ZERO,
        }
    }
}
