// src/exec/task_runner.rs

//! Individual task process runner.

use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::exec::deadline::{ChildEnd, DeadlineChild};
use crate::exec::{TaskOutcome, TaskRequest, TaskResult};
use crate::types::StdioMode;

/// Run a single task process to completion (or until its deadline).
///
/// Spawn/IO errors are converted into [`TaskOutcome::Error`] and logged via
/// `tracing::error!`; this function itself never fails.
pub async fn execute(request: TaskRequest) -> TaskResult {
    let started = Instant::now();
    let project = request.project.clone();
    let script = request.script.clone();

    let outcome = match execute_inner(&request).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(
                project = ?project.path,
                script = %script,
                error = %format!("{err:#}"),
                "unexpected error while running task"
            );
            TaskOutcome::Error(format!("{err:#}"))
        }
    };

    TaskResult {
        project,
        script: Some(script),
        outcome,
        elapsed: started.elapsed(),
    }
}

async fn execute_inner(request: &TaskRequest) -> Result<TaskOutcome> {
    let path = &request.project.path;
    // One budget per request, shared by the version query and the command.
    let deadline = Instant::now() + request.timeout;

    if let Some(marker) = &request.version_marker {
        match marker.refresh(path, request.timeout).await {
            Ok(version) => {
                info!(project = ?path, marker = ?marker.path, %version, "recorded tool version")
            }
            Err(err) => warn!(
                project = ?path,
                marker = ?marker.path,
                error = %format!("{err:#}"),
                "could not record tool version; continuing"
            ),
        }
    }

    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        warn!(
            project = ?path,
            script = %request.script,
            timeout_ms = request.timeout.as_millis() as u64,
            "no time left after recording tool version; not starting task"
        );
        return Ok(TaskOutcome::TimedOut {
            after: request.timeout,
        });
    }

    let (program, args) = request
        .command
        .split_first()
        .ok_or_else(|| anyhow!("empty command for project {:?}", path))?;

    info!(
        project = ?path,
        script = %request.script,
        cmd = %request.command.join(" "),
        "starting task process"
    );

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(path)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    match request.stdio {
        StdioMode::Inherit => cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit()),
        StdioMode::Capture => cmd.stdout(Stdio::piped()).stderr(Stdio::piped()),
    };

    let child = cmd
        .spawn()
        .with_context(|| format!("spawning {:?} in {:?}", request.command, path))?;

    let mut child = DeadlineChild::new(child);
    let end = child
        .finish_within(remaining)
        .await
        .with_context(|| format!("waiting for {:?} in {:?}", request.command, path))?;

    Ok(map_end(request, end))
}

fn map_end(request: &TaskRequest, end: ChildEnd) -> TaskOutcome {
    let path = &request.project.path;

    match end {
        ChildEnd::Expired { termination_signals } => {
            warn!(
                project = ?path,
                script = %request.script,
                timeout_ms = request.timeout.as_millis() as u64,
                termination_signals,
                "task timed out and was killed"
            );
            TaskOutcome::TimedOut {
                after: request.timeout,
            }
        }
        ChildEnd::Exited {
            status,
            stdout,
            stderr,
        } => {
            let code = status.code().unwrap_or(-1);

            info!(
                project = ?path,
                script = %request.script,
                exit_code = code,
                success = status.success(),
                "task process exited"
            );

            if status.success() {
                TaskOutcome::Success
            } else {
                TaskOutcome::Failure {
                    exit_code: code,
                    diagnostic: diagnostic_text(&stderr, &stdout),
                }
            }
        }
    }
}

/// stderr first, then stdout on its own line; `None` when both are empty.
pub fn diagnostic_text(stderr: &[u8], stdout: &[u8]) -> Option<String> {
    let mut text = String::from_utf8_lossy(stderr).into_owned();
    if !text.is_empty() && !stdout.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&String::from_utf8_lossy(stdout));
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Human-readable form of a timeout for log lines and reports.
pub fn format_timeout(timeout: Duration) -> String {
    format!("{}ms", timeout.as_millis())
}
