// src/report/mod.rs

//! Result aggregation and the end-of-run report.
//!
//! A run fails iff at least one project ended in `Failure`, `TimedOut` or
//! `Error`. `Skipped` projects are listed but never fail a run. The binary
//! exits non-zero exactly when [`RunSummary::failed`] is true.

use std::io::{self, Write};

use crate::exec::task_runner::format_timeout;
use crate::exec::{TaskOutcome, TaskResult};
use crate::types::Capability;

/// Per-kind tallies of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Ordered results of one run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    capability: Capability,
    results: Vec<TaskResult>,
}

impl RunSummary {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, result: TaskResult) {
        self.results.push(result);
    }

    /// Results in the order they were recorded.
    pub fn results(&self) -> &[TaskResult] {
        &self.results
    }

    pub fn failed(&self) -> bool {
        self.results.iter().any(|r| r.outcome.fails_run())
    }

    /// Process exit status for this run.
    pub fn exit_code(&self) -> i32 {
        if self.failed() { 1 } else { 0 }
    }

    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts {
            total: self.results.len(),
            ..OutcomeCounts::default()
        };
        for result in &self.results {
            match result.outcome {
                TaskOutcome::Success => counts.succeeded += 1,
                TaskOutcome::Failure { .. } => counts.failed += 1,
                TaskOutcome::TimedOut { .. } => counts.timed_out += 1,
                TaskOutcome::Skipped(_) => counts.skipped += 1,
                TaskOutcome::Error(_) => counts.errors += 1,
            }
        }
        counts
    }

    /// One line per project, captured diagnostics indented below failing
    /// entries, then the summary line.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.results.len() + 1);
        for result in &self.results {
            lines.push(outcome_line(self.capability, result));
            if let TaskOutcome::Failure {
                diagnostic: Some(text),
                ..
            } = &result.outcome
            {
                lines.extend(text.lines().map(|l| format!("    {l}")));
            }
        }
        lines.push(self.summary_line());
        lines
    }

    pub fn summary_line(&self) -> String {
        let c = self.counts();
        format!(
            "{}: {} projects, {} ok, {} failed, {} timed out, {} skipped, {} errors ({})",
            self.capability,
            c.total,
            c.succeeded,
            c.failed,
            c.timed_out,
            c.skipped,
            c.errors,
            if self.failed() { "FAILED" } else { "passed" },
        )
    }

    pub fn write_to(&self, mut out: impl Write) -> io::Result<()> {
        for line in self.render() {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}

fn gerund(capability: Capability) -> &'static str {
    match capability {
        Capability::Lint => "linting",
        Capability::Typecheck => "typechecking",
        Capability::Update => "updating",
    }
}

fn outcome_line(capability: Capability, result: &TaskResult) -> String {
    let path = result.project.path.display();
    let verb = gerund(capability);

    match &result.outcome {
        TaskOutcome::Success => format!(
            "ok       \"{path}\" ({} in {}ms)",
            result.script.as_ref().map(|s| s.as_str()).unwrap_or("-"),
            result.elapsed.as_millis()
        ),
        TaskOutcome::Failure { exit_code, .. } => {
            format!("failed   \"{path}\": error {verb} (exit {exit_code})")
        }
        TaskOutcome::TimedOut { after } => format!(
            "timeout  \"{path}\": {verb} timed out after {} and was killed",
            format_timeout(*after)
        ),
        TaskOutcome::Skipped(reason) => format!("skipped  \"{path}\": {reason}"),
        TaskOutcome::Error(message) => {
            format!("error    \"{path}\": unexpected error while {verb}: {message}")
        }
    }
}
