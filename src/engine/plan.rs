// src/engine/plan.rs

//! Pure planning step: scan the roots, probe every project, and build the
//! task requests for the eligible ones. No processes are started here.

use crate::config::RunConfig;
use crate::exec::TaskRequest;
use crate::fs::FileSystem;
use crate::probe::{Probe, Prober, ScriptName, SkipReason};
use crate::scan::{ProjectEntry, Scanner};

/// What the run will do with one project.
#[derive(Debug, Clone)]
pub enum PlannedTask {
    Run(TaskRequest),
    Skip {
        project: ProjectEntry,
        reason: SkipReason,
    },
}

impl PlannedTask {
    pub fn project(&self) -> &ProjectEntry {
        match self {
            PlannedTask::Run(request) => &request.project,
            PlannedTask::Skip { project, .. } => project,
        }
    }
}

/// Build the ordered plan for a run.
///
/// Order: the workspace root first (when configured), then every root's
/// projects in scan order.
pub fn build_plan(config: &RunConfig, fs: &dyn FileSystem) -> Vec<PlannedTask> {
    let scanner = Scanner::new(fs, &config.reserved);
    let prober = Prober::new(fs, &config.operation);

    let root = config
        .include_workspace_root
        .then(|| ProjectEntry::workspace_root(&config.workspace_dir));

    root.into_iter()
        .chain(scanner.scan(&config.roots))
        .map(|project| match prober.probe(&project) {
            Probe::Eligible(script) => PlannedTask::Run(request_for(config, project, script)),
            Probe::Absent(reason) => PlannedTask::Skip { project, reason },
        })
        .collect()
}

/// Turn an eligible project into the request the executor consumes.
pub fn request_for(config: &RunConfig, project: ProjectEntry, script: ScriptName) -> TaskRequest {
    TaskRequest {
        command: config.command_for(&script),
        version_marker: config.version_marker(&project.path),
        timeout: config.timeout,
        stdio: config.stdio,
        project,
        script,
    }
}
