// src/engine/controller.rs

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::exec::{TaskExecutor, TaskRequest, TaskResult};
use crate::fs::FileSystem;
use crate::report::RunSummary;
use crate::types::Strategy;

use super::plan::{build_plan, PlannedTask};

/// Drives a planned run through a [`TaskExecutor`] using the configured
/// [`Strategy`], and collects every outcome into a [`RunSummary`].
///
/// Skipped projects never reach the executor. Both strategies yield the same
/// set of results for the same plan; only the order differs.
pub struct Controller<'a, E: TaskExecutor + ?Sized> {
    config: &'a RunConfig,
    fs: &'a dyn FileSystem,
    executor: &'a E,
}

impl<'a, E: TaskExecutor + ?Sized> Controller<'a, E> {
    pub fn new(config: &'a RunConfig, fs: &'a dyn FileSystem, executor: &'a E) -> Self {
        Self {
            config,
            fs,
            executor,
        }
    }

    pub async fn run(&self) -> RunSummary {
        let plan = build_plan(self.config, self.fs);
        self.run_plan(plan).await
    }

    /// Execute an already built plan.
    pub async fn run_plan(&self, plan: Vec<PlannedTask>) -> RunSummary {
        let capability = self.config.capability();
        info!(
            %capability,
            strategy = ?self.config.strategy,
            projects = plan.len(),
            timeout_ms = self.config.timeout.as_millis() as u64,
            "starting run"
        );

        let summary = match self.config.strategy {
            Strategy::Sequential => self.run_sequential(plan).await,
            Strategy::Parallel => self.run_parallel(plan).await,
        };

        info!(%capability, failed = summary.failed(), "run finished");
        summary
    }

    /// One project at a time, in plan order.
    async fn run_sequential(&self, plan: Vec<PlannedTask>) -> RunSummary {
        let mut summary = RunSummary::new(self.config.capability());

        for task in plan {
            let result = match task {
                PlannedTask::Run(request) => self.dispatch(request).await,
                PlannedTask::Skip { project, reason } => {
                    info!(project = ?project.path, %reason, "skipping project");
                    TaskResult::skipped(project, reason)
                }
            };
            summary.record(result);
        }

        summary
    }

    /// Every eligible project at once; results arrive in completion order.
    ///
    /// Each request carries its own deadline, so one task timing out never
    /// affects its siblings. Returns only after all of them resolved.
    async fn run_parallel(&self, plan: Vec<PlannedTask>) -> RunSummary {
        let mut summary = RunSummary::new(self.config.capability());
        let mut running = FuturesUnordered::new();

        for task in plan {
            match task {
                PlannedTask::Run(request) => running.push(self.dispatch(request)),
                PlannedTask::Skip { project, reason } => {
                    info!(project = ?project.path, %reason, "skipping project");
                    summary.record(TaskResult::skipped(project, reason));
                }
            }
        }

        debug!(in_flight = running.len(), "all parallel tasks launched");

        while let Some(result) = running.next().await {
            summary.record(result);
        }

        summary
    }

    async fn dispatch(&self, request: TaskRequest) -> TaskResult {
        debug!(project = ?request.project.path, script = %request.script, "dispatching task");
        self.executor.execute(request).await
    }
}
