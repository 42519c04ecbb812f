// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod probe;
pub mod report;
pub mod scan;
pub mod types;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{EnvSnapshot, RunConfig, load_optional};
use crate::engine::{Controller, PlannedTask, build_plan};
use crate::errors::Result;
use crate::exec::ProcessExecutor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::report::RunSummary;

/// How a CLI invocation ended.
#[derive(Debug)]
pub enum RunStatus {
    Completed(RunSummary),
    DryRun,
}

impl RunStatus {
    /// Single exit-code policy for every operation family: non-zero iff the
    /// aggregated run failed.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::Completed(summary) => summary.exit_code(),
            RunStatus::DryRun => 0,
        }
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI + environment snapshot + optional file)
/// - scan / probe planning
/// - the controller driving the real process executor
/// - the report on stdout
pub async fn run(args: CliArgs, env: &EnvSnapshot) -> Result<RunStatus> {
    let file = load_optional(args.config_path())?;
    let config = RunConfig::resolve(
        args.operation(),
        args.workspace.clone(),
        &file,
        env,
        &args.overrides(),
    )?;
    debug!(?config, "resolved run configuration");

    let fs = RealFileSystem;

    if args.dry_run {
        print_dry_run(&config, &fs);
        return Ok(RunStatus::DryRun);
    }

    let executor = ProcessExecutor;
    let summary = Controller::new(&config, &fs, &executor).run().await;

    summary.write_to(std::io::stdout().lock())?;
    Ok(RunStatus::Completed(summary))
}

/// Simple dry-run output: every project with its script and command line,
/// or the reason it would be skipped.
fn print_dry_run(config: &RunConfig, fs: &dyn FileSystem) {
    println!("monorun dry-run");
    println!("  operation = {:?}", config.operation);
    println!("  strategy = {:?}", config.strategy);
    println!("  stdio = {:?}", config.stdio);
    println!("  timeout = {}ms", config.timeout.as_millis());
    println!("  roots = {:?}", config.roots);
    println!();

    let plan = build_plan(config, fs);
    println!("projects ({}):", plan.len());
    for task in &plan {
        match task {
            PlannedTask::Run(request) => {
                println!("  - {}", request.project.path.display());
                println!("      script: {}", request.script);
                println!("      cmd: {}", request.command.join(" "));
                if let Some(marker) = &request.version_marker {
                    println!("      version marker: {}", marker.path.display());
                }
            }
            PlannedTask::Skip { project, reason } => {
                println!("  - {} (skipped: {reason})", project.path.display());
            }
        }
    }

    debug!("dry-run complete (no execution)");
}
