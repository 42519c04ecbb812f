// tests/controller_fake_executor.rs

mod common;
use crate::common::builders::RunConfigBuilder;
use crate::common::fake_executor::ScriptedExecutor;
use crate::common::{init_tracing, outcome_of, outcome_set, with_timeout};

use std::time::Duration;

use monorun::config::Operation;
use monorun::engine::{build_plan, Controller, PlannedTask};
use monorun::exec::TaskOutcome;
use monorun::fs::mock::MockFileSystem;
use monorun::probe::{ScriptName, SkipReason};
use monorun::types::Strategy;

/// `ws/apps` with A (lint ok), B (lint fails), C (no manifest), plus
/// `ws/packages/shared` (lint ok).
fn apps_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("ws/apps/B/package.json", r#"{ "scripts": { "lint": "eslint ." } }"#);
    fs.add_file("ws/apps/A/package.json", r#"{ "scripts": { "lint": "eslint ." } }"#);
    fs.add_dir("ws/apps/C");
    fs.add_file(
        "ws/packages/shared/package.json",
        r#"{ "scripts": { "lint": "eslint ." } }"#,
    );
    fs
}

fn failing_b() -> ScriptedExecutor {
    ScriptedExecutor::new().outcome(
        "B",
        TaskOutcome::Failure {
            exit_code: 1,
            diagnostic: None,
        },
    )
}

#[tokio::test]
async fn sequential_run_follows_scan_order_and_fails_on_b() {
    init_tracing();

    let fs = apps_fs();
    let cfg = RunConfigBuilder::new("ws")
        .root("apps")
        .strategy(Strategy::Sequential)
        .build();
    let executor = failing_b();

    let summary = with_timeout(Controller::new(&cfg, &fs, &executor).run()).await;

    let order: Vec<_> = summary.results().iter().map(|r| r.project.name.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);

    assert_eq!(outcome_of(summary.results(), "A"), &TaskOutcome::Success);
    assert_eq!(
        outcome_of(summary.results(), "B"),
        &TaskOutcome::Failure {
            exit_code: 1,
            diagnostic: None
        }
    );
    assert_eq!(
        outcome_of(summary.results(), "C"),
        &TaskOutcome::Skipped(SkipReason::NoManifest)
    );
    assert!(summary.failed());
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn skipped_projects_never_reach_the_executor() {
    init_tracing();

    let fs = apps_fs();
    let cfg = RunConfigBuilder::new("ws")
        .root("apps")
        .root("packages")
        .strategy(Strategy::Parallel)
        .build();
    let executor = ScriptedExecutor::new();

    let summary = with_timeout(Controller::new(&cfg, &fs, &executor).run()).await;

    let mut executed = executor.executed();
    executed.sort();
    assert_eq!(executed, vec!["A", "B", "shared"]);
    assert_eq!(summary.results().len(), 4);
    assert!(!summary.failed(), "skipped entries must not fail the run");
}

#[tokio::test]
async fn strategies_agree_on_the_result_set() {
    init_tracing();

    let fs = apps_fs();
    // B finishes first in parallel mode, so the two orders differ.
    let executor = failing_b().delay("A", Duration::from_millis(50));

    let seq_cfg = RunConfigBuilder::new("ws")
        .root("apps")
        .root("packages")
        .strategy(Strategy::Sequential)
        .build();
    let par_cfg = RunConfigBuilder::new("ws")
        .root("apps")
        .root("packages")
        .strategy(Strategy::Parallel)
        .build();

    let seq = with_timeout(Controller::new(&seq_cfg, &fs, &executor).run()).await;
    let par = with_timeout(Controller::new(&par_cfg, &fs, &executor).run()).await;

    assert_eq!(outcome_set(seq.results()), outcome_set(par.results()));
    assert_eq!(seq.failed(), par.failed());
    assert_eq!(seq.counts(), par.counts());
}

#[tokio::test]
async fn parallel_run_waits_for_every_task_and_one_timeout_does_not_block_siblings() {
    init_tracing();

    let fs = apps_fs();
    let cfg = RunConfigBuilder::new("ws")
        .root("apps")
        .root("packages")
        .strategy(Strategy::Parallel)
        .build();
    let executor = ScriptedExecutor::new()
        .outcome(
            "A",
            TaskOutcome::TimedOut {
                after: Duration::from_millis(200),
            },
        )
        .delay("A", Duration::from_millis(200))
        .delay("shared", Duration::from_millis(10));

    let summary = with_timeout(Controller::new(&cfg, &fs, &executor).run()).await;

    // Everything resolved before the summary existed; the slow task came last.
    assert_eq!(summary.results().len(), 4);
    assert_eq!(summary.results().last().unwrap().project.name, "A");
    assert_eq!(outcome_of(summary.results(), "shared"), &TaskOutcome::Success);
    assert_eq!(outcome_of(summary.results(), "B"), &TaskOutcome::Success);
    assert!(summary.failed());
    assert_eq!(summary.counts().timed_out, 1);
}

#[tokio::test]
async fn missing_roots_do_not_abort_the_run() {
    init_tracing();

    let fs = apps_fs();
    let cfg = RunConfigBuilder::new("ws")
        .root("does-not-exist")
        .root("packages")
        .build();
    let executor = ScriptedExecutor::new();

    let summary = with_timeout(Controller::new(&cfg, &fs, &executor).run()).await;

    assert_eq!(executor.executed(), vec!["shared"]);
    assert!(!summary.failed());
}

#[test]
fn update_plan_puts_workspace_root_first_and_builds_update_commands() {
    let fs = MockFileSystem::new();
    fs.add_file("ws/package.json", r#"{ "name": "monorepo" }"#);
    fs.add_file("ws/apps/web/package.json", r#"{ "name": "web" }"#);
    fs.add_dir("ws/apps/empty");

    let cfg = RunConfigBuilder::new("ws")
        .operation(Operation::Update { latest: false })
        .root("apps")
        .include_workspace_root(true)
        .build();

    let plan = build_plan(&cfg, &fs);
    let names: Vec<_> = plan.iter().map(|t| t.project().name.as_str()).collect();
    assert_eq!(names, vec!["root", "empty", "web"]);

    match &plan[0] {
        PlannedTask::Run(request) => {
            assert_eq!(request.script, ScriptName::new("update"));
            assert_eq!(request.command, vec!["bun", "update"]);
            let marker = request.version_marker.as_ref().expect("marker for update");
            assert_eq!(marker.path, std::path::PathBuf::from("ws/.bun-version"));
        }
        other => panic!("expected root to run, got {other:?}"),
    }
    assert!(matches!(
        &plan[1],
        PlannedTask::Skip {
            reason: SkipReason::NoManifest,
            ..
        }
    ));
}

#[test]
fn reserved_names_come_from_config() {
    let fs = apps_fs();
    fs.add_file(
        "ws/apps/templates/package.json",
        r#"{ "scripts": { "lint": "eslint ." } }"#,
    );

    let cfg = RunConfigBuilder::new("ws")
        .root("apps")
        .reserved(&["_", "templates", "C"])
        .build();

    let plan = build_plan(&cfg, &fs);
    let names: Vec<_> = plan.iter().map(|t| t.project().name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}
