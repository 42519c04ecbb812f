// tests/strategy_equivalence.rs

mod common;
use crate::common::builders::RunConfigBuilder;
use crate::common::fake_executor::ScriptedExecutor;
use crate::common::outcome_set;

use std::time::Duration;

use proptest::prelude::*;

use monorun::engine::Controller;
use monorun::exec::TaskOutcome;
use monorun::fs::mock::MockFileSystem;
use monorun::report::RunSummary;
use monorun::types::Strategy as RunStrategy;

/// Shape of one generated project.
#[derive(Debug, Clone)]
enum Shape {
    NoManifest,
    NoScript,
    Runs { outcome: u8, delay_ms: u64 },
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    prop_oneof![
        Just(Shape::NoManifest),
        Just(Shape::NoScript),
        (0u8..4, 0u64..5).prop_map(|(outcome, delay_ms)| Shape::Runs { outcome, delay_ms }),
    ]
}

fn outcome_for(code: u8) -> TaskOutcome {
    match code {
        0 => TaskOutcome::Success,
        1 => TaskOutcome::Failure {
            exit_code: 1,
            diagnostic: None,
        },
        2 => TaskOutcome::TimedOut {
            after: Duration::from_millis(5),
        },
        _ => TaskOutcome::Error("spawn failed".to_string()),
    }
}

fn setup(shapes: &[Shape]) -> (MockFileSystem, ScriptedExecutor) {
    let fs = MockFileSystem::new();
    fs.add_dir("ws/apps");
    let mut executor = ScriptedExecutor::new();

    for (i, shape) in shapes.iter().enumerate() {
        let name = format!("p{i:02}");
        let dir = format!("ws/apps/{name}");
        match shape {
            Shape::NoManifest => fs.add_dir(&dir),
            Shape::NoScript => fs.add_file(format!("{dir}/package.json"), r#"{ "scripts": {} }"#),
            Shape::Runs { outcome, delay_ms } => {
                fs.add_file(
                    format!("{dir}/package.json"),
                    r#"{ "scripts": { "lint": "eslint ." } }"#,
                );
                executor = executor
                    .outcome(&name, outcome_for(*outcome))
                    .delay(&name, Duration::from_millis(*delay_ms));
            }
        }
    }

    (fs, executor)
}

fn run_with(strategy: RunStrategy, fs: &MockFileSystem, executor: &ScriptedExecutor) -> RunSummary {
    let cfg = RunConfigBuilder::new("ws")
        .root("apps")
        .strategy(strategy)
        .build();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    rt.block_on(Controller::new(&cfg, fs, executor).run())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn sequential_and_parallel_produce_the_same_results(
        shapes in proptest::collection::vec(shape_strategy(), 0..12)
    ) {
        let (fs, executor) = setup(&shapes);

        let seq = run_with(RunStrategy::Sequential, &fs, &executor);
        let par = run_with(RunStrategy::Parallel, &fs, &executor);

        // One result per scanned project, whatever the strategy.
        prop_assert_eq!(seq.results().len(), shapes.len());
        prop_assert_eq!(par.results().len(), shapes.len());

        prop_assert_eq!(outcome_set(seq.results()), outcome_set(par.results()));
        prop_assert_eq!(seq.failed(), par.failed());

        // Sequential keeps scan order.
        let names: Vec<String> = seq.results().iter().map(|r| r.project.name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        prop_assert_eq!(names, sorted);
    }
}
