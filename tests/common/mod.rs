#![allow(dead_code)]

pub use monorun_test_utils::builders;
pub use monorun_test_utils::fake_executor;
pub use monorun_test_utils::workspace;
pub use monorun_test_utils::{init_tracing, with_timeout};

use monorun::exec::{TaskOutcome, TaskResult};

/// `(project name, outcome)` pairs sorted by name, for order-insensitive
/// comparisons between strategies.
pub fn outcome_set(results: &[TaskResult]) -> Vec<(String, TaskOutcome)> {
    let mut set: Vec<_> = results
        .iter()
        .map(|r| (r.project.name.clone(), r.outcome.clone()))
        .collect();
    set.sort_by(|a, b| a.0.cmp(&b.0));
    set
}

/// Look up the outcome recorded for `name`.
pub fn outcome_of<'a>(results: &'a [TaskResult], name: &str) -> &'a TaskOutcome {
    &results
        .iter()
        .find(|r| r.project.name == name)
        .unwrap_or_else(|| panic!("no result for project {name}"))
        .outcome
}
