use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use monorun::exec::{TaskExecutor, TaskOutcome, TaskRequest, TaskResult};

/// A fake executor that:
/// - records which projects were "run", in call order
/// - answers with a scripted outcome per project name (default `Success`)
/// - optionally sleeps per project first, to shuffle parallel completion.
#[derive(Clone, Default)]
pub struct ScriptedExecutor {
    outcomes: HashMap<String, TaskOutcome>,
    delays: HashMap<String, Duration>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(mut self, project: &str, outcome: TaskOutcome) -> Self {
        self.outcomes.insert(project.to_string(), outcome);
        self
    }

    pub fn delay(mut self, project: &str, delay: Duration) -> Self {
        self.delays.insert(project.to_string(), delay);
        self
    }

    /// Project names handed to `execute`, in call order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl TaskExecutor for ScriptedExecutor {
    fn execute(
        &self,
        request: TaskRequest,
    ) -> Pin<Box<dyn Future<Output = TaskResult> + Send + '_>> {
        Box::pin(async move {
            let name = request.project.name.clone();
            {
                let mut guard = self.executed.lock().unwrap();
                guard.push(name.clone());
            }

            if let Some(delay) = self.delays.get(&name) {
                tokio::time::sleep(*delay).await;
            }

            let outcome = self
                .outcomes
                .get(&name)
                .cloned()
                .unwrap_or(TaskOutcome::Success);

            TaskResult {
                project: request.project,
                script: Some(request.script),
                outcome,
                elapsed: Duration::ZERO,
            }
        })
    }
}
