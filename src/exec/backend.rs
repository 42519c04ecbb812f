// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The controller talks to a [`TaskExecutor`] instead of spawning processes
//! itself. This makes it easy to swap in a fake executor in tests while
//! keeping the production implementation in [`task_runner`](super::task_runner).

use std::future::Future;
use std::pin::Pin;

use super::task_runner::execute;
use super::{TaskRequest, TaskResult};

/// Trait abstracting how a single task request is executed.
///
/// Implementations must never fail the call itself: every problem is
/// reported through the returned [`TaskResult`].
pub trait TaskExecutor: Send + Sync {
    fn execute(
        &self,
        request: TaskRequest,
    ) -> Pin<Box<dyn Future<Output = TaskResult> + Send + '_>>;
}

/// Real executor used in production: one OS process per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl TaskExecutor for ProcessExecutor {
    fn execute(
        &self,
        request: TaskRequest,
    ) -> Pin<Box<dyn Future<Output = TaskResult> + Send + '_>> {
        Box::pin(execute(request))
    }
}
