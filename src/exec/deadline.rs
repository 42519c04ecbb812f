// src/exec/deadline.rs

//! The one "cancellable task with a deadline" primitive.
//!
//! Every subprocess monorun starts is awaited through [`within`] and, for the
//! main task process, through [`DeadlineChild`]. The timer lives inside the
//! awaited future, so it is dropped on every exit path (normal exit, error,
//! expiry) and never outlives its task.

use std::future::Future;
use std::io;
use std::process::ExitStatus;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::debug;

/// Result of awaiting something under a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deadline<T> {
    Finished(T),
    Expired,
}

/// Await `fut` for at most `limit`. On expiry `fut` is dropped.
pub async fn within<F: Future>(limit: Duration, fut: F) -> Deadline<F::Output> {
    match tokio::time::timeout(limit, fut).await {
        Ok(value) => Deadline::Finished(value),
        Err(_) => Deadline::Expired,
    }
}

/// How a guarded child ended.
#[derive(Debug)]
pub enum ChildEnd {
    /// The child exited before the deadline. Buffers are empty unless the
    /// corresponding stream was piped.
    Exited {
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
    /// The deadline fired; the child was killed and reaped and anything it
    /// had written to piped streams was dropped.
    Expired { termination_signals: u32 },
}

/// A spawned child that can be terminated at most once.
#[derive(Debug)]
pub struct DeadlineChild {
    child: Child,
    termination_signals: u32,
}

impl DeadlineChild {
    pub fn new(child: Child) -> Self {
        Self {
            child,
            termination_signals: 0,
        }
    }

    /// Number of termination signals issued so far (0 or 1).
    pub fn termination_signals(&self) -> u32 {
        self.termination_signals
    }

    /// Request termination of the child.
    ///
    /// Returns `Ok(true)` only for the call that actually sent the signal.
    /// Later calls, and calls after the child already exited, are no-ops.
    pub fn terminate(&mut self) -> io::Result<bool> {
        if self.termination_signals > 0 {
            return Ok(false);
        }
        if self.child.try_wait()?.is_some() {
            debug!(pid = ?self.child.id(), "child already exited; not signalling");
            return Ok(false);
        }
        self.child.start_kill()?;
        self.termination_signals += 1;
        Ok(true)
    }

    /// Wait for the child to exit, for at most `limit`, while any piped
    /// stdout/stderr is drained in the background.
    ///
    /// Only the child's own exit is under the deadline. Once it has exited
    /// the drains get [`DRAIN_GRACE`] to reach EOF; descendants that keep a
    /// pipe open past that only cost us the output they had not written yet.
    ///
    /// On expiry the child is terminated (once) and reaped before returning,
    /// so no live process is left behind.
    pub async fn finish_within(&mut self, limit: Duration) -> io::Result<ChildEnd> {
        let stdout = self.child.stdout.take().map(Drain::spawn);
        let stderr = self.child.stderr.take().map(Drain::spawn);

        let outcome = within(limit, self.child.wait()).await;
        match outcome {
            Deadline::Finished(status) => {
                let status = status?;
                Ok(ChildEnd::Exited {
                    status,
                    stdout: Drain::collect(stdout).await,
                    stderr: Drain::collect(stderr).await,
                })
            }
            Deadline::Expired => {
                Drain::discard(stdout);
                Drain::discard(stderr);
                self.terminate()?;
                self.child.wait().await?;
                Ok(ChildEnd::Expired {
                    termination_signals: self.termination_signals,
                })
            }
        }
    }
}

/// How long piped output may keep flowing after the child itself exited.
pub const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// A pipe read to EOF on its own task into a shared buffer, so whatever
/// arrived can be taken even if EOF never comes.
struct Drain {
    buf: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl Drain {
    fn spawn<R: AsyncRead + Unpin + Send + 'static>(mut pipe: R) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let task = tokio::spawn(async move {
            let mut chunk = [0u8; 8192];
            loop {
                match pipe.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => {
                        lock(&sink).extend_from_slice(&chunk[..n]);
                    }
                    Err(err) => {
                        debug!(error = %err, "stopped reading child pipe");
                        break;
                    }
                }
            }
        });
        Self { buf, task }
    }

    async fn collect(drain: Option<Drain>) -> Vec<u8> {
        let Some(Drain { buf, mut task }) = drain else {
            return Vec::new();
        };
        if matches!(within(DRAIN_GRACE, &mut task).await, Deadline::Expired) {
            debug!("child pipe still open after exit; keeping buffered output");
            task.abort();
        }
        std::mem::take(&mut *lock(&buf))
    }

    fn discard(drain: Option<Drain>) {
        if let Some(drain) = drain {
            drain.task.abort();
        }
    }
}

fn lock(buf: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buf.lock().unwrap_or_else(|e| e.into_inner())
}
