//! Task execution for requests run off the caller's task.
//!
//! The cache proxy itself is a single awaited call. Running many requests
//! concurrently is the job of an [`Executor`], which accepts a unit of work
//! and drives it to completion somewhere else (a tokio runtime, a custom
//! thread pool, an event loop).

use std::future::Future;
use std::pin::Pin;

/// A unit of work handed to an executor.
pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs tasks in the background.
///
/// Implementations must be thread-safe; `execute` is called with `&self`
/// from any thread and must not block on the task.
pub trait Executor: Send + Sync {
    /// Schedule `task` to run to completion.
    fn execute(&self, task: Task);
}

/// Executor backed by the ambient tokio runtime.
///
/// Must be used from within a runtime context.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioExecutor;

impl TokioExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for TokioExecutor {
    fn execute(&self, task: Task) {
        tokio::spawn(task);
    }
}
