//! Cancellable one-shot and periodic tasks.
//!
//! Every task is owned by a [`TaskGuard`]; dropping the guard aborts the
//! task. Owners keep guards in the state the task mutates, so tearing that
//! state down cancels its timers with it.

use std::fmt;
use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Spawns timer-driven work on a tokio runtime.
#[derive(Clone)]
pub struct TaskScheduler {
    handle: Handle,
}

impl TaskScheduler {
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Run `task` once after `delay`.
    pub fn after<F>(&self, delay: Duration, task: F) -> TaskGuard
    where
        F: FnOnce() + Send + 'static,
    {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        })
    }

    /// Run `tick` every `period`, first after one full period.
    ///
    /// The task ends when `tick` returns `ControlFlow::Break`.
    pub fn every<F>(&self, period: Duration, mut tick: F) -> TaskGuard
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        self.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tick().is_break() {
                    break;
                }
            }
        })
    }

    /// Run an arbitrary future under a guard.
    pub fn spawn<Fut>(&self, future: Fut) -> TaskGuard
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        TaskGuard {
            handle: self.handle.spawn(future),
        }
    }
}

impl fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskScheduler").finish_non_exhaustive()
    }
}

/// Owns a spawned task; aborts it when dropped.
#[must_use = "dropping a TaskGuard cancels its task"]
pub struct TaskGuard {
    handle: JoinHandle<()>,
}

impl TaskGuard {
    /// Cancel the task now.
    pub fn cancel(self) {
        drop(self);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl fmt::Debug for TaskGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGuard")
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}
