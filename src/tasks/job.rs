//! # What a task computes.
//!
//! [`Job`] is the task-specific half of a [`Task`]. The framework owns the lifecycle
//! bookkeeping (progress reset, running flag, runner reference, notifications) and calls
//! into the job at fixed points:
//!
//! ```text
//! Task::start(runner)                      Task::stop()
//!   ├─► progress = 0.0, running = true       ├─► job.stop(task)
//!   ├─► store runner (weak)                  ├─► running = false, runner = None
//!   ├─► notify started                       └─► notify stopped
//!   └─► job.start(task)
//! ```
//!
//! A job typically schedules its first step from [`Job::start`] and eventually calls
//! [`Task::stop`] from a scheduled callback.

use crate::error::TaskError;
use crate::tasks::task::{Task, TaskRef};

/// Task logic driven by a runner.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use taskloop::{Job, Task, TaskError, TaskRef};
///
/// struct Once;
///
/// impl Job for Once {
///     fn start(&self, task: &TaskRef) -> Result<(), TaskError> {
///         let this = task.clone();
///         task.schedule(Duration::ZERO, Box::new(move || {
///             this.set_progress(1.0)?;
///             this.stop()
///         }))
///     }
/// }
/// ```
pub trait Job: 'static {
    /// Called right after the base start sequence and the `started` notification.
    fn start(&self, task: &TaskRef) -> Result<(), TaskError>;

    /// Called before the base stop sequence; use it for cleanup.
    fn stop(&self, task: &Task) -> Result<(), TaskError> {
        let _ = task;
        Ok(())
    }
}
