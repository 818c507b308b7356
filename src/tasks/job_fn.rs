//! # Function-backed job (`JobFn`)
//!
//! [`JobFn`] wraps a closure `F: Fn(&TaskRef) -> Result<(), TaskError>` that is invoked
//! on every start. The closure usually schedules the first step and returns.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskloop::{Task, TaskRef, TaskError};
//!
//! let t: TaskRef = Task::from_fn("flash", |task: &TaskRef| {
//!     let this = task.clone();
//!     task.schedule(Duration::ZERO, Box::new(move || this.stop()))
//! });
//!
//! assert_eq!(t.description(), "flash");
//! ```

use crate::error::TaskError;
use crate::tasks::job::Job;
use crate::tasks::task::TaskRef;

/// Function-backed job implementation.
///
/// Uses `Fn`, not `FnMut`: per-run state belongs in `Cell`s captured by the closure
/// or in the task's own progress.
#[derive(Debug)]
pub struct JobFn<F> {
    f: F,
}

impl<F> JobFn<F> {
    /// Wraps `f` as a job.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Job for JobFn<F>
where
    F: Fn(&TaskRef) -> Result<(), TaskError> + 'static,
{
    fn start(&self, task: &TaskRef) -> Result<(), TaskError> {
        (self.f)(task)
    }
}
