//! # The runner contract.
//!
//! A [`TaskRunner`] executes a [`Task`](crate::Task) by some backend-specific means and
//! gives the task a delayed-callback facility. Concrete backends decide whether `run`
//! blocks ([`SyncRunner`](crate::SyncRunner)) or returns immediately
//! ([`EmbeddedRunner`](crate::EmbeddedRunner)); task logic cannot tell the difference.
//!
//! ## Rules
//! - `run` must deliver exactly one `started`/`stopped` cycle through the task it drives.
//! - `schedule` fires the callback **once**, no earlier than `delay`, on the backend's own turn.
//! - Scheduled callbacks cannot be withdrawn.
//! - The contract's own `run`/`schedule` report [`RuntimeError::NotImplemented`];
//!   every backend must override both.
//! - A runner is also a [`TaskListener`] with no-op hooks it may override.

use std::rc::Rc;
use std::time::Duration;

use crate::error::{RuntimeError, TaskError};
use crate::listeners::TaskListener;
use crate::tasks::TaskRef;

/// A one-shot deferred call. Arguments are captured by the closure.
pub type Callback = Box<dyn FnOnce() -> Result<(), TaskError>>;

/// Shared handle to a runner.
pub type RunnerRef = Rc<dyn TaskRunner>;

/// Backend that drives a task and provides it a delayed-callback facility.
///
/// Runners are reusable across sequential runs, never concurrent ones.
pub trait TaskRunner: TaskListener {
    /// Executes `task` to completion by backend-specific means.
    fn run(self: Rc<Self>, task: TaskRef) -> Result<(), RuntimeError> {
        let _ = task;
        Err(RuntimeError::NotImplemented { op: "run" })
    }

    /// Arranges for `callback` to run once, no earlier than `delay` from now.
    fn schedule(&self, delay: Duration, callback: Callback) -> Result<(), RuntimeError> {
        let _ = (delay, callback);
        Err(RuntimeError::NotImplemented { op: "schedule" })
    }

    /// [`schedule`](TaskRunner::schedule) with the delay given in seconds.
    ///
    /// Negative, NaN or overflowing values are rejected with [`RuntimeError::InvalidDelay`].
    fn schedule_secs(&self, delta: f64, callback: Callback) -> Result<(), RuntimeError> {
        let delay = Duration::try_from_secs_f64(delta)
            .map_err(|_| RuntimeError::InvalidDelay { delta })?;
        self.schedule(delay, callback)
    }
}
