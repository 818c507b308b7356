//! Error types used by the runners and by task logic.
//!
//! This module defines two error enums:
//!
//! - [`RuntimeError`]: errors raised by a runner or its event loop.
//! - [`TaskError`]: errors raised by task logic and listeners while handling a notification.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! A [`TaskError`] raised inside a scheduled callback aborts the loop and comes back
//! out of [`TaskRunner::run`](crate::TaskRunner::run) as [`RuntimeError::Task`].

use std::io;
use thiserror::Error;

/// # Errors produced by runners and event loops.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The runner contract was invoked without a concrete backend behind it.
    ///
    /// This is a programming error; see [`RuntimeError::is_fatal`].
    #[error("runner does not implement `{op}`")]
    NotImplemented {
        /// Name of the missing operation (`run` or `schedule`).
        op: &'static str,
    },

    /// `schedule` was called while the runner is not driving a task.
    #[error("runner is not running a task")]
    NotRunning,

    /// `run` was called on a runner that is already driving a task.
    #[error("runner is already driving a task")]
    Busy,

    /// A loop handle was used after its event loop was dropped.
    #[error("event loop is closed")]
    LoopClosed,

    /// A loop was created or driven on a thread that is already inside a runtime,
    /// for example from a callback of another loop.
    #[error("event loop cannot be driven from inside another runtime")]
    Nested,

    /// The loop ran out of scheduled callbacks before anyone asked it to exit.
    #[error("event loop stalled: no pending callbacks and no quit request")]
    Stalled,

    /// A delay in seconds was negative or not finite.
    #[error("invalid delay {delta}s")]
    InvalidDelay {
        /// The rejected delay.
        delta: f64,
    },

    /// Building the loop's runtime failed.
    #[error("io: {0}")]
    Io(#[from] io::Error),

    /// Task logic or a listener failed inside a callback dispatched by the loop.
    #[error("task failed: {0}")]
    Task(TaskError),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use taskloop::RuntimeError;
    ///
    /// let err = RuntimeError::NotImplemented { op: "run" };
    /// assert_eq!(err.as_label(), "runner_not_implemented");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::NotImplemented { .. } => "runner_not_implemented",
            RuntimeError::NotRunning => "runner_not_running",
            RuntimeError::Busy => "runner_busy",
            RuntimeError::LoopClosed => "loop_closed",
            RuntimeError::Nested => "loop_nested",
            RuntimeError::Stalled => "loop_stalled",
            RuntimeError::InvalidDelay { .. } => "invalid_delay",
            RuntimeError::Io(_) => "runtime_io",
            RuntimeError::Task(_) => "task_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::NotImplemented { op } => format!("missing backend for `{op}`"),
            RuntimeError::NotRunning => "no task is being driven".to_string(),
            RuntimeError::Busy => "run already in progress".to_string(),
            RuntimeError::LoopClosed => "loop dropped".to_string(),
            RuntimeError::Nested => "already inside a runtime on this thread".to_string(),
            RuntimeError::Stalled => "nothing left to dispatch".to_string(),
            RuntimeError::InvalidDelay { delta } => format!("delay: {delta}s"),
            RuntimeError::Io(e) => format!("io: {e}"),
            RuntimeError::Task(e) => e.as_message(),
        }
    }

    /// Indicates a missing backend implementation.
    ///
    /// Fatal errors must not be retried or swallowed.
    ///
    /// # Example
    /// ```
    /// use taskloop::RuntimeError;
    ///
    /// assert!(RuntimeError::NotImplemented { op: "schedule" }.is_fatal());
    /// assert!(!RuntimeError::Stalled.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        matches!(self, RuntimeError::NotImplemented { .. })
    }
}

impl From<TaskError> for RuntimeError {
    /// Unwraps runner errors that travelled through task logic instead of nesting them.
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Runner(inner) => *inner,
            other => RuntimeError::Task(other),
        }
    }
}

/// # Errors produced by task logic and listeners.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task logic failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable failure reported by task logic.
    #[error("fatal error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// The task asked for scheduling while no runner was driving it.
    #[error("task has no runner")]
    NoRunner,

    /// Writing progress output failed.
    #[error("io: {0}")]
    Io(#[from] io::Error),

    /// The driving runner rejected a request made by the task.
    #[error("runner: {0}")]
    Runner(Box<RuntimeError>),
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use taskloop::TaskError;
    ///
    /// assert_eq!(TaskError::NoRunner.as_label(), "task_no_runner");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Fatal { .. } => "task_fatal",
            TaskError::NoRunner => "task_no_runner",
            TaskError::Io(_) => "task_io",
            TaskError::Runner(e) => e.as_label(),
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Fatal { error } => format!("fatal: {error}"),
            TaskError::NoRunner => "not running".to_string(),
            TaskError::Io(e) => format!("io: {e}"),
            TaskError::Runner(e) => e.as_message(),
        }
    }
}

impl From<RuntimeError> for TaskError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Task(inner) => inner,
            other => TaskError::Runner(Box::new(other)),
        }
    }
}
