//! # Task entity and task logic.
//!
//! This module provides the task-related types:
//! - [`Task`] - lifecycle state, progress throttling and listener fan-out
//! - [`TaskRef`] - shared handle to a task (`Rc<Task>`)
//! - [`TaskBuilder`] - per-instance description/increment
//! - [`Job`] - trait for what a task computes
//! - [`JobFn`] - closure-backed job
//! - [`Ticker`] - timer-driven job that fills progress in steps

mod builder;
mod job;
mod job_fn;
mod task;
mod ticker;

pub use builder::TaskBuilder;
pub use job::Job;
pub use job_fn::JobFn;
pub use task::{DEFAULT_DESCRIPTION, DEFAULT_INCREMENT, Task, TaskRef};
pub use ticker::Ticker;
