//! # Runners: the backends that drive tasks.
//!
//! - [`TaskRunner`] the contract every backend implements
//! - [`EventLoop`], [`LoopHandle`] cooperative timer loop and its scheduling capability
//! - [`SyncRunner`] blocks the caller on a private loop until the task stops
//! - [`EmbeddedRunner`] posts into a host loop and returns immediately

mod embedded;
mod event_loop;
mod runner;
mod sync_runner;

pub use embedded::EmbeddedRunner;
pub use event_loop::{EventLoop, LoopHandle};
pub use runner::{Callback, RunnerRef, TaskRunner};
pub use sync_runner::SyncRunner;
