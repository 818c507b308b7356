//! # taskloop
//!
//! **Taskloop** is a small single-threaded framework for long-running, progress-reporting
//! tasks.
//!
//! A [`Task`] is written once against the [`TaskRunner`] contract and can then be driven
//! by interchangeable backends: [`SyncRunner`] blocks the caller on a private event loop,
//! [`EmbeddedRunner`] posts into a loop owned by a host application. Progress and
//! lifecycle reach interested parties through [`TaskListener`]s.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐        ┌──────────────┐        ┌──────────────┐
//!     │  Task + Job  │        │  Task + Job  │        │  Task + Job  │
//!     │  (Ticker)    │        │  (JobFn)     │        │  (custom)    │
//!     └──────┬───────┘        └──────┬───────┘        └──────┬───────┘
//!            │ run(task)             │ run(task)             │ run(task)
//!            ▼                       ▼                       ▼
//! ┌──────────────────────┐  ┌──────────────────────────────────────────┐
//! │  SyncRunner          │  │  EmbeddedRunner                          │
//! │  - private EventLoop │  │  - host LoopHandle                       │
//! │  - console progress  │  │  - Bus (TaskStarted/Progressed/Stopped)  │
//! │  - blocks until stop │  │  - returns immediately                   │
//! └──────────┬───────────┘  └────────────────────┬─────────────────────┘
//!            │ schedule(delay, cb)               │ schedule(delay, cb)
//!            ▼                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventLoop (timer heap on a current-thread tokio runtime)         │
//! │  one callback at a time, FIFO for equal deadlines                 │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! runner.run(task)
//!   ├─► task.add_listener(runner)
//!   ├─► task.start(runner) ──► started ──► job.start(task)
//!   │                                         └─ task.schedule(delay, cb)
//!   ├─► loop turns ──► cb ──► task.set_progress(v) ──► progressed (throttled)
//!   │                    └──► task.stop() ──► job.stop ──► stopped
//!   └─► runner observes `stopped`: SyncRunner quits its loop, EmbeddedRunner
//!       publishes TaskStopped and deregisters
//! ```
//!
//! ## Features
//! | Area          | Description                                          | Key types / traits                         |
//! |---------------|------------------------------------------------------|--------------------------------------------|
//! | **Tasks**     | Lifecycle, throttled progress, listener fan-out.     | [`Task`], [`Job`], [`JobFn`], [`Ticker`]   |
//! | **Listeners** | Observe started/progressed/stopped.                  | [`TaskListener`], [`FnListener`]           |
//! | **Runners**   | Interchangeable execution backends.                  | [`TaskRunner`], [`SyncRunner`], [`EmbeddedRunner`] |
//! | **Loop**      | Cooperative one-shot timer dispatch.                 | [`EventLoop`], [`LoopHandle`]              |
//! | **Events**    | Host-side completion signal.                         | [`Bus`], [`Event`], [`EventKind`]          |
//! | **Errors**    | Typed errors for runners and task logic.             | [`RuntimeError`], [`TaskError`]            |
//! | **Configuration** | Console output and bus sizing.                   | [`RunnerConfig`]                           |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogListener`] that reports through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskloop::{RunnerConfig, SyncRunner, Task, TaskRunner, Ticker};
//!
//! fn main() -> Result<(), taskloop::RuntimeError> {
//!     let task = Task::new("Copying", Ticker::new(0.25, Duration::from_millis(1)));
//!     let runner = SyncRunner::new(RunnerConfig::default().with_output(false, false));
//!
//!     runner.run(task.clone())?;
//!     assert_eq!(task.progress(), 1.0);
//!     Ok(())
//! }
//! ```
mod config;
mod error;
mod events;
mod listeners;
mod runners;
mod tasks;

// ---- Public re-exports ----

pub use config::RunnerConfig;
pub use error::{RuntimeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use listeners::{FnListener, ListenerRef, TaskListener};
pub use runners::{Callback, EmbeddedRunner, EventLoop, LoopHandle, RunnerRef, SyncRunner, TaskRunner};
pub use tasks::{
    DEFAULT_DESCRIPTION, DEFAULT_INCREMENT, Job, JobFn, Task, TaskBuilder, TaskRef, Ticker,
};

// Optional: expose a built-in tracing listener.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogListener;
