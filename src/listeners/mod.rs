//! # Task listeners.
//!
//! This module provides the [`TaskListener`] trait and built-in implementations.
//!
//! ## Architecture
//! ```text
//! Notification flow (synchronous, same turn):
//!   Task::start/set_progress/stop ──► snapshot of listeners ──► listener 1
//!                                                          ──► listener 2
//!                                                          ──► ...
//!                                                               │
//!                                     ┌──────────────┬──────────┴───┬──────────────┐
//!                                     ▼              ▼              ▼              ▼
//!                                 SyncRunner   EmbeddedRunner   FnListener    LogListener
//!                               (console line)  (host events)   (closures)     (tracing)
//! ```
//!
//! Runners are listeners too: every [`TaskRunner`](crate::TaskRunner) implements
//! [`TaskListener`] and registers itself on the task it drives.

mod fn_listener;
mod listener;
#[cfg(feature = "logging")]
mod log;

pub use fn_listener::FnListener;
pub use listener::{ListenerRef, TaskListener};
#[cfg(feature = "logging")]
pub use log::LogListener;
