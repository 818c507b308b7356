//! Runner events: types and broadcast bus.
//!
//! The embedded runner does not own a loop, so it cannot "return" when a task finishes.
//! Instead it re-publishes the task lifecycle as [`Event`]s on a [`Bus`]; the host
//! watches for [`EventKind::TaskStopped`].
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
