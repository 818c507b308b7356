//! # Events re-published to a host by the embedded runner.
//!
//! The [`EventKind`] enum mirrors the listener callbacks:
//! - `TaskStarted`: the task began a run
//! - `TaskProgressed`: throttled progress update (carries `progress`)
//! - `TaskStopped`: the run is over; this is the host's completion signal
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use taskloop::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskProgressed)
//!     .with_task("Ripping track 3")
//!     .with_progress(0.25);
//!
//! assert_eq!(ev.kind, EventKind::TaskProgressed);
//! assert_eq!(ev.task.as_deref(), Some("Ripping track 3"));
//! assert_eq!(ev.progress, Some(0.25));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runner events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Task started a run.
    ///
    /// Sets:
    /// - `task`: task description
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskStarted,

    /// Task reported progress.
    ///
    /// Sets:
    /// - `task`: task description
    /// - `progress`: reported value
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskProgressed,

    /// Task stopped (completion signal).
    ///
    /// Sets:
    /// - `task`: task description
    /// - `progress`: last notified value
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskStopped,
}

/// Runner event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Description of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Progress value, if applicable.
    pub progress: Option<f64>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            progress: None,
        }
    }

    /// Attaches a task description.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a progress value.
    #[inline]
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// True for the event that marks the end of a run (`TaskStopped`).
    #[inline]
    pub fn is_completion(&self) -> bool {
        matches!(self.kind, EventKind::TaskStopped)
    }
}
