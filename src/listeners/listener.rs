//! # Task listener trait.
//!
//! Provides [`TaskListener`] the capability a consumer implements to observe a task.
//!
//! ## Rules
//! - Callbacks run **synchronously** on the turn that raised the event, in registration order.
//! - There is no queue and no isolation: an `Err` returned from a callback aborts delivery
//!   and propagates to whoever raised the event (task logic or the loop's dispatch).
//! - Per run, a listener sees `started`, then zero or more `progressed`, then `stopped`.
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use taskloop::{Task, TaskError, TaskListener};
//!
//! #[derive(Default)]
//! struct Peak(Cell<f64>);
//!
//! impl TaskListener for Peak {
//!     fn progressed(&self, _task: &Task, value: f64) -> Result<(), TaskError> {
//!         self.0.set(self.0.get().max(value));
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "peak" }
//! }
//! ```

use std::rc::Rc;

use crate::error::TaskError;
use crate::tasks::Task;

/// Shared handle to a listener.
pub type ListenerRef = Rc<dyn TaskListener>;

/// Consumer of task lifecycle and progress notifications.
///
/// Every callback defaults to a no-op, so implementors override only what they need.
pub trait TaskListener {
    /// The task has started a run.
    fn started(&self, task: &Task) -> Result<(), TaskError> {
        let _ = task;
        Ok(())
    }

    /// The task reported progress worth showing.
    ///
    /// `value` is usually in `[0.0, 1.0]`; it is not clamped.
    fn progressed(&self, task: &Task, value: f64) -> Result<(), TaskError> {
        let _ = (task, value);
        Ok(())
    }

    /// The task has stopped.
    fn stopped(&self, task: &Task) -> Result<(), TaskError> {
        let _ = task;
        Ok(())
    }

    /// Returns the listener name used in logs.
    ///
    /// The default uses `type_name::<Self>()`; override it with something short.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
