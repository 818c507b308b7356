//! # Closure-backed listener (`FnListener`)
//!
//! Attach any subset of the three callbacks independently:
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use taskloop::{FnListener, Task, TaskRef};
//!
//! let done = Rc::new(Cell::new(false));
//! let flag = done.clone();
//!
//! let task: TaskRef = Task::from_fn("noop", |_t: &TaskRef| Ok(()));
//! task.add_listener(Rc::new(FnListener::new().on_stopped(move |_t| {
//!     flag.set(true);
//!     Ok(())
//! })));
//! ```

use std::fmt;

use crate::error::TaskError;
use crate::listeners::listener::TaskListener;
use crate::tasks::Task;

type LifecycleFn = Box<dyn Fn(&Task) -> Result<(), TaskError>>;
type ProgressFn = Box<dyn Fn(&Task, f64) -> Result<(), TaskError>>;

/// Listener made of optional closures; missing callbacks are no-ops.
#[derive(Default)]
pub struct FnListener {
    started: Option<LifecycleFn>,
    progressed: Option<ProgressFn>,
    stopped: Option<LifecycleFn>,
}

impl FnListener {
    /// Construct a listener with no callbacks attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the `started` callback, replacing any previous one.
    pub fn on_started<F>(mut self, f: F) -> Self
    where
        F: Fn(&Task) -> Result<(), TaskError> + 'static,
    {
        self.started = Some(Box::new(f));
        self
    }

    /// Attaches the `progressed` callback, replacing any previous one.
    pub fn on_progressed<F>(mut self, f: F) -> Self
    where
        F: Fn(&Task, f64) -> Result<(), TaskError> + 'static,
    {
        self.progressed = Some(Box::new(f));
        self
    }

    /// Attaches the `stopped` callback, replacing any previous one.
    pub fn on_stopped<F>(mut self, f: F) -> Self
    where
        F: Fn(&Task) -> Result<(), TaskError> + 'static,
    {
        self.stopped = Some(Box::new(f));
        self
    }
}

impl TaskListener for FnListener {
    fn started(&self, task: &Task) -> Result<(), TaskError> {
        self.started.as_ref().map_or(Ok(()), |f| f(task))
    }

    fn progressed(&self, task: &Task, value: f64) -> Result<(), TaskError> {
        self.progressed.as_ref().map_or(Ok(()), |f| f(task, value))
    }

    fn stopped(&self, task: &Task) -> Result<(), TaskError> {
        self.stopped.as_ref().map_or(Ok(()), |f| f(task))
    }

    fn name(&self) -> &'static str {
        "FnListener"
    }
}

impl fmt::Debug for FnListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener")
            .field("started", &self.started.is_some())
            .field("progressed", &self.progressed.is_some())
            .field("stopped", &self.stopped.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskRef;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_only_attached_callbacks_fire() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let task: TaskRef = Task::from_fn("partial", |_t: &TaskRef| Ok(()));
        task.add_listener(Rc::new(FnListener::new().on_progressed(move |t, v| {
            s.borrow_mut().push(format!("{} {v}", t.description()));
            Ok(())
        })));

        task.set_progress(0.0).unwrap();
        task.set_progress(1.0).unwrap();
        task.stop().unwrap();

        assert_eq!(*seen.borrow(), vec!["partial 0", "partial 1"]);
    }

    #[test]
    fn test_debug_shows_attached_callbacks() {
        let l = FnListener::new().on_started(|_t| Ok(()));
        let s = format!("{l:?}");
        assert!(s.contains("started: true"));
        assert!(s.contains("stopped: false"));
    }
}
