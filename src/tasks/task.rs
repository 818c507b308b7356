//! # The task entity: lifecycle state plus synchronous listener fan-out.
//!
//! A [`Task`] owns its progress state and notifies registered listeners of lifecycle and
//! progress events. What the task actually computes lives in its [`Job`].
//!
//! ## State machine
//! ```text
//!   Idle ──start──► Running ──stop──► Stopped
//!                      ▲                  │
//!                      └──────start───────┘   (start fully resets progress)
//! ```
//!
//! ## Rules
//! - Listeners are notified **synchronously**, in registration order, inside the call
//!   that raised the event. Duplicates are delivered twice.
//! - Delivery iterates a snapshot; listeners added or removed during delivery take
//!   effect from the next event.
//! - The first listener error aborts delivery and is returned to the caller.
//! - `progressed` fires for `value` iff `value - progress > increment`, or
//!   `value >= 1.0`, or `value == 0.0`. `progress` only moves on a firing call.
//! - The runner reference is weak and only set between `start` and `stop`.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::debug;

use crate::error::TaskError;
use crate::listeners::{ListenerRef, TaskListener};
use crate::runners::{Callback, RunnerRef, TaskRunner};
use crate::tasks::builder::TaskBuilder;
use crate::tasks::job::Job;
use crate::tasks::job_fn::JobFn;

/// Shared handle to a task.
pub type TaskRef = Rc<Task>;

/// Description used when none is given.
pub const DEFAULT_DESCRIPTION: &str = "I am doing something.";

/// Minimum progress delta that triggers a new `progressed` notification.
pub const DEFAULT_INCREMENT: f64 = 0.01;

/// A unit of long-running work exposing lifecycle and progress notifications.
pub struct Task {
    description: Cow<'static, str>,
    increment: f64,
    progress: Cell<f64>,
    running: Cell<bool>,
    runner: RefCell<Option<Weak<dyn TaskRunner>>>,
    listeners: RefCell<Vec<ListenerRef>>,
    job: Box<dyn Job>,
}

impl Task {
    /// Creates a task with the given description and the default increment.
    pub fn new(description: impl Into<Cow<'static, str>>, job: impl Job) -> TaskRef {
        Self::builder(job).description(description).build()
    }

    /// Creates a task whose job is a closure invoked on every start.
    pub fn from_fn<F>(description: impl Into<Cow<'static, str>>, f: F) -> TaskRef
    where
        F: Fn(&TaskRef) -> Result<(), TaskError> + 'static,
    {
        Self::new(description, JobFn::new(f))
    }

    /// Returns a builder for a task running `job`.
    pub fn builder(job: impl Job) -> TaskBuilder {
        TaskBuilder::new(job)
    }

    pub(crate) fn from_parts(
        description: Cow<'static, str>,
        increment: f64,
        job: Box<dyn Job>,
    ) -> Self {
        Self {
            description,
            increment,
            progress: Cell::new(0.0),
            running: Cell::new(false),
            runner: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            job,
        }
    }

    /// Human-readable label for this task.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Last notified progress value.
    pub fn progress(&self) -> f64 {
        self.progress.get()
    }

    /// Throttling threshold for progress notifications.
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// True strictly between `start` and `stop`.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// The runner currently driving this task, if any.
    pub fn runner(&self) -> Option<RunnerRef> {
        self.runner.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Number of registered listeners (duplicates included).
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Starts the task under `runner`.
    ///
    /// Resets progress, marks the task running, stores a weak runner reference, notifies
    /// `started`, then hands control to the job.
    pub fn start(self: &Rc<Self>, runner: RunnerRef) -> Result<(), TaskError> {
        self.progress.set(0.0);
        self.running.set(true);
        *self.runner.borrow_mut() = Some(Rc::downgrade(&runner));
        debug!(task = %self.description, "starting");

        self.notify(|l| l.started(self))?;
        self.job.start(self)
    }

    /// Stops the task.
    ///
    /// Lets the job clean up first, then clears the running flag and the runner
    /// reference and notifies `stopped`.
    pub fn stop(&self) -> Result<(), TaskError> {
        debug!(task = %self.description, "stopping");
        self.job.stop(self)?;

        self.running.set(false);
        self.runner.borrow_mut().take();
        self.notify(|l| l.stopped(self))
    }

    /// Reports progress; notifies listeners only when the change is worth reporting.
    ///
    /// Values are not clamped and decreasing values are compared literally.
    pub fn set_progress(&self, value: f64) -> Result<(), TaskError> {
        let last = self.progress.get();
        if value - last > self.increment || value >= 1.0 || value == 0.0 {
            self.progress.set(value);
            debug!(task = %self.description, progress = value, "notifying progress");
            self.notify(|l| l.progressed(self, value))?;
        }
        Ok(())
    }

    /// Appends a listener. No duplicate detection.
    pub fn add_listener(&self, listener: ListenerRef) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Removes the first registration of `listener` (pointer identity).
    ///
    /// Returns `true` if a registration was removed.
    pub fn remove_listener(&self, listener: &ListenerRef) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners
            .iter()
            .position(|l| std::ptr::addr_eq(Rc::as_ptr(l), Rc::as_ptr(listener)))
        {
            Some(idx) => {
                listeners.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Schedules `callback` on the runner currently driving this task.
    pub fn schedule(&self, delay: Duration, callback: Callback) -> Result<(), TaskError> {
        let runner = self.runner().ok_or(TaskError::NoRunner)?;
        runner.schedule(delay, callback)?;
        Ok(())
    }

    fn notify<F>(&self, mut deliver: F) -> Result<(), TaskError>
    where
        F: FnMut(&dyn TaskListener) -> Result<(), TaskError>,
    {
        let listeners: Vec<ListenerRef> = self.listeners.borrow().clone();
        for listener in &listeners {
            deliver(listener.as_ref())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("description", &self.description)
            .field("progress", &self.progress.get())
            .field("increment", &self.increment)
            .field("running", &self.running.get())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::FnListener;
    use std::collections::VecDeque;

    /// Runner that queues callbacks until the test pumps them.
    #[derive(Default)]
    struct Manual {
        queue: RefCell<VecDeque<Callback>>,
    }

    impl Manual {
        fn pump(&self) -> Result<usize, TaskError> {
            let mut n = 0;
            loop {
                let next = self.queue.borrow_mut().pop_front();
                match next {
                    Some(cb) => {
                        cb()?;
                        n += 1;
                    }
                    None => return Ok(n),
                }
            }
        }
    }

    impl TaskListener for Manual {}

    impl TaskRunner for Manual {
        fn schedule(&self, _delay: Duration, callback: Callback) -> Result<(), crate::RuntimeError> {
            self.queue.borrow_mut().push_back(callback);
            Ok(())
        }
    }

    /// Records every notification as a string.
    #[derive(Default)]
    struct Recorder {
        tag: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl TaskListener for Recorder {
        fn started(&self, _task: &Task) -> Result<(), TaskError> {
            self.log.borrow_mut().push(format!("{}started", self.tag));
            Ok(())
        }

        fn progressed(&self, _task: &Task, value: f64) -> Result<(), TaskError> {
            self.log.borrow_mut().push(format!("{}progressed {value}", self.tag));
            Ok(())
        }

        fn stopped(&self, _task: &Task) -> Result<(), TaskError> {
            self.log.borrow_mut().push(format!("{}stopped", self.tag));
            Ok(())
        }
    }

    fn idle() -> TaskRef {
        Task::from_fn("idle", |_task: &TaskRef| Ok(()))
    }

    fn recorded(task: &TaskRef) -> Rc<RefCell<Vec<String>>> {
        let rec = Rc::new(Recorder::default());
        let log = rec.log.clone();
        task.add_listener(rec);
        log
    }

    #[test]
    fn test_defaults() {
        let task = Task::builder(JobFn::new(|_t: &TaskRef| Ok(()))).build();
        assert_eq!(task.description(), DEFAULT_DESCRIPTION);
        assert_eq!(task.increment(), DEFAULT_INCREMENT);
        assert_eq!(task.progress(), 0.0);
        assert!(!task.is_running());
        assert!(task.runner().is_none());
    }

    #[test]
    fn test_throttling_scenario() {
        let task = idle();
        let log = recorded(&task);

        for v in [0.0, 0.5, 0.505, 1.0] {
            task.set_progress(v).unwrap();
        }

        assert_eq!(
            *log.borrow(),
            vec!["progressed 0", "progressed 0.5", "progressed 1"]
        );
        assert_eq!(task.progress(), 1.0);
    }

    #[test]
    fn test_zero_always_notifies() {
        let task = idle();
        let log = recorded(&task);

        for _ in 0..3 {
            task.set_progress(0.0).unwrap();
        }
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_last_notified_moves_only_on_fire() {
        let task = idle();
        let log = recorded(&task);

        // 0.006 + 0.006 crosses the increment only relative to the last *notified* value.
        task.set_progress(0.006).unwrap();
        task.set_progress(0.012).unwrap();
        assert_eq!(*log.borrow(), vec!["progressed 0.012"]);
        assert_eq!(task.progress(), 0.012);
    }

    #[test]
    fn test_decreasing_value_compared_literally() {
        let task = idle();
        let log = recorded(&task);

        task.set_progress(0.5).unwrap();
        task.set_progress(0.3).unwrap();
        assert_eq!(task.progress(), 0.5);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_values_above_one_always_notify_unclamped() {
        let task = idle();
        let log = recorded(&task);

        task.set_progress(1.0).unwrap();
        task.set_progress(1.0).unwrap();
        task.set_progress(1.5).unwrap();
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(task.progress(), 1.5);
    }

    #[test]
    fn test_start_resets_and_notifies_once() {
        let runner = Rc::new(Manual::default());
        let task = idle();
        let log = recorded(&task);

        task.set_progress(0.7).unwrap();
        task.start(runner.clone()).unwrap();

        assert!(task.is_running());
        assert_eq!(task.progress(), 0.0);
        assert!(task.runner().is_some());
        assert_eq!(*log.borrow(), vec!["progressed 0.7", "started"]);
    }

    #[test]
    fn test_stop_clears_runner_and_notifies_once() {
        let runner = Rc::new(Manual::default());
        let task = idle();
        let log = recorded(&task);

        task.start(runner.clone()).unwrap();
        task.set_progress(0.4).unwrap();
        task.stop().unwrap();

        assert!(!task.is_running());
        assert!(task.runner().is_none());
        assert_eq!(*log.borrow(), vec!["started", "progressed 0.4", "stopped"]);
    }

    #[test]
    fn test_restart_returns_to_running_with_zero_progress() {
        let runner = Rc::new(Manual::default());
        let task = idle();
        let log = recorded(&task);

        task.start(runner.clone()).unwrap();
        task.set_progress(1.0).unwrap();
        task.stop().unwrap();
        task.start(runner.clone()).unwrap();

        assert!(task.is_running());
        assert_eq!(task.progress(), 0.0);
        let starts = log.borrow().iter().filter(|e| *e == "started").count();
        assert_eq!(starts, 2);
    }

    #[test]
    fn test_listeners_in_registration_order_with_duplicates() {
        let task = idle();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::new(Recorder { tag: "a:", log: log.clone() });
        let b = Rc::new(Recorder { tag: "b:", log: log.clone() });

        task.add_listener(a.clone());
        task.add_listener(b);
        task.add_listener(a);
        task.set_progress(0.0).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["a:progressed 0", "b:progressed 0", "a:progressed 0"]
        );
    }

    #[test]
    fn test_remove_listener_removes_first_registration() {
        let task = idle();
        let rec: ListenerRef = Rc::new(Recorder::default());
        task.add_listener(rec.clone());
        task.add_listener(rec.clone());

        assert!(task.remove_listener(&rec));
        assert_eq!(task.listener_count(), 1);
        assert!(task.remove_listener(&rec));
        assert!(!task.remove_listener(&rec));
    }

    #[test]
    fn test_listener_error_aborts_delivery() {
        let task = idle();
        task.add_listener(Rc::new(
            FnListener::new().on_progressed(|_t, _v| Err(TaskError::fail("listener broke"))),
        ));
        let log = recorded(&task);

        let err = task.set_progress(0.0).unwrap_err();
        assert!(matches!(err, TaskError::Fail { .. }));
        assert!(log.borrow().is_empty());
        // progress is updated before delivery
        assert_eq!(task.progress(), 0.0);
    }

    #[test]
    fn test_job_hooks_chain_around_base() {
        struct Hooks(Rc<RefCell<Vec<String>>>);

        impl Job for Hooks {
            fn start(&self, task: &TaskRef) -> Result<(), TaskError> {
                self.0.borrow_mut().push(format!("job start running={}", task.is_running()));
                Ok(())
            }

            fn stop(&self, task: &Task) -> Result<(), TaskError> {
                self.0.borrow_mut().push(format!("job stop running={}", task.is_running()));
                Ok(())
            }
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let task = Task::new("hooks", Hooks(log.clone()));
        task.add_listener(Rc::new(Recorder { tag: "", log: log.clone() }));

        task.start(Rc::new(Manual::default())).unwrap();
        task.stop().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "started",
                "job start running=true",
                "job stop running=true",
                "stopped"
            ]
        );
    }

    #[test]
    fn test_schedule_without_runner_fails() {
        let task = idle();
        let err = task.schedule(Duration::ZERO, Box::new(|| Ok(()))).unwrap_err();
        assert!(matches!(err, TaskError::NoRunner));
    }

    #[test]
    fn test_schedule_forwards_to_runner() {
        let runner = Rc::new(Manual::default());
        let task = Task::from_fn("two-step", |task: &TaskRef| {
            let this = task.clone();
            task.schedule(
                Duration::from_secs(1),
                Box::new(move || {
                    this.set_progress(1.0)?;
                    this.stop()
                }),
            )
        });
        let log = recorded(&task);

        task.start(runner.clone()).unwrap();
        assert_eq!(runner.pump().unwrap(), 1);
        assert_eq!(*log.borrow(), vec!["started", "progressed 1", "stopped"]);
    }

    #[test]
    fn test_runner_reference_is_weak() {
        let runner = Rc::new(Manual::default());
        let task = idle();
        task.start(runner.clone()).unwrap();
        drop(runner);
        assert!(task.runner().is_none());
        assert!(task.is_running());
    }
}
