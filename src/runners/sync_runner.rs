//! # Blocking runner: drive one task on a private loop.
//!
//! [`SyncRunner::run`] owns a fresh [`EventLoop`] for every call and blocks the caller
//! until the task stops.
//!
//! ## Flow
//! ```text
//! run(task)
//!   ├─► new EventLoop (private, single-use)
//!   ├─► task.add_listener(self)
//!   ├─► call_later(0, task.start(self))   (the loop is live before the task can finish)
//!   ├─► loop.run()  ◄── blocks
//!   │      └─ ... scheduled callbacks, set_progress, stop ...
//!   │                                       └─► stopped() ──► loop.quit()
//!   └─► task.remove_listener(self), return
//! ```
//!
//! ## Console output (`verbose`)
//! ```text
//! "<description> <pct:3> %\r"       each progress update, rewritten in place
//! "<description> 100 %\n"           at completion with `skip`
//! "<spaces>\r"                      at completion without `skip` (line erased)
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::config::RunnerConfig;
use crate::error::{RuntimeError, TaskError};
use crate::listeners::{ListenerRef, TaskListener};
use crate::runners::event_loop::{EventLoop, LoopHandle};
use crate::runners::runner::{Callback, RunnerRef, TaskRunner};
use crate::tasks::{Task, TaskRef};

/// Runs a task synchronously on its own cooperative loop.
pub struct SyncRunner {
    cfg: Cell<RunnerConfig>,
    active: RefCell<Option<LoopHandle>>,
    out: RefCell<Box<dyn Write>>,
}

impl SyncRunner {
    /// Creates a runner that writes progress to stdout.
    pub fn new(cfg: RunnerConfig) -> Rc<Self> {
        Self::with_writer(cfg, io::stdout())
    }

    /// Creates a runner that writes progress to `out`.
    pub fn with_writer(cfg: RunnerConfig, out: impl Write + 'static) -> Rc<Self> {
        Rc::new(Self {
            cfg: Cell::new(cfg),
            active: RefCell::new(None),
            out: RefCell::new(Box::new(out)),
        })
    }

    /// Current configuration.
    pub fn config(&self) -> RunnerConfig {
        self.cfg.get()
    }

    /// True while `run` is blocked on the loop.
    pub fn is_running(&self) -> bool {
        self.active.borrow().is_some()
    }

    /// Runs `task` with explicit console settings.
    ///
    /// The settings apply to this call only; the configured ones are restored afterwards.
    pub fn run_with(self: &Rc<Self>, task: TaskRef, verbose: bool, skip: bool) -> Result<(), RuntimeError> {
        if self.is_running() {
            return Err(RuntimeError::Busy);
        }
        let saved = self.cfg.replace(self.cfg.get().with_output(verbose, skip));
        let result = Rc::clone(self).run(task);
        self.cfg.set(saved);
        result
    }

    fn write_progress(&self, task: &Task, value: f64) -> io::Result<()> {
        let cfg = self.cfg.get();
        let mut out = self.out.borrow_mut();

        write!(out, "{} {:3} %\r", task.description(), (value * 100.0) as i64)?;
        out.flush()?;

        if value >= 1.0 {
            let text = format!("{} {:3} %", task.description(), 100);
            if cfg.skip {
                writeln!(out, "{text}")?;
            } else {
                write!(out, "{}\r", " ".repeat(text.chars().count()))?;
            }
            out.flush()?;
        }
        Ok(())
    }
}

impl TaskRunner for SyncRunner {
    fn run(self: Rc<Self>, task: TaskRef) -> Result<(), RuntimeError> {
        if self.is_running() {
            return Err(RuntimeError::Busy);
        }

        let event_loop = EventLoop::new()?;
        let handle = event_loop.handle();
        *self.active.borrow_mut() = Some(handle.clone());

        let listener: ListenerRef = self.clone();
        task.add_listener(listener.clone());
        debug!(task = task.description(), "running");

        let runner: RunnerRef = self.clone();
        let starting = Rc::clone(&task);
        let result = handle
            .call_later(Duration::ZERO, Box::new(move || starting.start(runner)))
            .and_then(|()| event_loop.run());

        task.remove_listener(&listener);
        self.active.borrow_mut().take();
        result
    }

    fn schedule(&self, delay: Duration, callback: Callback) -> Result<(), RuntimeError> {
        let handle = self.active.borrow().clone().ok_or(RuntimeError::NotRunning)?;
        handle.call_later(delay, callback)
    }
}

impl TaskListener for SyncRunner {
    fn progressed(&self, task: &Task, value: f64) -> Result<(), TaskError> {
        if !self.cfg.get().verbose {
            return Ok(());
        }
        self.write_progress(task, value)?;
        Ok(())
    }

    fn stopped(&self, _task: &Task) -> Result<(), TaskError> {
        if let Some(handle) = self.active.borrow().as_ref() {
            handle.quit();
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "SyncRunner"
    }
}

impl fmt::Debug for SyncRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncRunner")
            .field("cfg", &self.cfg.get())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Ticker;

    #[derive(Clone, Default)]
    struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn halves() -> TaskRef {
        Task::new("t", Ticker::new(0.5, Duration::ZERO))
    }

    #[test]
    fn test_final_line_erased_without_skip() {
        let out = Capture::default();
        let runner = SyncRunner::with_writer(RunnerConfig::default(), out.clone());

        runner.run_with(halves(), true, false).unwrap();
        assert_eq!(out.text(), "t  50 %\rt 100 %\r       \r");
    }

    #[test]
    fn test_final_line_kept_with_skip() {
        let out = Capture::default();
        let runner = SyncRunner::with_writer(RunnerConfig::default(), out.clone());

        runner.run_with(halves(), true, true).unwrap();
        assert_eq!(out.text(), "t  50 %\rt 100 %\rt 100 %\n");
    }

    #[test]
    fn test_quiet_writes_nothing() {
        let out = Capture::default();
        let cfg = RunnerConfig::default().with_output(false, false);
        let runner = SyncRunner::with_writer(cfg, out.clone());

        runner.clone().run(halves()).unwrap();
        assert!(out.text().is_empty());
    }

    #[test]
    fn test_percentage_truncates() {
        let out = Capture::default();
        let runner = SyncRunner::with_writer(RunnerConfig::default(), out.clone());
        let task = Task::from_fn("x", |task: &TaskRef| {
            let this = task.clone();
            task.schedule(
                Duration::ZERO,
                Box::new(move || {
                    this.set_progress(0.079)?;
                    this.stop()
                }),
            )
        });

        runner.run_with(task, true, false).unwrap();
        assert_eq!(out.text(), "x   7 %\r");
    }

    #[test]
    fn test_schedule_outside_run_fails() {
        let runner = SyncRunner::with_writer(RunnerConfig::default(), io::sink());
        let err = runner.schedule(Duration::ZERO, Box::new(|| Ok(()))).unwrap_err();
        assert!(matches!(err, RuntimeError::NotRunning));
        assert!(!runner.is_running());
    }

    #[test]
    fn test_runner_deregisters_and_is_reusable() {
        let out = Capture::default();
        let runner = SyncRunner::with_writer(RunnerConfig::default(), out.clone());
        let task = halves();

        runner.run_with(task.clone(), true, true).unwrap();
        assert_eq!(task.listener_count(), 0);
        runner.run_with(task.clone(), true, true).unwrap();

        assert_eq!(out.text().matches("t 100 %\n").count(), 2);
        assert!(!task.is_running());
    }

    #[test]
    fn test_task_that_never_stops_stalls() {
        let runner = SyncRunner::with_writer(RunnerConfig::default(), io::sink());
        let task = Task::from_fn("forever", |_t: &TaskRef| Ok(()));

        let err = runner.clone().run(task.clone()).unwrap_err();
        assert!(matches!(err, RuntimeError::Stalled));
        assert!(task.is_running());
        assert!(!runner.is_running());
    }

    #[test]
    fn test_synchronous_stop_inside_start() {
        let runner = SyncRunner::with_writer(RunnerConfig::default(), io::sink());
        let task = Task::from_fn("instant", |task: &TaskRef| {
            task.set_progress(1.0)?;
            task.stop()
        });

        runner.clone().run(task.clone()).unwrap();
        assert!(!task.is_running());
        assert_eq!(task.progress(), 1.0);
    }

    #[test]
    fn test_run_with_does_not_stick() {
        let out = Capture::default();
        let cfg = RunnerConfig::default().with_output(false, false);
        let runner = SyncRunner::with_writer(cfg, out.clone());

        runner.run_with(halves(), true, true).unwrap();
        assert_eq!(runner.config(), cfg);

        let before = out.text();
        runner.clone().run(halves()).unwrap();
        assert_eq!(out.text(), before);
    }

    #[test]
    fn test_second_runner_inside_callback_gets_nested_error() {
        let seen = Rc::new(RefCell::new(None));
        let slot = seen.clone();
        let outer = Task::from_fn("outer", move |task: &TaskRef| {
            let (this, slot) = (task.clone(), slot.clone());
            task.schedule(
                Duration::ZERO,
                Box::new(move || {
                    let inner = SyncRunner::with_writer(RunnerConfig::default(), io::sink());
                    *slot.borrow_mut() = inner.run(halves()).err();
                    this.stop()
                }),
            )
        });
        let runner = SyncRunner::with_writer(RunnerConfig::default(), io::sink());

        runner.clone().run(outer).unwrap();
        assert!(matches!(*seen.borrow(), Some(RuntimeError::Nested)));
        assert!(!runner.is_running());
    }

    #[test]
    fn test_run_inside_tokio_runtime_gets_nested_error() {
        let runner = SyncRunner::with_writer(RunnerConfig::default(), io::sink());
        let task = halves();
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let err = rt
            .block_on(async { runner.clone().run(task.clone()) })
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Nested));
        assert!(!runner.is_running());
        assert_eq!(task.listener_count(), 0);
        assert!(!task.is_running());
    }

    #[test]
    fn test_nested_run_is_rejected() {
        let runner = SyncRunner::with_writer(RunnerConfig::default(), io::sink());
        let inner = halves();
        let task = Task::from_fn("outer", |_t: &TaskRef| Ok(()));
        let again = runner.clone();
        task.add_listener(Rc::new(crate::listeners::FnListener::new().on_started(
            move |_t| {
                let err = again.clone().run(inner.clone()).unwrap_err();
                assert!(matches!(err, RuntimeError::Busy));
                Err(TaskError::fail("done checking"))
            },
        )));

        let err = runner.clone().run(task).unwrap_err();
        assert!(matches!(err, RuntimeError::Task(TaskError::Fail { .. })));
    }
}
