//! # Ticker: a task that advances on a timer
//!
//! The smallest useful [`Job`]: every `interval` it moves progress forward by `step`,
//! and stops once it reaches `1.0`. Handy for checking that a runner works at all.
//!
//! ## Flow
//! ```text
//! start ──► schedule(interval, tick)
//! tick  ──► set_progress(min(ticks × step, 1.0))
//!           ├─ progress >= 1.0 ──► stop()
//!           └─ otherwise        ──► schedule(interval, tick)
//! ```
//!
//! Progress is derived from the tick count, so ten `0.1` steps land exactly on `1.0`.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tracing::warn;

use crate::error::TaskError;
use crate::tasks::job::Job;
use crate::tasks::task::TaskRef;

/// Timer-driven job that fills progress in equal steps.
#[derive(Debug)]
pub struct Ticker {
    state: Rc<TickState>,
}

#[derive(Debug)]
struct TickState {
    step: f64,
    interval: Duration,
    ticks: Cell<u32>,
}

impl Ticker {
    /// Progress added per tick by default.
    pub const DEFAULT_STEP: f64 = 0.1;

    /// Delay between ticks by default.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    /// Creates a ticker. A `step` that is not a positive number falls back to
    /// [`Ticker::DEFAULT_STEP`].
    pub fn new(step: f64, interval: Duration) -> Self {
        let step = if step > 0.0 && step.is_finite() {
            step
        } else {
            warn!(step, "ticker step must be positive; using default");
            Self::DEFAULT_STEP
        };
        Self {
            state: Rc::new(TickState {
                step,
                interval,
                ticks: Cell::new(0),
            }),
        }
    }

    /// Progress added per tick.
    pub fn step(&self) -> f64 {
        self.state.step
    }

    /// Delay between ticks.
    pub fn interval(&self) -> Duration {
        self.state.interval
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP, Self::DEFAULT_INTERVAL)
    }
}

impl Job for Ticker {
    fn start(&self, task: &TaskRef) -> Result<(), TaskError> {
        self.state.ticks.set(0);
        schedule_tick(task, Rc::clone(&self.state))
    }
}

fn schedule_tick(task: &TaskRef, state: Rc<TickState>) -> Result<(), TaskError> {
    let this = Rc::clone(task);
    let interval = state.interval;
    task.schedule(interval, Box::new(move || tick(this, state)))
}

fn tick(task: TaskRef, state: Rc<TickState>) -> Result<(), TaskError> {
    let ticks = state.ticks.get().saturating_add(1);
    state.ticks.set(ticks);

    task.set_progress((f64::from(ticks) * state.step).min(1.0))?;
    if task.progress() >= 1.0 {
        return task.stop();
    }
    schedule_tick(&task, state)
}
