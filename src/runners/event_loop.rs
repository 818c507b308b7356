//! # Cooperative single-threaded event loop.
//!
//! [`EventLoop`] is the scheduler primitive every runner is built on: a queue of one-shot
//! timers dispatched on a private current-thread tokio runtime. [`LoopHandle`] is the
//! injectable capability ("register a one-shot deferred call") handed to runners.
//!
//! ## Architecture
//! ```text
//! LoopHandle::call_later(delay, cb) ──► Timers (min-heap by deadline, seq)
//!                                              │
//! EventLoop::run()                             ▼
//!   loop {
//!     ├─► quit requested?          ──► return Ok
//!     ├─► queue empty?             ──► Stalled (run) / Ok (run_until_idle)
//!     ├─► sleep_until(next deadline) or quit
//!     └─► pop timer, call it       ──► Err aborts the loop
//!   }
//! ```
//!
//! ## Rules
//! - Callbacks run to completion; nothing runs concurrently with them.
//! - Equal deadlines fire in scheduling order (FIFO).
//! - Handles are weak: using one after its loop is dropped yields `LoopClosed`.
//! - Quitting is final for a loop instance.
//! - Cannot be created or driven from inside another runtime (including a callback of
//!   another loop); both report `Nested`.

use std::cell::RefCell;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::error::RuntimeError;
use crate::runners::runner::Callback;

struct Timer {
    deadline: Instant,
    seq: u64,
    callback: Callback,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

#[derive(Default)]
struct Timers {
    heap: BinaryHeap<Reverse<Timer>>,
    next_seq: u64,
}

impl Timers {
    fn push(&mut self, deadline: Instant, callback: Callback) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Timer {
            deadline,
            seq,
            callback,
        }));
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(t)| t.deadline)
    }

    fn pop(&mut self) -> Option<Timer> {
        self.heap.pop().map(|Reverse(t)| t)
    }
}

/// Owner of a timer queue and the runtime that dispatches it.
pub struct EventLoop {
    timers: Rc<RefCell<Timers>>,
    quit: CancellationToken,
    runtime: Runtime,
}

impl EventLoop {
    /// Creates an idle loop with its own current-thread runtime.
    ///
    /// Fails with [`RuntimeError::Nested`] when the calling thread is already inside a
    /// runtime.
    pub fn new() -> Result<Self, RuntimeError> {
        ensure_outside_runtime()?;
        let runtime = Builder::new_current_thread().enable_time().build()?;
        Ok(Self {
            timers: Rc::new(RefCell::new(Timers::default())),
            quit: CancellationToken::new(),
            runtime,
        })
    }

    /// Returns a handle for scheduling into this loop.
    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            timers: Rc::downgrade(&self.timers),
            quit: self.quit.clone(),
        }
    }

    /// Schedules `callback` to run once after `delay`.
    pub fn call_later(&self, delay: Duration, callback: Callback) -> Result<(), RuntimeError> {
        self.handle().call_later(delay, callback)
    }

    /// Asks the loop to exit after the current callback.
    pub fn quit(&self) {
        self.quit.cancel();
    }

    /// Number of callbacks waiting to fire.
    pub fn pending(&self) -> usize {
        self.timers.borrow().heap.len()
    }

    /// Dispatches callbacks until [`quit`](EventLoop::quit) is requested.
    ///
    /// Returns [`RuntimeError::Stalled`] if the queue drains first.
    pub fn run(&self) -> Result<(), RuntimeError> {
        ensure_outside_runtime()?;
        self.runtime.block_on(self.dispatch(false))
    }

    /// Dispatches callbacks until the queue is empty or quit is requested.
    pub fn run_until_idle(&self) -> Result<(), RuntimeError> {
        ensure_outside_runtime()?;
        self.runtime.block_on(self.dispatch(true))
    }

    async fn dispatch(&self, until_idle: bool) -> Result<(), RuntimeError> {
        loop {
            if self.quit.is_cancelled() {
                return Ok(());
            }

            let next = self.timers.borrow().next_deadline();
            let Some(deadline) = next else {
                if until_idle {
                    return Ok(());
                }
                warn!("event loop drained without a quit request");
                return Err(RuntimeError::Stalled);
            };

            tokio::select! {
                biased;
                _ = self.quit.cancelled() => return Ok(()),
                _ = time::sleep_until(deadline) => {}
            }

            let timer = self.timers.borrow_mut().pop();
            if let Some(timer) = timer {
                trace!(seq = timer.seq, "dispatching callback");
                (timer.callback)()?;
            }
        }
    }
}

fn ensure_outside_runtime() -> Result<(), RuntimeError> {
    if Handle::try_current().is_ok() {
        warn!("event loop used from inside a running runtime");
        return Err(RuntimeError::Nested);
    }
    Ok(())
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("pending", &self.pending())
            .field("quit", &self.quit.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Weak, cloneable scheduling capability for one [`EventLoop`].
#[derive(Clone)]
pub struct LoopHandle {
    timers: Weak<RefCell<Timers>>,
    quit: CancellationToken,
}

impl LoopHandle {
    /// Schedules `callback` to run once after `delay`.
    pub fn call_later(&self, delay: Duration, callback: Callback) -> Result<(), RuntimeError> {
        let deadline = Instant::now()
            .checked_add(delay)
            .ok_or(RuntimeError::InvalidDelay {
                delta: delay.as_secs_f64(),
            })?;
        self.call_at(deadline, callback)
    }

    /// Schedules `callback` to run once at `deadline`.
    ///
    /// Callbacks sharing a deadline fire in the order they were scheduled.
    pub fn call_at(&self, deadline: Instant, callback: Callback) -> Result<(), RuntimeError> {
        let timers = self.timers.upgrade().ok_or(RuntimeError::LoopClosed)?;
        timers.borrow_mut().push(deadline, callback);
        Ok(())
    }

    /// Asks the loop to exit after the current callback.
    pub fn quit(&self) {
        self.quit.cancel();
    }

    /// True once quit has been requested.
    pub fn is_quit(&self) -> bool {
        self.quit.is_cancelled()
    }

    /// True once the loop has been dropped.
    pub fn is_closed(&self) -> bool {
        self.timers.strong_count() == 0
    }
}

impl fmt::Debug for LoopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopHandle")
            .field("closed", &self.is_closed())
            .field("quit", &self.is_quit())
            .finish()
    }
}
