//! # Host-embedded runner: fire-and-forget on someone else's loop.
//!
//! [`EmbeddedRunner`] implements the same [`TaskRunner`] contract as
//! [`SyncRunner`](crate::SyncRunner), but the loop belongs to the host (for example a UI
//! toolkit's main loop). `run` starts the task and returns; the host keeps dispatching
//! scheduled callbacks and learns about completion from the runner's [`Bus`].
//!
//! ## Flow
//! ```text
//! host: EventLoop ──handle──► EmbeddedRunner::new(handle, cfg)
//! runner.run(task)
//!   ├─► task.add_listener(self)
//!   ├─► task.start(self)        (synchronous)
//!   └─► return                  (no blocking)
//! host: event_loop.run_until_idle() / run()
//!   └─ ... callbacks ... ──► started/progressed/stopped ──► Bus.publish(Event)
//!                                                  └─ TaskStopped = completion signal
//! ```

use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::debug;

use crate::config::RunnerConfig;
use crate::error::{RuntimeError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::listeners::{ListenerRef, TaskListener};
use crate::runners::event_loop::LoopHandle;
use crate::runners::runner::{Callback, RunnerRef, TaskRunner};
use crate::tasks::{Task, TaskRef};

/// Runner that schedules into a host-owned loop and signals the host on completion.
pub struct EmbeddedRunner {
    host: LoopHandle,
    bus: Bus,
    me: Weak<EmbeddedRunner>,
}

impl EmbeddedRunner {
    /// Creates a runner posting into the host loop behind `host`.
    pub fn new(host: LoopHandle, cfg: RunnerConfig) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            host,
            bus: Bus::new(cfg.bus_capacity_clamped()),
            me: me.clone(),
        })
    }

    /// Receiver for lifecycle events; `TaskStopped` marks completion.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// The bus events are published on.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    fn event(kind: EventKind, task: &Task) -> Event {
        Event::new(kind).with_task(task.description())
    }
}

impl TaskRunner for EmbeddedRunner {
    fn run(self: Rc<Self>, task: TaskRef) -> Result<(), RuntimeError> {
        if self.host.is_closed() {
            return Err(RuntimeError::LoopClosed);
        }

        let listener: ListenerRef = self.clone();
        task.add_listener(listener.clone());
        debug!(task = task.description(), "running on host loop");

        let runner: RunnerRef = self;
        if let Err(err) = task.start(runner) {
            task.remove_listener(&listener);
            return Err(err.into());
        }
        Ok(())
    }

    fn schedule(&self, delay: Duration, callback: Callback) -> Result<(), RuntimeError> {
        self.host.call_later(delay, callback)
    }
}

impl TaskListener for EmbeddedRunner {
    fn started(&self, task: &Task) -> Result<(), TaskError> {
        self.bus.publish(Self::event(EventKind::TaskStarted, task));
        Ok(())
    }

    fn progressed(&self, task: &Task, value: f64) -> Result<(), TaskError> {
        self.bus
            .publish(Self::event(EventKind::TaskProgressed, task).with_progress(value));
        Ok(())
    }

    fn stopped(&self, task: &Task) -> Result<(), TaskError> {
        if let Some(me) = self.me.upgrade() {
            let listener: ListenerRef = me;
            task.remove_listener(&listener);
        }
        self.bus.publish(
            Self::event(EventKind::TaskStopped, task)
                .with_progress(task.progress()),
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "EmbeddedRunner"
    }
}

impl fmt::Debug for EmbeddedRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedRunner")
            .field("host", &self.host)
            .field("receivers", &self.bus.receiver_count())
            .finish_non_exhaustive()
    }
}
