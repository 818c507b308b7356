//! # LogListener: task lifecycle through `tracing`
//!
//! A minimal listener that logs every notification it receives.
//! Use it for demos or while debugging a job.
//!
//! ## Example output (with `tracing-subscriber` fmt)
//! ```text
//! INFO taskloop: started task="Ripping track 1"
//! DEBUG taskloop: progressed task="Ripping track 1" percent=40
//! INFO taskloop: stopped task="Ripping track 1" progress=1.0
//! ```

use tracing::{debug, info};

use crate::error::TaskError;
use crate::listeners::TaskListener;
use crate::tasks::Task;

/// Lifecycle logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogListener;

impl LogListener {
    /// Construct a new [`LogListener`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TaskListener for LogListener {
    fn started(&self, task: &Task) -> Result<(), TaskError> {
        info!(task = task.description(), "started");
        Ok(())
    }

    fn progressed(&self, task: &Task, value: f64) -> Result<(), TaskError> {
        debug!(
            task = task.description(),
            percent = (value * 100.0) as i64,
            "progressed"
        );
        Ok(())
    }

    fn stopped(&self, task: &Task) -> Result<(), TaskError> {
        info!(task = task.description(), progress = task.progress(), "stopped");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LogListener"
    }
}
