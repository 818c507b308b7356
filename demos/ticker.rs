//! # Example: ticker
//!
//! Runs the built-in [`Ticker`] on a [`SyncRunner`] with a [`LogListener`] attached.
//!
//! Demonstrates how to:
//! - Build a task from a ready-made job.
//! - Observe it through `tracing`.
//! - Block on it until it stops, with an in-place console progress line.
//!
//! ## Flow
//! ```text
//! SyncRunner::run(task)
//!     ├─► started          (LogListener: INFO)
//!     ├─► 10 × progressed  (console line + LogListener: DEBUG)
//!     └─► stopped          (LogListener: INFO) ──► run returns
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example ticker --features logging
//! ```

use std::rc::Rc;
use std::time::Duration;

use taskloop::{LogListener, RunnerConfig, SyncRunner, Task, TaskRunner, Ticker};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logs go to stderr so they do not fight with the progress line on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // 2. Ten steps of 0.1, a quarter second apart
    let task = Task::new("Ticking", Ticker::new(0.1, Duration::from_millis(250)));
    task.add_listener(Rc::new(LogListener::new()));

    // 3. Keep the final line on screen
    let runner = SyncRunner::new(RunnerConfig::default().with_output(true, true));
    runner.run(task.clone())?;

    println!("done at {:.0} %", task.progress() * 100.0);
    Ok(())
}
