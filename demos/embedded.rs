//! # Example: embedded
//!
//! Drives two tasks on a loop owned by the "host" (here just `main`) with an
//! [`EmbeddedRunner`], and reads completion from the runner's event bus.
//!
//! ## Flow
//! ```text
//! host EventLoop ──handle──► EmbeddedRunner
//! runner.run(a), runner.run(b)     (both return at once)
//! host.run_until_idle()
//!     └─► callbacks interleave ──► Bus: TaskStarted / TaskProgressed / TaskStopped
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example embedded
//! ```

use std::time::Duration;

use taskloop::{EmbeddedRunner, EventKind, EventLoop, RunnerConfig, Task, TaskRunner, Ticker};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. The host owns the loop
    let host = EventLoop::new()?;
    let runner = EmbeddedRunner::new(host.handle(), RunnerConfig::default());
    let mut events = runner.subscribe();

    // 2. Start two tasks; neither call blocks
    let fast = Task::new("fast", Ticker::new(0.5, Duration::from_millis(20)));
    let slow = Task::new("slow", Ticker::new(0.25, Duration::from_millis(30)));
    runner.clone().run(fast)?;
    runner.clone().run(slow)?;

    // 3. Let the host turn the loop until nothing is left
    host.run_until_idle()?;

    // 4. Replay what the runner published
    while let Ok(ev) = events.try_recv() {
        let task = ev.task.as_deref().unwrap_or("-");
        match ev.kind {
            EventKind::TaskStarted => println!("[{task}] started"),
            EventKind::TaskProgressed => {
                println!("[{task}] {:.0} %", ev.progress.unwrap_or_default() * 100.0)
            }
            EventKind::TaskStopped => println!("[{task}] stopped"),
        }
    }
    Ok(())
}
