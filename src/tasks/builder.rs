use std::borrow::Cow;
use std::rc::Rc;

use crate::tasks::job::Job;
use crate::tasks::task::{DEFAULT_DESCRIPTION, DEFAULT_INCREMENT, Task, TaskRef};

/// Builder for [`Task`] with fluent API.
///
/// Every task gets its own description and increment; nothing is shared between instances.
pub struct TaskBuilder {
    description: Cow<'static, str>,
    increment: f64,
    job: Box<dyn Job>,
}

impl TaskBuilder {
    /// Creates a new builder for a task running `job`.
    pub fn new(job: impl Job) -> Self {
        Self {
            description: Cow::Borrowed(DEFAULT_DESCRIPTION),
            increment: DEFAULT_INCREMENT,
            job: Box::new(job),
        }
    }

    /// Sets the human-readable label.
    pub fn description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the minimum progress delta that triggers a notification.
    pub fn increment(mut self, increment: f64) -> Self {
        self.increment = increment;
        self
    }

    /// Builds the task as a shared handle.
    pub fn build(self) -> TaskRef {
        Rc::new(Task::from_parts(self.description, self.increment, self.job))
    }
}
