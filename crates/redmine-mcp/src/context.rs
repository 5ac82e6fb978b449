//! Default project/task context for the MCP server.
//!
//! The context holds at most two numeric ids that operations fall back to
//! when a caller omits an explicit project or task. It lives only for the
//! process lifetime.
//!
//! # Invariant
//!
//! [`Context`] itself never validates: callers store an id only after the
//! tracker has confirmed it exists, so a set slot always names an entity
//! that existed when it was stored.
//!
//! # Sharing
//!
//! The server shares one context as `Arc<Mutex<Context>>`. Each tool
//! invocation holds the lock for its whole duration, so invocations never
//! interleave their reads and writes of the context.

/// Current project and task defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    current_project: Option<u64>,
    current_task: Option<u64>,
}

/// Snapshot of both context slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextSnapshot {
    /// Numeric id of the current project, if set.
    pub project: Option<u64>,
    /// Numeric id of the current task, if set.
    pub task: Option<u64>,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the current project id, replacing any previous value.
    pub fn set_project(&mut self, id: u64) {
        self.current_project = Some(id);
    }

    /// The current project id.
    #[must_use]
    pub fn project(&self) -> Option<u64> {
        self.current_project
    }

    /// Store the current task id, replacing any previous value.
    pub fn set_task(&mut self, id: u64) {
        self.current_task = Some(id);
    }

    /// The current task id.
    #[must_use]
    pub fn task(&self) -> Option<u64> {
        self.current_task
    }

    /// Both slots at once.
    #[must_use]
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            project: self.current_project,
            task: self.current_task,
        }
    }

    /// Reset both slots.
    pub fn clear(&mut self) {
        self.current_project = None;
        self.current_task = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_context_is_empty() {
        assert_eq!(Context::new().snapshot(), ContextSnapshot::default());
    }

    #[test]
    fn test_set_and_get() {
        let mut context = Context::new();
        context.set_project(7);
        context.set_task(42);

        assert_eq!(context.project(), Some(7));
        assert_eq!(context.task(), Some(42));
        assert_eq!(
            context.snapshot(),
            ContextSnapshot {
                project: Some(7),
                task: Some(42),
            }
        );
    }

    #[test]
    fn test_set_overwrites() {
        let mut context = Context::new();
        context.set_project(1);
        context.set_project(2);
        assert_eq!(context.project(), Some(2));
    }

    #[rstest]
    #[case::empty(None, None)]
    #[case::project_only(Some(3), None)]
    #[case::task_only(None, Some(9))]
    #[case::both(Some(3), Some(9))]
    fn test_clear_resets_both_slots(#[case] project: Option<u64>, #[case] task: Option<u64>) {
        let mut context = Context::new();
        if let Some(id) = project {
            context.set_project(id);
        }
        if let Some(id) = task {
            context.set_task(id);
        }

        context.clear();

        assert_eq!(context.snapshot(), ContextSnapshot::default());
    }
}
