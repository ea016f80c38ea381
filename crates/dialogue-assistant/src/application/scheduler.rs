//! DeferredQueue: work that must wait for the host to finish its own update.
//!
//! Host callbacks fire in the middle of the host's UI update.  Anything that
//! reads freshly built widgets (a dialogue box that has just loaded) or rewrites
//! widgets the host is still iterating over has to run afterwards, when the host
//! calls [`crate::application::dispatch::DialogueAssistant::run_deferred`].
//!
//! # Flush semantics
//!
//! A flush runs exactly the tasks that were queued before it started, in FIFO
//! order.  A task that queues follow-up work (a decorate pass that found no
//! options yet) lands in the *next* flush, so one flush always terminates.

use std::collections::VecDeque;

/// A FIFO of tasks run once per host tick.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    tasks: VecDeque<T>,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Queues `task` behind everything already waiting.
    pub fn defer(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    /// Takes the tasks due in this flush, leaving the queue empty for
    /// anything they defer in turn.
    pub fn take_due(&mut self) -> Vec<T> {
        self.tasks.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Keeps only the pending tasks for which `keep` returns `true`, in order.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.tasks.retain(keep);
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
