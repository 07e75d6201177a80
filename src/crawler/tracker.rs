//! Completion tracking for a tree of crawl tasks
//!
//! A [`TaskGroup`] counts outstanding tasks. Registration happens in the
//! spawning task, before the child starts running, and hands back a
//! [`TaskGuard`] that the child owns. Dropping the guard is the child's one
//! completion signal, so every exit path (including a panic) decrements
//! exactly once. [`TaskGroup::wait`] resolves once the count is back to zero.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    outstanding: AtomicUsize,
    spawned: AtomicUsize,
    idle: Notify,
}

/// Shared counter of spawned-but-unfinished tasks
#[derive(Debug, Clone, Default)]
pub struct TaskGroup {
    inner: Arc<Inner>,
}

/// Membership of one task in a [`TaskGroup`]
///
/// Not cloneable: one registration, one decrement.
#[derive(Debug)]
#[must_use = "dropping the guard immediately marks the task finished"]
pub struct TaskGuard {
    inner: Arc<Inner>,
}

impl TaskGroup {
    /// Creates an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one task and returns its guard
    ///
    /// Must be called before the task is handed to the runtime.
    pub fn register(&self) -> TaskGuard {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        self.inner.spawned.fetch_add(1, Ordering::Relaxed);
        TaskGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of tasks registered and not yet finished
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Total number of registrations over the group's lifetime
    pub fn spawned(&self) -> usize {
        self.inner.spawned.load(Ordering::Relaxed)
    }

    /// Waits until every registered task has finished
    ///
    /// Returns immediately for a group with nothing outstanding.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Subscribe before reading the counter so a wakeup between the
            // load and the await is not lost
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        let previous = self.inner.outstanding.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "task group counter underflow");
        if previous == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
