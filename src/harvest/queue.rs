//! Shared queue of pending work items

use crate::core::sync::lock_or_recover;
use crate::harvest::in_flight::Lease;
use crate::harvest::types::WorkItem;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

/// Result of trying to take work from the queue
#[derive(Debug)]
pub enum Dequeue {
    /// An item, already counted as in flight
    Leased(Lease),
    /// Queue empty but some worker still holds an item that may come back
    Pending,
    /// Queue empty and nothing in flight: all work has a final disposition
    Drained,
}

/// Unbounded FIFO of work items shared by all workers
///
/// Duplicates are allowed. Pushing never blocks and wakes every worker
/// currently waiting in [`WorkQueue::changed`].
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: Mutex<VecDeque<WorkItem>>,
    changed: Notify,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue holding `items` in order, without deduplication
    pub fn from_items(items: impl IntoIterator<Item = WorkItem>) -> Self {
        Self {
            items: Mutex::new(items.into_iter().collect()),
            changed: Notify::new(),
        }
    }

    /// Append an item to the back of the queue
    pub fn push(&self, item: WorkItem) {
        lock_or_recover(&self.items).push_back(item);
        self.changed.notify_waiters();
    }

    /// Take the front item, if any, without in-flight accounting
    pub fn try_pop(&self) -> Option<WorkItem> {
        lock_or_recover(&self.items).pop_front()
    }

    pub fn is_empty(&self) -> bool {
        lock_or_recover(&self.items).is_empty()
    }

    pub fn len(&self) -> usize {
        lock_or_recover(&self.items).len()
    }

    /// Copy of the current contents, front first
    pub fn snapshot(&self) -> Vec<WorkItem> {
        lock_or_recover(&self.items).iter().cloned().collect()
    }

    /// Future that completes on the next push
    ///
    /// Call `enable()` on the pinned future before checking the queue, or a
    /// push between the check and the wait is missed.
    pub fn changed(&self) -> Notified<'_> {
        self.changed.notified()
    }

    pub(crate) fn lock_items(&self) -> MutexGuard<'_, VecDeque<WorkItem>> {
        lock_or_recover(&self.items)
    }
}
