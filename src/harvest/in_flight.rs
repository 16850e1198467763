//! In-flight accounting
//!
//! [`InFlightCounter`] counts items that some worker has taken from the queue
//! but not yet disposed of. [`Lease`] ties one such item to the counter: the
//! count goes up when the lease is taken and down exactly once when it is
//! completed or returned to the queue. A lease dropped without either (a
//! cancelled or panicking worker) puts its item back.

use crate::harvest::queue::{Dequeue, WorkQueue};
use crate::harvest::types::WorkItem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

/// Number of items currently held by workers
#[derive(Debug, Default)]
pub struct InFlightCounter {
    count: AtomicUsize,
    settled: Notify,
}

impl InFlightCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement; wakes waiters when the count reaches zero
    ///
    /// Never goes below zero. An unmatched decrement is logged and ignored.
    pub fn decrement(&self) {
        match self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        {
            Ok(1) => self.settled.notify_waiters(),
            Ok(_) => {}
            Err(_) => log::error!("In-flight counter decremented below zero; ignoring"),
        }
    }

    pub fn read(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Future that completes the next time the count drops to zero
    pub fn settled(&self) -> Notified<'_> {
        self.settled.notified()
    }
}

/// Exclusive hold on one dequeued item
#[derive(Debug)]
pub struct Lease {
    item: WorkItem,
    queue: Arc<WorkQueue>,
    counter: Arc<InFlightCounter>,
    settled: bool,
}

impl Lease {
    /// Take the front item and count it as in flight, atomically
    ///
    /// Both steps happen under the queue lock, and the drained check reads the
    /// counter under the same lock. A worker therefore never sees an empty
    /// queue with a zero count while a peer holds an item.
    pub fn take(queue: &Arc<WorkQueue>, counter: &Arc<InFlightCounter>) -> Dequeue {
        let mut items = queue.lock_items();
        match items.pop_front() {
            Some(item) => {
                counter.increment();
                Dequeue::Leased(Lease {
                    item,
                    queue: Arc::clone(queue),
                    counter: Arc::clone(counter),
                    settled: false,
                })
            }
            None if counter.read() == 0 => Dequeue::Drained,
            None => Dequeue::Pending,
        }
    }

    pub fn item(&self) -> &WorkItem {
        &self.item
    }

    /// The item reached its final disposition
    pub fn complete(mut self) {
        self.settled = true;
        self.counter.decrement();
    }

    /// Put the item back on the queue, then release the in-flight slot
    ///
    /// Pushing first keeps "queue empty and count zero" false until the item
    /// is visible to other workers again.
    pub fn requeue(mut self) {
        self.settled = true;
        self.queue.push(self.item.clone());
        self.counter.decrement();
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if !self.settled {
            log::debug!("Returning abandoned lease on user {} to the queue", self.item);
            self.queue.push(self.item.clone());
            self.counter.decrement();
        }
    }
}
