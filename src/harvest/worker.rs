//! Per-client worker loop

use crate::core::shutdown::ShutdownListener;
use crate::harvest::coordinator::HarvestContext;
use crate::harvest::error::FetchError;
use crate::harvest::in_flight::Lease;
use crate::harvest::queue::Dequeue;
use crate::harvest::traits::ItemProcessor;
use crate::harvest::types::{Client, WorkerReport, WorkerState};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Drains the shared queue with one client until the work is done, the
/// client's error threshold is reached, or shutdown is requested
pub struct Worker<P: ItemProcessor + ?Sized> {
    client: Client,
    context: HarvestContext,
    processor: Arc<P>,
    error_threshold: usize,
    shutdown: ShutdownListener,
    state: WorkerState,
    succeeded: usize,
    failures: usize,
}

impl<P: ItemProcessor + ?Sized> Worker<P> {
    pub fn new(
        client: Client,
        context: HarvestContext,
        processor: Arc<P>,
        error_threshold: usize,
        shutdown: ShutdownListener,
    ) -> Self {
        Self {
            client,
            context,
            processor,
            error_threshold,
            shutdown,
            state: WorkerState::Running,
            succeeded: 0,
            failures: 0,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn run(mut self) -> WorkerReport {
        log::debug!("Client {} starting", self.client);

        while self.state == WorkerState::Running {
            self.state = self.step().await;
        }

        match self.state {
            WorkerState::StoppedExhausted => log::warn!(
                "Client {} has reached the error threshold ({} failures); stopping",
                self.client,
                self.failures
            ),
            WorkerState::Cancelled => log::info!(
                "Client {} cancelled after {} users",
                self.client,
                self.succeeded
            ),
            _ => log::debug!(
                "Client {} finished: {} written, {} failed attempts",
                self.client,
                self.succeeded,
                self.failures
            ),
        }

        WorkerReport {
            client_index: self.client.index(),
            state: self.state,
            succeeded: self.succeeded,
            failed: self.failures,
        }
    }

    async fn step(&mut self) -> WorkerState {
        if self.shutdown.is_requested() {
            return WorkerState::Cancelled;
        }

        let queue = Arc::clone(&self.context.queue);
        let in_flight = Arc::clone(&self.context.in_flight);

        // Register for wake-ups before looking, so a push or the last
        // in-flight item settling between the look and the wait is not missed.
        let queue_changed = queue.changed();
        let settled = in_flight.settled();
        tokio::pin!(queue_changed, settled);
        queue_changed.as_mut().enable();
        settled.as_mut().enable();

        match Lease::take(&queue, &in_flight) {
            Dequeue::Drained => WorkerState::Done,
            Dequeue::Pending => {
                log::trace!(
                    "Client {} waiting: queue empty, {} in flight",
                    self.client,
                    in_flight.read()
                );
                tokio::select! {
                    _ = queue_changed => WorkerState::Running,
                    _ = settled => WorkerState::Running,
                    _ = self.shutdown.wait() => WorkerState::Cancelled,
                }
            }
            Dequeue::Leased(lease) => self.attempt(lease).await,
        }
    }

    async fn attempt(&mut self, lease: Lease) -> WorkerState {
        let item = lease.item().clone();

        let permit = tokio::select! {
            permit = self.context.limiter.acquire() => match permit {
                Ok(permit) => permit,
                Err(e) => {
                    log::error!("Client {} cannot proceed: {}", self.client, e);
                    return WorkerState::Cancelled;
                }
            },
            _ = self.shutdown.wait() => return WorkerState::Cancelled,
        };

        let processing =
            AssertUnwindSafe(self.processor.process(&self.client, &item)).catch_unwind();
        let outcome = tokio::select! {
            outcome = processing => {
                outcome.unwrap_or_else(|panic| Err(FetchError::from_panic(panic)))
            }
            _ = self.shutdown.wait() => return WorkerState::Cancelled,
        };

        match outcome {
            Ok(()) => {
                permit.release();
                lease.complete();
                self.succeeded += 1;
                log::debug!("Client {} wrote user {}", self.client, item);
                WorkerState::Running
            }
            Err(error) => {
                self.failures += 1;
                log::warn!(
                    "Client {} failed on user {} ({} error, {}/{}): {}",
                    self.client,
                    item,
                    error.kind(),
                    self.failures,
                    self.error_threshold,
                    error
                );
                permit.release();
                lease.requeue();
                if self.failures >= self.error_threshold {
                    WorkerState::StoppedExhausted
                } else {
                    WorkerState::Running
                }
            }
        }
    }
}
