//! Builds the shared state, runs one worker per client, aggregates reports

use crate::core::shutdown::ShutdownCoordinator;
use crate::harvest::error::HarvestResult;
use crate::harvest::in_flight::InFlightCounter;
use crate::harvest::limiter::ConcurrencyLimiter;
use crate::harvest::queue::WorkQueue;
use crate::harvest::traits::ItemProcessor;
use crate::harvest::types::{
    Client, HarvestSettings, HarvestSummary, WorkItem, WorkerReport, WorkerState,
};
use crate::harvest::worker::Worker;
use std::sync::Arc;

/// State shared by every worker of one run
#[derive(Debug, Clone)]
pub struct HarvestContext {
    pub(crate) queue: Arc<WorkQueue>,
    pub(crate) in_flight: Arc<InFlightCounter>,
    pub(crate) limiter: Arc<ConcurrencyLimiter>,
}

impl HarvestContext {
    /// Queue seeded with `items`, zero in flight, limiter sized for `workers`
    pub fn new(items: Vec<WorkItem>, workers: usize, concurrency_cap: usize) -> Self {
        Self {
            queue: Arc::new(WorkQueue::from_items(items)),
            in_flight: Arc::new(InFlightCounter::new()),
            limiter: Arc::new(ConcurrencyLimiter::new(workers, concurrency_cap)),
        }
    }

    pub fn queue(&self) -> &Arc<WorkQueue> {
        &self.queue
    }

    pub fn in_flight(&self) -> &Arc<InFlightCounter> {
        &self.in_flight
    }

    pub fn limiter(&self) -> &Arc<ConcurrencyLimiter> {
        &self.limiter
    }
}

/// Runs a harvest to completion
///
/// Holds no retry logic of its own; it only wires workers together and
/// collects what they report.
#[derive(Debug, Clone)]
pub struct Coordinator {
    settings: HarvestSettings,
}

impl Coordinator {
    pub fn new(settings: HarvestSettings) -> HarvestResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    /// Process `items` with one worker per client and wait for all of them
    pub async fn run<P>(
        &self,
        items: Vec<WorkItem>,
        clients: Vec<Client>,
        processor: Arc<P>,
        shutdown: &ShutdownCoordinator,
    ) -> HarvestSummary
    where
        P: ItemProcessor + 'static,
    {
        let context = HarvestContext::new(items, clients.len(), self.settings.concurrency_cap);
        self.run_in(context, clients, processor, shutdown).await
    }

    /// Like [`Coordinator::run`] but over a caller-built context
    pub async fn run_in<P>(
        &self,
        context: HarvestContext,
        clients: Vec<Client>,
        processor: Arc<P>,
        shutdown: &ShutdownCoordinator,
    ) -> HarvestSummary
    where
        P: ItemProcessor + 'static,
    {
        let total_items = context.queue.len() + context.in_flight.read();
        log::info!(
            "Processing {} users with {} clients (concurrency {}, error threshold {})",
            total_items,
            clients.len(),
            context.limiter.capacity(),
            self.settings.error_threshold
        );
        if clients.is_empty() {
            log::warn!("No clients available; nothing will be processed");
        }

        let mut indices = Vec::with_capacity(clients.len());
        let mut handles = Vec::with_capacity(clients.len());
        for client in clients {
            indices.push(client.index());
            let worker = Worker::new(
                client,
                context.clone(),
                Arc::clone(&processor),
                self.settings.error_threshold,
                shutdown.subscribe(),
            );
            handles.push(tokio::spawn(worker.run()));
        }

        let joined = futures::future::join_all(handles).await;
        let workers: Vec<WorkerReport> = indices
            .into_iter()
            .zip(joined)
            .map(|(client_index, result)| match result {
                Ok(report) => report,
                Err(e) => {
                    log::error!("Worker for client #{} aborted: {}", client_index, e);
                    WorkerReport {
                        client_index,
                        state: WorkerState::Aborted,
                        succeeded: 0,
                        failed: 0,
                    }
                }
            })
            .collect();

        let summary = HarvestSummary {
            total_items,
            remaining: context.queue.snapshot(),
            workers,
        };
        log_summary(&summary);
        summary
    }
}

fn log_summary(summary: &HarvestSummary) {
    log::info!(
        "Harvest finished: {}/{} users written, {} requeued attempts, {} clients done, {} exhausted",
        summary.written(),
        summary.total_items,
        summary.requeued(),
        summary.workers_in(WorkerState::Done),
        summary.workers_in(WorkerState::StoppedExhausted)
    );
    let aborted = summary.workers_in(WorkerState::Aborted);
    if aborted > 0 {
        log::warn!(
            "{} clients aborted; {} users they wrote are missing from the totals",
            aborted,
            summary.unaccounted()
        );
    }
    if !summary.is_complete() {
        let cancelled = summary.workers_in(WorkerState::Cancelled) > 0;
        log::warn!(
            "{} users left unprocessed ({})",
            summary.abandoned(),
            if cancelled {
                "shutdown requested"
            } else {
                "every client reached its error threshold"
            }
        );
        log::debug!("Unprocessed users: {:?}", summary.remaining);
    }
}
