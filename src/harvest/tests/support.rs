//! Stub processors and helpers shared by the harvest tests

use crate::core::shutdown::ShutdownCoordinator;
use crate::harvest::api::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn clients(count: usize) -> Vec<Client> {
    (0..count)
        .map(|i| Client::new(i, Credential::new(format!("token-{}", i))))
        .collect()
}

pub fn items(ids: &[u64]) -> Vec<WorkItem> {
    ids.iter().copied().map(WorkItem::from).collect()
}

pub fn settings(concurrency_cap: usize, error_threshold: usize) -> HarvestSettings {
    HarvestSettings {
        concurrency_cap,
        error_threshold,
    }
}

/// Fail the test instead of hanging if termination is broken
pub async fn bounded<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(10), future)
        .await
        .expect("harvest did not terminate")
}

/// Processor whose outcome per attempt is scripted
#[derive(Default)]
pub struct ScriptedProcessor {
    /// Remaining forced failures per item
    fail_times: Mutex<HashMap<WorkItem, usize>>,
    /// Remaining forced panics per item
    panic_times: Mutex<HashMap<WorkItem, usize>>,
    /// Clients whose every attempt fails
    broken_clients: Vec<usize>,
    always_fail: bool,
    delay: Duration,
    written: Mutex<Vec<WorkItem>>,
    attempts: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always_failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    pub fn fail_item(self, item: u64, times: usize) -> Self {
        self.fail_times
            .lock()
            .unwrap()
            .insert(WorkItem::from(item), times);
        self
    }

    pub fn panic_item(self, item: u64, times: usize) -> Self {
        self.panic_times
            .lock()
            .unwrap()
            .insert(WorkItem::from(item), times);
        self
    }

    pub fn broken_clients(mut self, indices: &[usize]) -> Self {
        self.broken_clients = indices.to_vec();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn written(&self) -> Vec<WorkItem> {
        self.written.lock().unwrap().clone()
    }

    pub fn written_sorted(&self) -> Vec<WorkItem> {
        let mut written = self.written();
        written.sort();
        written
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn take_scripted(map: &Mutex<HashMap<WorkItem, usize>>, item: &WorkItem) -> bool {
        let mut map = map.lock().unwrap();
        match map.get_mut(item) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }
}

struct ActiveGuard<'a>(&'a AtomicUsize);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ItemProcessor for ScriptedProcessor {
    async fn process(&self, client: &Client, item: &WorkItem) -> Result<(), FetchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        let _active = ActiveGuard(&self.active);
        self.peak.fetch_max(now_active, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if Self::take_scripted(&self.panic_times, item) {
            panic!("scripted panic on {}", item);
        }
        if self.always_fail
            || self.broken_clients.contains(&client.index())
            || Self::take_scripted(&self.fail_times, item)
        {
            return Err(FetchError::Api {
                method: "users.get".to_string(),
                code: 5,
                message: format!("scripted failure for client {}", client),
            });
        }

        self.written.lock().unwrap().push(item.clone());
        Ok(())
    }
}

/// Processor that parks every attempt until the test opens the gate
pub struct GatedProcessor {
    pub entered: AtomicUsize,
    gate: tokio::sync::Semaphore,
    pub written: AtomicUsize,
}

impl GatedProcessor {
    pub fn new() -> Self {
        Self {
            entered: AtomicUsize::new(0),
            gate: tokio::sync::Semaphore::new(0),
            written: AtomicUsize::new(0),
        }
    }

    pub fn open(&self, permits: usize) {
        self.gate.add_permits(permits);
    }

    pub async fn wait_for_entered(&self, count: usize) {
        bounded(async {
            while self.entered.load(Ordering::SeqCst) < count {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
    }
}

#[async_trait]
impl ItemProcessor for GatedProcessor {
    async fn process(&self, _client: &Client, _item: &WorkItem) -> Result<(), FetchError> {
        self.entered.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| FetchError::transport("gate", e))?;
        permit.forget();
        self.written.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn shutdown() -> ShutdownCoordinator {
    ShutdownCoordinator::new()
}

pub fn coordinator(settings: HarvestSettings) -> Coordinator {
    Coordinator::new(settings).unwrap()
}

pub fn arc<P>(processor: P) -> Arc<P> {
    Arc::new(processor)
}
