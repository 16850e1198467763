//! Admission control for outbound requests

use crate::harvest::error::{HarvestError, HarvestResult};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting permit pool shared by every worker
///
/// Capacity is `min(workers, cap)`, so a cap above the worker count is never
/// reachable and a cap below it serialises some workers.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    pub fn new(workers: usize, cap: usize) -> Self {
        let capacity = workers.min(cap);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a permit
    pub async fn acquire(&self) -> HarvestResult<LimiterPermit> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| HarvestError::LimiterClosed)?;
        Ok(LimiterPermit { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

/// A held permit; dropping it returns the permit to the pool
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: OwnedSemaphorePermit,
}

impl LimiterPermit {
    /// Return the permit now rather than at end of scope
    pub fn release(self) {}
}
