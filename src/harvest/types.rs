//! Data types shared by the harvest components

use crate::harvest::error::{HarvestError, HarvestResult};
use std::fmt;

/// Default bound on simultaneous requests across all clients
pub const DEFAULT_CONCURRENCY_CAP: usize = 10;

/// Default number of failed attempts after which a client stops
pub const DEFAULT_ERROR_THRESHOLD: usize = 10;

/// One unit of work: a user id (numeric or screen name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkItem(String);

impl WorkItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkItem {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WorkItem {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for WorkItem {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// An API access token
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the transport only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} chars>)", self.0.chars().count())
    }
}

/// A credential plus its ordinal, used in diagnostics as `#index`
#[derive(Debug, Clone)]
pub struct Client {
    index: usize,
    credential: Credential,
}

impl Client {
    pub fn new(index: usize, credential: Credential) -> Self {
        Self { index, credential }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Worker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    /// Queue drained and nothing in flight
    Done,
    /// Error threshold reached; the client is presumed broken
    StoppedExhausted,
    /// Shutdown was requested
    Cancelled,
    /// The worker task itself panicked outside of item processing
    Aborted,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Running => "running",
            WorkerState::Done => "done",
            WorkerState::StoppedExhausted => "stopped (error threshold)",
            WorkerState::Cancelled => "cancelled",
            WorkerState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Final tally for one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub client_index: usize,
    pub state: WorkerState,
    pub succeeded: usize,
    pub failed: usize,
}

/// Tunables for one harvest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSettings {
    pub concurrency_cap: usize,
    pub error_threshold: usize,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            concurrency_cap: DEFAULT_CONCURRENCY_CAP,
            error_threshold: DEFAULT_ERROR_THRESHOLD,
        }
    }
}

impl HarvestSettings {
    pub fn validate(&self) -> HarvestResult<()> {
        if self.concurrency_cap == 0 {
            return Err(HarvestError::Configuration {
                message: "concurrency cap must be greater than 0".to_string(),
            });
        }
        if self.error_threshold == 0 {
            return Err(HarvestError::Configuration {
                message: "error threshold must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// What happened to the input once every worker has exited
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub total_items: usize,
    /// Items left in the queue: every client hit its threshold, or shutdown
    pub remaining: Vec<WorkItem>,
    pub workers: Vec<WorkerReport>,
}

impl HarvestSummary {
    /// Items written to the sink
    pub fn written(&self) -> usize {
        self.workers.iter().map(|w| w.succeeded).sum()
    }

    /// Items that were put back in the queue after a failed attempt
    pub fn requeued(&self) -> usize {
        self.workers.iter().map(|w| w.failed).sum()
    }

    pub fn abandoned(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn workers_in(&self, state: WorkerState) -> usize {
        self.workers.iter().filter(|w| w.state == state).count()
    }

    /// Items missing from both the written and abandoned counts
    ///
    /// Non-zero only when a worker task aborted: its tally died with it.
    pub fn unaccounted(&self) -> usize {
        self.total_items
            .saturating_sub(self.written())
            .saturating_sub(self.abandoned())
    }
}
