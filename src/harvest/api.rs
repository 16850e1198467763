//! Harvest API
//!
//! Public surface of the concurrency core, mirroring the other `api` modules.

pub use crate::harvest::coordinator::{Coordinator, HarvestContext};
pub use crate::harvest::error::{FetchError, HarvestError, HarvestResult};
pub use crate::harvest::traits::ItemProcessor;
pub use crate::harvest::types::{
    Client, Credential, HarvestSettings, HarvestSummary, WorkItem, WorkerReport, WorkerState,
    DEFAULT_CONCURRENCY_CAP, DEFAULT_ERROR_THRESHOLD,
};
