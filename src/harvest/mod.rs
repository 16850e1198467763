//! Harvest: the concurrency core
//!
//! Distributes a fixed list of user ids across a pool of clients. Each client
//! runs one [`Worker`]; all workers share one [`WorkQueue`], one
//! [`InFlightCounter`] and one [`ConcurrencyLimiter`].
//!
//! ```text
//!                 ┌───────────────────────────────┐
//!                 │          Coordinator          │
//!                 └──────┬─────────┬─────────┬────┘
//!                 spawn  │         │         │  join
//!                 ┌──────▼──┐ ┌────▼────┐ ┌──▼──────┐
//!                 │Worker #0│ │Worker #1│ │Worker #2│   one per client
//!                 └──┬───▲──┘ └──┬───▲──┘ └──┬───▲──┘
//!            lease   │   │ requeue on failure│   │
//!                 ┌──▼───┴───────▼───┴───────▼───┴──┐
//!                 │ WorkQueue  +  InFlightCounter   │
//!                 └─────────────────────────────────┘
//!                 ┌─────────────────────────────────┐
//!                 │ ConcurrencyLimiter (min(N, cap))│   held around each fetch
//!                 └─────────────────────────────────┘
//! ```
//!
//! A worker only finishes once the queue is empty *and* nothing is in flight:
//! a peer holding an item may still fail and put it back. Taking an item and
//! counting it as in flight happen under the queue lock, so no worker can
//! observe the gap between the two.

pub mod api;
pub mod coordinator;
pub mod error;
pub mod in_flight;
pub mod limiter;
pub mod queue;
pub mod traits;
pub mod types;
pub mod worker;

pub use coordinator::{Coordinator, HarvestContext};
pub use error::{FetchError, HarvestError, HarvestResult};
pub use in_flight::{InFlightCounter, Lease};
pub use limiter::{ConcurrencyLimiter, LimiterPermit};
pub use queue::{Dequeue, WorkQueue};
pub use traits::ItemProcessor;
pub use types::{
    Client, Credential, HarvestSettings, HarvestSummary, WorkItem, WorkerReport, WorkerState,
};
pub use worker::Worker;

#[cfg(test)]
mod tests;
