//! Sink trait

use crate::sink::error::SinkResult;
use async_trait::async_trait;

/// Append-only record destination
///
/// `record` is written as-is, including its trailing newline. A failed write
/// is reported to the caller and never retried here.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn write(&self, record: &str) -> SinkResult<()>;
}
