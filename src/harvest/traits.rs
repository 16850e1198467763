//! The seam between a worker and the external fetch-and-record operation

use crate::harvest::error::FetchError;
use crate::harvest::types::{Client, WorkItem};
use async_trait::async_trait;

/// Performs all external work for one item using one client
///
/// Any failure, whatever its cause, is returned as a [`FetchError`]; the
/// worker requeues the item and counts the failure against `client`.
#[async_trait]
pub trait ItemProcessor: Send + Sync {
    async fn process(&self, client: &Client, item: &WorkItem) -> Result<(), FetchError>;
}
