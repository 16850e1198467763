//! Transport trait

use crate::harvest::error::FetchError;
use crate::harvest::types::Credential;
use async_trait::async_trait;
use serde_json::Value;

/// Named request parameters, in order
pub type Params = Vec<(&'static str, String)>;

/// Issues one named API call with one credential
///
/// Returns the unwrapped result payload. Network failures, API-level errors
/// and unparseable bodies all come back as [`FetchError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(
        &self,
        credential: &Credential,
        method: &str,
        params: Params,
    ) -> Result<Value, FetchError>;
}
