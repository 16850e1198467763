//! VK HTTP API transport

use crate::core::version::vk_api_version;
use crate::harvest::error::FetchError;
use crate::harvest::types::Credential;
use crate::remote::traits::{Params, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.vk.com/method";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VkSettings {
    pub api_url: String,
    pub api_version: String,
    /// `None` disables the per-request deadline
    pub request_timeout: Option<Duration>,
}

impl Default for VkSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_version: vk_api_version().to_string(),
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        }
    }
}

/// `GET {api_url}/{method}?{params}&access_token=..&v=..`
#[derive(Debug, Clone)]
pub struct VkTransport {
    http: reqwest::Client,
    api_url: String,
    api_version: String,
}

impl VkTransport {
    pub fn new(settings: &VkSettings) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("vkfetch/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            api_version: settings.api_version.clone(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.api_url, method)
    }
}

#[async_trait]
impl Transport for VkTransport {
    async fn call(
        &self,
        credential: &Credential,
        method: &str,
        params: Params,
    ) -> Result<Value, FetchError> {
        log::trace!("Calling {} with {:?}", method, params);
        let response = self
            .http
            .get(self.endpoint(method))
            .query(&params)
            .query(&[
                ("access_token", credential.expose()),
                ("v", self.api_version.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::transport(method, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(method, e))?;
        if !status.is_success() {
            return Err(FetchError::transport(method, format!("HTTP {}", status)));
        }

        parse_envelope(method, &body)
    }
}

/// Unwrap a VK response body: `{"response": ..}` or `{"error": {..}}`
pub fn parse_envelope(method: &str, body: &str) -> Result<Value, FetchError> {
    let mut envelope: Value =
        serde_json::from_str(body).map_err(|e| FetchError::decode(method, e))?;

    if let Some(error) = envelope.get("error") {
        return Err(FetchError::Api {
            method: method.to_string(),
            code: error.get("error_code").and_then(Value::as_i64).unwrap_or(-1),
            message: error
                .get("error_msg")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    envelope
        .get_mut("response")
        .map(Value::take)
        .ok_or_else(|| FetchError::decode(method, "missing 'response' field"))
}
