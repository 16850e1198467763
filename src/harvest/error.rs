//! Harvest Error Types

use crate::sink::error::SinkError;
use std::any::Any;

/// Why a single fetch-and-record attempt failed
///
/// All variants take the same path in the worker: count the failure and put
/// the item back. The variants exist for diagnostics only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("{method}: transport error: {message}")]
    Transport { method: String, message: String },

    #[error("{method}: API error {code}: {message}")]
    Api {
        method: String,
        code: i64,
        message: String,
    },

    #[error("{method}: malformed response: {message}")]
    Decode { method: String, message: String },

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("processing panicked: {message}")]
    Panicked { message: String },
}

impl FetchError {
    pub fn transport(method: &str, message: impl ToString) -> Self {
        Self::Transport {
            method: method.to_string(),
            message: message.to_string(),
        }
    }

    pub fn decode(method: &str, message: impl ToString) -> Self {
        Self::Decode {
            method: method.to_string(),
            message: message.to_string(),
        }
    }

    /// Build from a caught panic payload
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked { message }
    }

    /// Short label used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::Api { .. } => "api",
            FetchError::Decode { .. } => "decode",
            FetchError::Sink(_) => "sink",
            FetchError::Panicked { .. } => "panic",
        }
    }
}

/// Errors that stop a harvest from starting or a worker from continuing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarvestError {
    #[error("Invalid harvest configuration: {message}")]
    Configuration { message: String },

    #[error("Concurrency limiter was closed")]
    LimiterClosed,
}

impl crate::core::error_handling::ContextualError for HarvestError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, HarvestError::Configuration { .. })
    }

    fn user_message(&self) -> Option<String> {
        match self {
            HarvestError::Configuration { message } => Some(message.clone()),
            HarvestError::LimiterClosed => None,
        }
    }
}

/// Result type for harvest operations
pub type HarvestResult<T> = Result<T, HarvestError>;
