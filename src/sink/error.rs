//! Sink Error Types

use std::path::Path;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SinkError {
    #[error("cannot write to {path}: {message}")]
    Io { path: String, message: String },

    #[error("sink unavailable: {message}")]
    Poisoned { message: String },
}

impl SinkError {
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl crate::core::error_handling::ContextualError for SinkError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, SinkError::Io { .. })
    }

    fn user_message(&self) -> Option<String> {
        match self {
            SinkError::Io { .. } => Some(self.to_string()),
            SinkError::Poisoned { .. } => None,
        }
    }
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;
