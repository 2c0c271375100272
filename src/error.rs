//! Error types shared by the conversion helpers and the timer primitives.

use std::time::Duration;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TimeError>;

/// Everything that can go wrong in a conversion, a timed call or a loop.
#[derive(Debug, thiserror::Error)]
pub enum TimeError {
    #[error("Invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("Operation timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("Operation failed: {0}")]
    Operation(#[from] anyhow::Error),

    #[error("Background task failed: {0}")]
    Join(String),
}

impl TimeError {
    pub(crate) fn invalid(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidInput {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// True when the error is a deadline expiry rather than a failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<tokio::task::JoinError> for TimeError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string())
    }
}
