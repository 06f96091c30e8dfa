//! Chat transport error types.

use thiserror::Error;

/// Chat transport error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ChatError {
    #[error("network error talking to Discord: {message}")]
    Network { message: String },

    #[error("missing permission: {message}")]
    Forbidden { message: String },

    #[error("unknown resource: {message}")]
    NotFound { message: String },

    #[error("rate limited by Discord, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("payload too large ({size} bytes)")]
    PayloadTooLarge { size: usize },

    #[error("unexpected Discord error: {message}")]
    Unexpected { message: String },
}

impl ChatError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RateLimited { .. })
    }
}
