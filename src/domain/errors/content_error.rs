//! Content API error types.

use thiserror::Error;

/// Category of a failed submission fetch, as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentErrorKind {
    /// The post or community does not exist.
    NotFound,
    /// The community is private.
    Private,
    /// The community is banned.
    Banned,
    /// Anything else, including timeouts.
    Unknown,
}

impl ContentErrorKind {
    /// Short title of the notice sent to the channel.
    #[must_use]
    pub const fn notice_title(self) -> &'static str {
        match self {
            Self::NotFound => "Post not found",
            Self::Private => "Private subreddit",
            Self::Banned => "Banned subreddit",
            Self::Unknown => "Could not get the post",
        }
    }

    /// Body of the notice sent to the channel.
    #[must_use]
    pub const fn notice_body(self) -> &'static str {
        match self {
            Self::NotFound => "The post could not be found. It may have been deleted.",
            Self::Private => "The subreddit this post belongs to is private.",
            Self::Banned => "The subreddit this post belongs to has been banned.",
            Self::Unknown => "Something went wrong while asking Reddit for the post. Try again later.",
        }
    }
}

/// Content API error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ContentError {
    #[error("content not found: {resource}")]
    NotFound { resource: String },

    #[error("content is private: {resource}")]
    Private { resource: String },

    #[error("community is banned: {resource}")]
    Banned { resource: String },

    #[error("network error while fetching content: {message}")]
    Network { message: String },

    #[error("unexpected content API response: {message}")]
    Unexpected { message: String },
}

impl ContentError {
    /// Creates not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates private error.
    #[must_use]
    pub fn private(resource: impl Into<String>) -> Self {
        Self::Private {
            resource: resource.into(),
        }
    }

    /// Creates banned error.
    #[must_use]
    pub fn banned(resource: impl Into<String>) -> Self {
        Self::Banned {
            resource: resource.into(),
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
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

    /// Returns the user-facing category.
    #[must_use]
    pub const fn kind(&self) -> ContentErrorKind {
        match self {
            Self::NotFound { .. } => ContentErrorKind::NotFound,
            Self::Private { .. } => ContentErrorKind::Private,
            Self::Banned { .. } => ContentErrorKind::Banned,
            Self::Network { .. } | Self::Unexpected { .. } => ContentErrorKind::Unknown,
        }
    }

    /// Returns whether error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ContentError::not_found("abc").kind(), ContentErrorKind::NotFound);
        assert_eq!(ContentError::private("r/x").kind(), ContentErrorKind::Private);
        assert_eq!(ContentError::banned("r/x").kind(), ContentErrorKind::Banned);
        assert_eq!(ContentError::network("reset").kind(), ContentErrorKind::Unknown);
        assert_eq!(ContentError::unexpected("bad json").kind(), ContentErrorKind::Unknown);
    }

    #[test]
    fn test_only_network_is_recoverable() {
        assert!(ContentError::network("timeout").is_recoverable());
        assert!(!ContentError::not_found("abc").is_recoverable());
    }
}
