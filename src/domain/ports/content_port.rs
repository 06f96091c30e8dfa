//! Content API port definition.

use async_trait::async_trait;

use crate::domain::entities::{CommunityInfo, RedditUser, SubmissionId, SubmissionThread};
use crate::domain::errors::ContentError;

/// Port for reading posts and their metadata from Reddit.
#[async_trait]
pub trait ContentPort: Send + Sync {
    /// Fetches a submission and its comment tree down to `depth` levels.
    async fn fetch_submission(
        &self,
        id: &SubmissionId,
        depth: u8,
    ) -> Result<SubmissionThread, ContentError>;

    /// Fetches an account's public profile.
    async fn fetch_user(&self, name: &str) -> Result<RedditUser, ContentError>;

    /// Fetches a subreddit's presentation metadata.
    async fn fetch_community(&self, name: &str) -> Result<CommunityInfo, ContentError>;
}
