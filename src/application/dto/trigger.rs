//! Parsed trigger link.

use crate::domain::entities::SubmissionId;

/// A Reddit post link found in an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTrigger {
    /// Subreddit named in the link, if any. Informational only.
    pub community: Option<String>,
    /// Post to render.
    pub submission_id: SubmissionId,
}
