//! Detection and parsing of Reddit post links.

use std::sync::LazyLock;

use regex::Regex;

use crate::application::dto::SubmissionTrigger;
use crate::domain::entities::SubmissionId;

static REDDIT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://(?:www\.|old\.)?reddit\.com/").unwrap());

static SUBMISSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://(?:www\.|old\.)?reddit\.com/(?:r/(?P<community>\w+)/)?comments/(?P<id>\w+)",
    )
    .unwrap()
});

/// Finds the post a message links to.
pub struct TriggerParser;

impl TriggerParser {
    /// Returns true if the message starts with a Reddit link of any shape.
    #[must_use]
    pub fn is_reddit_link(content: &str) -> bool {
        REDDIT_LINK_RE.is_match(content.trim_start())
    }

    /// Extracts the post identifier, or `None` if the link names no post.
    #[must_use]
    pub fn parse(content: &str) -> Option<SubmissionTrigger> {
        let caps = SUBMISSION_RE.captures(content.trim_start())?;
        let submission_id = SubmissionId::new(caps.name("id")?.as_str())?;
        Some(SubmissionTrigger {
            community: caps.name("community").map(|m| m.as_str().to_string()),
            submission_id,
        })
    }
}
