//! Reddit submission entity.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use super::CommentNode;

const REDDIT_WEB_BASE: &str = "https://www.reddit.com";

/// Title fragment that marks a post as not-safe-for-work even when the flag is unset.
const CENSORED_NSFW_MARKER: &str = "nsf";

/// Reddit submission identifier (base36, e.g. `abc123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Creates an identifier, rejecting empty or non-alphanumeric input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        Some(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fetched Reddit post. Field names on the wire come straight from the Reddit API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[allow(missing_docs)]
pub struct Submission {
    pub id: String,
    pub author: String,
    #[serde(default, rename = "selftext")]
    pub body: String,
    #[serde(rename = "created_utc", deserialize_with = "epoch_seconds")]
    pub created: i64,
    pub title: String,
    pub url: String,
    #[serde(rename = "subreddit")]
    pub community: String,
    #[serde(default, rename = "over_18")]
    pub adult: bool,
    #[serde(default)]
    pub spoiler: bool,
    #[serde(default)]
    pub stickied: bool,
    pub permalink: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub is_video: bool,
}

impl Submission {
    /// Canonical web URL of the post itself.
    #[must_use]
    pub fn permalink_url(&self) -> String {
        encode_uri(&format!("{REDDIT_WEB_BASE}{}", self.permalink))
    }

    /// Profile URL of the author.
    #[must_use]
    pub fn author_url(&self) -> String {
        encode_uri(&format!("{REDDIT_WEB_BASE}/u/{}", self.author))
    }

    /// True when the post links out instead of being a self-post.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.permalink_url() != self.url
    }

    /// True when media should be hidden behind a spoiler marker.
    #[must_use]
    pub fn is_spoiler(&self) -> bool {
        self.spoiler || self.adult || self.title.to_lowercase().contains(CENSORED_NSFW_MARKER)
    }

    /// Creation time as a UTC timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.created, 0).single()
    }
}

/// A submission together with the comment forest fetched alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionThread {
    /// The post.
    pub submission: Submission,
    /// Top-level comments in listing order.
    pub comments: Vec<CommentNode>,
}

fn encode_uri(raw: &str) -> String {
    url::Url::parse(raw).map_or_else(|_| raw.to_string(), |u| u.to_string())
}

#[allow(clippy::cast_possible_truncation)]
fn epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value as i64)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Submission;

    /// A self-post in r/test whose url is its own permalink.
    pub fn self_post() -> Submission {
        Submission {
            id: "abc123".into(),
            author: "spez".into(),
            body: "Hello world".into(),
            created: 1_700_000_000,
            title: "A test post".into(),
            url: "https://www.reddit.com/r/test/comments/abc123/a_test_post/".into(),
            community: "test".into(),
            adult: false,
            spoiler: false,
            stickied: false,
            permalink: "/r/test/comments/abc123/a_test_post/".into(),
            score: 42,
            is_video: false,
        }
    }

    /// A link post pointing at `url`.
    pub fn link_post(url: &str) -> Submission {
        Submission {
            url: url.into(),
            body: String::new(),
            ..self_post()
        }
    }
}
