use serde::Deserialize;
use serde_json::Value;

use crate::domain::entities::{CommentNode, Submission};

/// Generic Reddit listing envelope.
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
}

/// A typed entry of a listing (`t1` comment, `t3` link, `more` stub, ...).
#[derive(Debug, Deserialize)]
pub struct Thing {
    pub kind: String,
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct CommentData {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub score_hidden: bool,
    /// A nested listing, or `""` when there are no replies.
    #[serde(default)]
    pub replies: Value,
}

/// `/about` wrapper for users and subreddits.
#[derive(Debug, Deserialize)]
pub struct About<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct UserAbout {
    pub name: String,
    #[serde(default, with = "crate::domain::serde_utils::empty_string_as_none")]
    pub icon_img: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubredditAbout {
    #[serde(alias = "display_name")]
    pub name: String,
    #[serde(default, with = "crate::domain::serde_utils::empty_string_as_none")]
    pub icon_img: Option<String>,
    #[serde(default, with = "crate::domain::serde_utils::empty_string_as_none")]
    pub primary_color: Option<String>,
    #[serde(default, with = "crate::domain::serde_utils::empty_string_as_none")]
    pub key_color: Option<String>,
}

/// Body Reddit sends with 403/404 answers.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub reason: Option<String>,
}

impl Listing {
    /// First `t3` entry, decoded as a submission.
    pub fn first_submission(&self) -> Option<Result<Submission, serde_json::Error>> {
        self.data
            .children
            .iter()
            .find(|thing| thing.kind == "t3")
            .map(|thing| Submission::deserialize(&thing.data))
    }

    /// The `t1` entries as a comment forest; `more` stubs are skipped.
    pub fn comment_forest(&self) -> Vec<CommentNode> {
        self.data
            .children
            .iter()
            .filter(|thing| thing.kind == "t1")
            .filter_map(|thing| CommentData::deserialize(&thing.data).ok())
            .map(CommentData::into_node)
            .collect()
    }
}

impl CommentData {
    fn into_node(self) -> CommentNode {
        let replies = if self.replies.is_object() {
            Listing::deserialize(&self.replies)
                .map(|listing| listing.comment_forest())
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        CommentNode {
            author: self.author,
            body: self.body,
            score: self.score,
            score_hidden: self.score_hidden,
            replies,
        }
    }
}
