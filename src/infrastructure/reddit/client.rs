//! Reddit JSON API client.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::{Captures, Regex};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{About, ErrorBody, Listing, SubredditAbout, UserAbout};
use crate::domain::entities::{
    AccentColor, CommunityInfo, RedditUser, SubmissionId, SubmissionThread,
};
use crate::domain::errors::ContentError;
use crate::domain::ports::ContentPort;

const REDDIT_API_BASE: &str = "https://api.reddit.com";
const USER_AGENT: &str = concat!("ember/", env!("CARGO_PKG_VERSION"), " (Discord bot)");
const DELETED_ACCOUNT: &str = "[deleted]";

/// Reddit escapes these even inside JSON strings.
static HTML_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&(amp|quot|lt|gt);").expect("valid entity regex"));

/// Read-only client for Reddit's public JSON API.
pub struct RedditClient {
    client: Client,
    base_url: String,
}

impl RedditClient {
    /// Creates new client with default base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(timeout: Duration) -> Result<Self, ContentError> {
        Self::with_base_url(timeout, REDDIT_API_BASE)
    }

    /// Creates client with custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ContentError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// GETs `path` and decodes the entity-repaired body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &str,
    ) -> Result<T, ContentError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "Querying Reddit");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, url = %url, "Failed to reach Reddit");
            ContentError::network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ContentError::network(e.to_string()))?;

        if !status.is_success() {
            return Err(map_status(status, &body, resource));
        }

        serde_json::from_str(&decode_entities(&body))
            .map_err(|e| ContentError::unexpected(format!("malformed response for {resource}: {e}")))
    }
}

#[async_trait]
impl ContentPort for RedditClient {
    async fn fetch_submission(
        &self,
        id: &SubmissionId,
        depth: u8,
    ) -> Result<SubmissionThread, ContentError> {
        let path = format!("/comments/{}?depth={depth}&limit={depth}", id.as_str());
        let listings: Vec<Listing> = self.get_json(&path, id.as_str()).await?;
        thread_from_listings(&listings, id.as_str())
    }

    async fn fetch_user(&self, name: &str) -> Result<RedditUser, ContentError> {
        if name.is_empty() || name == DELETED_ACCOUNT {
            return Err(ContentError::not_found(format!("u/{name}")));
        }
        let about: About<UserAbout> = self
            .get_json(&format!("/user/{name}/about"), &format!("u/{name}"))
            .await?;
        Ok(RedditUser {
            name: about.data.name,
            icon_url: about.data.icon_img,
        })
    }

    async fn fetch_community(&self, name: &str) -> Result<CommunityInfo, ContentError> {
        let about: About<SubredditAbout> = self
            .get_json(&format!("/r/{name}/about"), &format!("r/{name}"))
            .await?;
        Ok(community_from_about(about.data))
    }
}

fn thread_from_listings(
    listings: &[Listing],
    resource: &str,
) -> Result<SubmissionThread, ContentError> {
    let [post, rest @ ..] = listings else {
        return Err(ContentError::unexpected(format!("empty listing for {resource}")));
    };
    let submission = post
        .first_submission()
        .ok_or_else(|| ContentError::not_found(resource))?
        .map_err(|e| ContentError::unexpected(format!("malformed submission {resource}: {e}")))?;
    let comments = rest.first().map(Listing::comment_forest).unwrap_or_default();
    Ok(SubmissionThread {
        submission,
        comments,
    })
}

fn community_from_about(about: SubredditAbout) -> CommunityInfo {
    CommunityInfo {
        color: AccentColor::from_hex_pair(
            about.primary_color.as_deref(),
            about.key_color.as_deref(),
        ),
        name: about.name,
        icon_url: about.icon_img,
    }
}

fn decode_entities(raw: &str) -> String {
    HTML_ENTITY
        .replace_all(raw, |caps: &Captures<'_>| {
            match caps[1].to_ascii_lowercase().as_str() {
                "amp" => "&",
                "quot" => "'",
                "lt" => "<",
                _ => ">",
            }
        })
        .into_owned()
}

/// Maps a failed status to the content error the reason field points at.
fn map_status(status: StatusCode, body: &str, resource: &str) -> ContentError {
    let reason = serde_json::from_str::<ErrorBody>(body)
        .unwrap_or_default()
        .reason;
    match status {
        StatusCode::NOT_FOUND => match reason.as_deref() {
            Some("banned") => ContentError::banned(resource),
            Some("private") => ContentError::private(resource),
            _ => ContentError::not_found(resource),
        },
        StatusCode::FORBIDDEN => ContentError::private(resource),
        status if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS => {
            ContentError::network(format!("Reddit answered {status}"))
        }
        status => ContentError::unexpected(format!("Reddit answered {status} for {resource}")),
    }
}
