use serde::{Deserialize, Serialize};

use super::{ChannelId, GuildId, UserId};

/// Unique identifier for a Discord message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(#[serde(with = "crate::domain::serde_utils::string_to_u64")] pub u64);

impl MessageId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MessageId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.parse().unwrap_or(0))
    }
}

/// Author of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct MessageAuthor {
    pub id: UserId,
    pub username: String,
    pub bot: bool,
}

/// A message received from the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    id: MessageId,
    channel_id: ChannelId,
    guild_id: Option<GuildId>,
    author: MessageAuthor,
    content: String,
}

#[allow(missing_docs)]
impl InboundMessage {
    #[must_use]
    pub fn new(
        id: MessageId,
        channel_id: ChannelId,
        guild_id: Option<GuildId>,
        author: MessageAuthor,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            channel_id,
            guild_id,
            author,
            content: content.into(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    #[must_use]
    pub const fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    #[must_use]
    pub const fn guild_id(&self) -> Option<GuildId> {
        self.guild_id
    }

    #[must_use]
    pub const fn author(&self) -> &MessageAuthor {
        &self.author
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns true if the message was written by a bot account.
    #[must_use]
    pub const fn is_from_bot(&self) -> bool {
        self.author.bot
    }
}
