//! Chat transport port definition.

use async_trait::async_trait;

use crate::domain::entities::{
    BotUser, ChannelId, FileUpload, GuildId, MessageId, Permissions, RichCard, UserId,
};
use crate::domain::errors::ChatError;

/// Port for the outbound actions the bot takes in a chat channel.
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Sends a rich card.
    async fn send_card(&self, channel: ChannelId, card: &RichCard)
    -> Result<MessageId, ChatError>;

    /// Replaces the card of a previously sent message.
    async fn edit_card(
        &self,
        channel: ChannelId,
        message: MessageId,
        card: &RichCard,
    ) -> Result<(), ChatError>;

    /// Sends plain text.
    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<MessageId, ChatError>;

    /// Replies to a message with plain text.
    async fn reply_text(
        &self,
        channel: ChannelId,
        reply_to: MessageId,
        text: &str,
    ) -> Result<MessageId, ChatError>;

    /// Uploads a file, optionally with message text.
    async fn send_file(
        &self,
        channel: ChannelId,
        file: FileUpload,
        content: Option<&str>,
    ) -> Result<MessageId, ChatError>;

    /// Hides the automatic link preview of a message.
    async fn suppress_embeds(&self, channel: ChannelId, message: MessageId)
    -> Result<(), ChatError>;

    /// Permissions the bot holds in a guild channel.
    async fn channel_permissions(
        &self,
        channel: ChannelId,
        guild: GuildId,
    ) -> Result<Permissions, ChatError>;

    /// Permissions another member holds in a guild channel.
    async fn member_permissions(
        &self,
        channel: ChannelId,
        guild: GuildId,
        user: UserId,
    ) -> Result<Permissions, ChatError>;

    /// The bot's own account.
    async fn current_user(&self) -> Result<BotUser, ChatError>;
}
