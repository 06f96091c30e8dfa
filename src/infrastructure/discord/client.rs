//! Discord REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::dto::{
    AllowedMentions, AttachmentBody, ChannelResponse, ErrorResponse, FlagsBody, GuildResponse,
    MemberResponse, MessageBody, MessageReferenceBody, MessageResponse, RateLimitResponse,
    UserResponse,
};
use crate::domain::entities::{
    BotToken, BotUser, ChannelId, FileUpload, GuildId, GuildMember, MessageId, Permissions,
    RichCard, UserId,
};
use crate::domain::errors::ChatError;
use crate::domain::ports::ChatPort;
use crate::domain::services::PermissionCalculator;

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const USER_AGENT: &str = concat!(
    "DiscordBot (ember, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);
const SUPPRESS_EMBEDS_FLAG: u64 = 1 << 2;
const MAX_RATE_LIMIT_RETRIES: u32 = 1;
const MAX_RETRY_WAIT: Duration = Duration::from_secs(10);

/// Discord REST API client acting as the bot.
pub struct DiscordClient {
    client: Client,
    base_url: String,
    token: BotToken,
    bot_user: OnceCell<BotUser>,
}

impl DiscordClient {
    /// Creates new client with default base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(token: BotToken, timeout: Duration) -> Result<Self, ChatError> {
        Self::with_base_url(token, timeout, DISCORD_API_BASE)
    }

    /// Creates client with custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        token: BotToken,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self, ChatError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
            bot_user: OnceCell::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends the request built by `build`, retrying once after a short 429.
    async fn execute<F>(&self, build: F) -> Result<Response, ChatError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;
        loop {
            let response = build(&self.client)
                .header(header::AUTHORIZATION, self.token.authorization())
                .send()
                .await
                .map_err(|e| {
                    warn!(error = %e, "Failed to reach Discord API");
                    if e.is_timeout() {
                        ChatError::network("request timed out")
                    } else {
                        ChatError::network(e.to_string())
                    }
                })?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let error = handle_error_response(status, response).await;
            if let ChatError::RateLimited { retry_after_ms } = error {
                let wait = Duration::from_millis(retry_after_ms);
                if attempt < MAX_RATE_LIMIT_RETRIES && wait <= MAX_RETRY_WAIT {
                    attempt += 1;
                    debug!(retry_after_ms, "Rate limited by Discord, retrying");
                    tokio::time::sleep(wait).await;
                    continue;
                }
            }
            return Err(error);
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChatError> {
        let url = self.url(path);
        let response = self.execute(|c| c.get(&url)).await?;
        parse_json(response).await
    }

    async fn post_message(
        &self,
        channel: ChannelId,
        body: &MessageBody<'_>,
    ) -> Result<MessageId, ChatError> {
        let url = self.url(&format!("/channels/{channel}/messages"));
        let response = self.execute(|c| c.post(&url).json(body)).await?;
        let message: MessageResponse = parse_json(response).await?;
        Ok(message.id)
    }

    async fn member_permissions_in(
        &self,
        channel: ChannelId,
        guild: GuildId,
        user: UserId,
    ) -> Result<Permissions, ChatError> {
        let channel_info: ChannelResponse = self.get_json(&format!("/channels/{channel}")).await?;
        let guild_info: GuildResponse = self.get_json(&format!("/guilds/{guild}")).await?;
        if guild_info.owner_id == user {
            return Ok(Permissions::all());
        }
        let member_info: MemberResponse = self
            .get_json(&format!("/guilds/{guild}/members/{user}"))
            .await?;

        let member = GuildMember {
            user_id: user,
            role_ids: member_info.role_ids(),
        };
        Ok(PermissionCalculator::compute_permissions(
            guild,
            &channel_info.permission_overwrites,
            &member,
            &guild_info.roles,
        ))
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ChatError> {
    response.json().await.map_err(|e| {
        warn!(error = %e, "Failed to parse Discord response");
        ChatError::unexpected(format!("failed to parse response: {e}"))
    })
}

async fn handle_error_response(status: StatusCode, response: Response) -> ChatError {
    let body = response.text().await.unwrap_or_default();
    map_error(status, &body)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn map_error(status: StatusCode, body: &str) -> ChatError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_ms = serde_json::from_str::<RateLimitResponse>(body)
            .map_or(5000, |r| (r.retry_after * 1000.0).ceil() as u64);
        return ChatError::RateLimited { retry_after_ms };
    }

    let message = serde_json::from_str::<ErrorResponse>(body).map_or_else(
        |_| format!("HTTP {status}"),
        |e| format!("{} (code {})", e.message, e.code),
    );

    match status {
        StatusCode::FORBIDDEN => ChatError::forbidden(message),
        StatusCode::NOT_FOUND => ChatError::not_found(message),
        StatusCode::PAYLOAD_TOO_LARGE => ChatError::PayloadTooLarge { size: 0 },
        s if s.is_server_error() => ChatError::network(message),
        _ => ChatError::unexpected(format!("unexpected response: {status} - {message}")),
    }
}

#[async_trait]
impl ChatPort for DiscordClient {
    async fn send_card(
        &self,
        channel: ChannelId,
        card: &RichCard,
    ) -> Result<MessageId, ChatError> {
        let body = MessageBody {
            embeds: Some([card]),
            ..MessageBody::default()
        };
        self.post_message(channel, &body).await
    }

    async fn edit_card(
        &self,
        channel: ChannelId,
        message: MessageId,
        card: &RichCard,
    ) -> Result<(), ChatError> {
        let url = self.url(&format!("/channels/{channel}/messages/{message}"));
        let body = MessageBody {
            embeds: Some([card]),
            ..MessageBody::default()
        };
        self.execute(|c| c.patch(&url).json(&body)).await?;
        Ok(())
    }

    async fn send_text(&self, channel: ChannelId, text: &str) -> Result<MessageId, ChatError> {
        let body = MessageBody {
            content: Some(text),
            ..MessageBody::default()
        };
        self.post_message(channel, &body).await
    }

    async fn reply_text(
        &self,
        channel: ChannelId,
        reply_to: MessageId,
        text: &str,
    ) -> Result<MessageId, ChatError> {
        let body = MessageBody {
            content: Some(text),
            message_reference: Some(MessageReferenceBody {
                message_id: reply_to,
                fail_if_not_exists: false,
            }),
            allowed_mentions: Some(AllowedMentions::none()),
            ..MessageBody::default()
        };
        self.post_message(channel, &body).await
    }

    async fn send_file(
        &self,
        channel: ChannelId,
        file: FileUpload,
        content: Option<&str>,
    ) -> Result<MessageId, ChatError> {
        let url = self.url(&format!("/channels/{channel}/messages"));
        let payload = serde_json::to_string(&MessageBody {
            content,
            attachments: Some(vec![AttachmentBody {
                id: 0,
                filename: file.filename(),
            }]),
            ..MessageBody::default()
        })
        .map_err(|e| ChatError::unexpected(e.to_string()))?;

        debug!(channel_id = %channel, filename = %file.filename(), size = file.len(), "Uploading file");

        let response = self
            .execute(|c| {
                let part = Part::stream(file.data().clone())
                    .file_name(file.filename().to_string())
                    .mime_str(file.content_type())
                    .unwrap_or_else(|_| Part::stream(file.data().clone()));
                let form = Form::new()
                    .text("payload_json", payload.clone())
                    .part("files[0]", part);
                c.post(&url).multipart(form)
            })
            .await
            .map_err(|e| match e {
                ChatError::PayloadTooLarge { .. } => ChatError::PayloadTooLarge { size: file.len() },
                other => other,
            })?;
        let message: MessageResponse = parse_json(response).await?;
        Ok(message.id)
    }

    async fn suppress_embeds(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> Result<(), ChatError> {
        let url = self.url(&format!("/channels/{channel}/messages/{message}"));
        let body = FlagsBody {
            flags: SUPPRESS_EMBEDS_FLAG,
        };
        self.execute(|c| c.patch(&url).json(&body)).await?;
        Ok(())
    }

    async fn channel_permissions(
        &self,
        channel: ChannelId,
        guild: GuildId,
    ) -> Result<Permissions, ChatError> {
        let me = self.current_user().await?;
        self.member_permissions_in(channel, guild, me.id()).await
    }

    async fn member_permissions(
        &self,
        channel: ChannelId,
        guild: GuildId,
        user: UserId,
    ) -> Result<Permissions, ChatError> {
        self.member_permissions_in(channel, guild, user).await
    }

    async fn current_user(&self) -> Result<BotUser, ChatError> {
        self.bot_user
            .get_or_try_init(|| async {
                let user: UserResponse = self.get_json("/users/@me").await?;
                debug!(user_id = %user.id, username = %user.username, "Resolved bot user");
                Ok::<_, ChatError>(BotUser::new(user.id, user.username))
            })
            .await
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> BotToken {
        BotToken::new_unchecked("MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.XXXXXX.YYYYYYYYYYYYYYYYYYYYYYYYYYYY")
    }

    #[test]
    fn test_client_creation() {
        let client = DiscordClient::new(token(), Duration::from_secs(15));
        assert!(client.is_ok());
    }

    #[test]
    fn test_rate_limit_body_is_parsed() {
        let error = map_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"message":"You are being rate limited.","retry_after":0.42,"global":false}"#,
        );
        assert!(matches!(error, ChatError::RateLimited { retry_after_ms: 420 }));
    }

    #[test]
    fn test_missing_permission_maps_to_forbidden() {
        let error = map_error(
            StatusCode::FORBIDDEN,
            r#"{"message":"Missing Permissions","code":50013}"#,
        );
        let ChatError::Forbidden { message } = error else {
            panic!("expected forbidden");
        };
        assert!(message.contains("50013"));
    }

    #[test]
    fn test_other_statuses() {
        assert!(matches!(
            map_error(StatusCode::NOT_FOUND, "{}"),
            ChatError::NotFound { .. }
        ));
        assert!(matches!(
            map_error(StatusCode::PAYLOAD_TOO_LARGE, ""),
            ChatError::PayloadTooLarge { .. }
        ));
        assert!(map_error(StatusCode::BAD_GATEWAY, "").is_recoverable());
        assert!(matches!(
            map_error(StatusCode::BAD_REQUEST, "not json"),
            ChatError::Unexpected { .. }
        ));
    }
}
