use serde::{Deserialize, Serialize};

use crate::domain::entities::{MessageId, PermissionOverwrite, RichCard, Role, UserId};

/// Message create/edit body.
#[derive(Debug, Default, Serialize)]
pub struct MessageBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<[&'a RichCard; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReferenceBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<AttachmentBody<'a>>>,
}

#[derive(Debug, Serialize)]
pub struct MessageReferenceBody {
    pub message_id: MessageId,
    pub fail_if_not_exists: bool,
}

/// Replies never ping the author.
#[derive(Debug, Serialize)]
pub struct AllowedMentions {
    pub parse: [&'static str; 0],
    pub replied_user: bool,
}

impl AllowedMentions {
    pub const fn none() -> Self {
        Self {
            parse: [],
            replied_user: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttachmentBody<'a> {
    pub id: u8,
    pub filename: &'a str,
}

/// Flags-only edit used to hide link previews.
#[derive(Debug, Serialize)]
pub struct FlagsBody {
    pub flags: u64,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: MessageId,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ChannelResponse {
    #[serde(default)]
    pub permission_overwrites: Vec<PermissionOverwrite>,
}

#[derive(Debug, Deserialize)]
pub struct GuildResponse {
    pub owner_id: UserId,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    #[serde(default)]
    pub roles: Vec<String>,
}

impl MemberResponse {
    pub fn role_ids(&self) -> Vec<u64> {
        self.roles.iter().filter_map(|r| r.parse().ok()).collect()
    }
}

/// Discord API error response structure.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub code: u64,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitResponse {
    pub retry_after: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_body_shape() {
        let body = MessageBody {
            content: Some("Invalid Reddit url."),
            message_reference: Some(MessageReferenceBody {
                message_id: MessageId(5),
                fail_if_not_exists: false,
            }),
            allowed_mentions: Some(AllowedMentions::none()),
            ..MessageBody::default()
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["content"], "Invalid Reddit url.");
        assert_eq!(json["message_reference"]["message_id"], "5");
        assert_eq!(json["allowed_mentions"]["replied_user"], false);
        assert!(json.get("embeds").is_none());
    }

    #[test]
    fn test_card_body_wraps_single_embed() {
        let card = RichCard::new().with_title("t");
        let body = MessageBody {
            embeds: Some([&card]),
            ..MessageBody::default()
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["embeds"][0]["title"], "t");
    }

    #[test]
    fn test_member_role_ids() {
        let member: MemberResponse =
            serde_json::from_str(r#"{"roles":["10","x","20"],"nick":null}"#).unwrap();
        assert_eq!(member.role_ids(), vec![10, 20]);
    }

    #[test]
    fn test_guild_response_parses_roles() {
        let guild: GuildResponse = serde_json::from_str(
            r#"{"id":"1","owner_id":"9","roles":[{"id":"1","permissions":"2048","name":"@everyone"}]}"#,
        )
        .unwrap();
        assert_eq!(guild.owner_id, UserId(9));
        assert_eq!(guild.roles.len(), 1);
    }
}
