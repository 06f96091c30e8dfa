use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants::{
    ACTIVITY_LISTENING, CLIENT_PROPERTIES_BROWSER, CLIENT_PROPERTIES_DEVICE, CLIENT_PROPERTIES_OS,
    GatewayOpcode, LARGE_THRESHOLD,
};
use crate::domain::entities::{ChannelId, GuildId, MessageId, UserId};

#[derive(Debug, Serialize, Deserialize)]
pub struct GatewayPayload {
    pub op: u8,
    pub d: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayPayload {
    fn new(op: GatewayOpcode, d: Value) -> Self {
        Self {
            op: op.as_u8(),
            d,
            s: None,
            t: None,
        }
    }

    #[must_use]
    pub fn heartbeat(sequence: Option<u64>) -> Self {
        Self::new(
            GatewayOpcode::Heartbeat,
            sequence.map_or(Value::Null, |s| Value::Number(s.into())),
        )
    }

    #[must_use]
    pub fn identify(token: &str, intents: u32, presence: &PresenceData) -> Self {
        let identify = IdentifyData {
            token,
            properties: IdentifyProperties {
                os: CLIENT_PROPERTIES_OS,
                browser: CLIENT_PROPERTIES_BROWSER,
                device: CLIENT_PROPERTIES_DEVICE,
            },
            compress: false,
            large_threshold: LARGE_THRESHOLD,
            intents,
            presence,
        };

        Self::new(
            GatewayOpcode::Identify,
            serde_json::to_value(identify).unwrap_or(Value::Null),
        )
    }

    #[must_use]
    pub fn resume(token: &str, session_id: &str, sequence: u64) -> Self {
        let resume = ResumeData {
            token,
            session_id,
            seq: sequence,
        };

        Self::new(
            GatewayOpcode::Resume,
            serde_json::to_value(resume).unwrap_or(Value::Null),
        )
    }

    #[must_use]
    pub fn presence_update(presence: &PresenceData) -> Self {
        Self::new(
            GatewayOpcode::PresenceUpdate,
            serde_json::to_value(presence).unwrap_or(Value::Null),
        )
    }
}

/// Presence announced on identify, e.g. "Listening to r/ help".
#[derive(Debug, Clone, Serialize)]
pub struct PresenceData {
    pub since: Option<u64>,
    pub activities: Vec<ActivityData>,
    pub status: &'static str,
    pub afk: bool,
}

impl PresenceData {
    #[must_use]
    pub fn listening(name: impl Into<String>) -> Self {
        Self {
            since: None,
            activities: vec![ActivityData {
                name: name.into(),
                kind: ACTIVITY_LISTENING,
            }],
            status: "online",
            afk: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityData {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
}

#[derive(Debug, Serialize)]
struct IdentifyData<'a> {
    token: &'a str,
    properties: IdentifyProperties,
    compress: bool,
    large_threshold: u16,
    intents: u32,
    presence: &'a PresenceData,
}

#[derive(Debug, Serialize)]
struct IdentifyProperties {
    os: &'static str,
    browser: &'static str,
    device: &'static str,
}

#[derive(Debug, Serialize)]
struct ResumeData<'a> {
    token: &'a str,
    session_id: &'a str,
    seq: u64,
}

#[derive(Debug, Deserialize)]
pub struct GatewayMessage {
    pub op: u8,
    pub d: Option<Value>,
    pub s: Option<u64>,
    pub t: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HelloPayload {
    pub heartbeat_interval: u64,
}

#[derive(Debug, Deserialize)]
pub struct ReadyPayload {
    pub session_id: String,
    pub resume_gateway_url: Option<String>,
    pub user: ReadyUser,
    #[serde(default)]
    pub guilds: Vec<GuildStubPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ReadyUser {
    pub id: UserId,
    pub username: String,
}

/// Shape shared by READY guild stubs, `GUILD_CREATE` and `GUILD_DELETE`.
#[derive(Debug, Deserialize)]
pub struct GuildStubPayload {
    pub id: GuildId,
    #[serde(default)]
    pub unavailable: bool,
}

#[derive(Debug, Deserialize)]
pub struct MessagePayload {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub author: AuthorPayload,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthorPayload {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heartbeat_payload() {
        let payload = GatewayPayload::heartbeat(Some(42));
        assert_eq!(payload.op, 1);
        assert_eq!(payload.d, Value::Number(42.into()));
        assert_eq!(GatewayPayload::heartbeat(None).d, Value::Null);
    }

    #[test]
    fn test_identify_carries_presence() {
        let presence = PresenceData::listening("r/ help");
        let payload = GatewayPayload::identify("test_token", 33281, &presence);
        assert_eq!(payload.op, 2);

        let obj = payload.d.as_object().unwrap();
        assert_eq!(obj["token"], "test_token");
        assert_eq!(obj["intents"], 33281);
        assert_eq!(obj["presence"]["activities"][0]["name"], "r/ help");
        assert_eq!(obj["presence"]["activities"][0]["type"], 2);
        assert_eq!(obj["presence"]["status"], "online");
    }

    #[test]
    fn test_resume_payload() {
        let payload = GatewayPayload::resume("token", "session123", 100);
        assert_eq!(payload.op, 6);

        let obj = payload.d.as_object().unwrap();
        assert_eq!(obj["session_id"], "session123");
        assert_eq!(obj["seq"], 100);
    }

    #[test]
    fn test_message_payload_without_guild() {
        let payload: MessagePayload = serde_json::from_value(serde_json::json!({
            "id": "1",
            "channel_id": "2",
            "author": {"id": "3", "username": "someone"},
            "content": "hi"
        }))
        .unwrap();
        assert!(payload.guild_id.is_none());
        assert!(!payload.author.bot);
    }
}
