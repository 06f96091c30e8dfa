use crate::domain::entities::{BotUser, GuildId, InboundMessage};

/// Commands the bot runner can push into a live gateway connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCommand {
    /// Re-announce the "Listening to ..." activity.
    RefreshPresence,
}

#[derive(Debug, Clone)]
pub enum GatewayEventKind {
    Connected {
        session_id: String,
        resume_url: Option<String>,
    },
    Disconnected {
        reason: String,
        can_resume: bool,
    },
    Reconnecting {
        attempt: u32,
    },
    Resumed,
    Dispatch(DispatchEvent),
    Error {
        message: String,
        recoverable: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    Ready {
        session_id: String,
        resume_gateway_url: Option<String>,
        user: BotUser,
        guilds: Vec<UnavailableGuild>,
    },
    MessageCreate {
        message: InboundMessage,
    },
    GuildCreate {
        guild_id: GuildId,
        unavailable: bool,
    },
    GuildDelete {
        guild_id: GuildId,
        unavailable: bool,
    },
    Unknown {
        event_type: String,
    },
}

impl DispatchEvent {
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "READY",
            Self::MessageCreate { .. } => "MESSAGE_CREATE",
            Self::GuildCreate { .. } => "GUILD_CREATE",
            Self::GuildDelete { .. } => "GUILD_DELETE",
            Self::Unknown { .. } => "UNKNOWN",
        }
    }

    #[must_use]
    pub const fn guild_id(&self) -> Option<GuildId> {
        match self {
            Self::MessageCreate { message } => message.guild_id(),
            Self::GuildCreate { guild_id, .. } | Self::GuildDelete { guild_id, .. } => {
                Some(*guild_id)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnavailableGuild {
    pub id: GuildId,
    pub unavailable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guild_events_carry_guild_id() {
        let event = DispatchEvent::GuildDelete {
            guild_id: GuildId(7),
            unavailable: false,
        };
        assert_eq!(event.guild_id(), Some(GuildId(7)));
        assert_eq!(event.event_name(), "GUILD_DELETE");

        let unknown = DispatchEvent::Unknown {
            event_type: "TYPING_START".into(),
        };
        assert_eq!(unknown.guild_id(), None);
    }
}
