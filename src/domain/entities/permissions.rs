//! Discord permission bits and the records they are computed from.

use serde::{Deserialize, Deserializer};

use super::UserId;

bitflags::bitflags! {
    /// Discord permission bitfield (subset the bot cares about).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Permissions: u64 {
        const MANAGE_GUILD = 1 << 5;
        const ADD_REACTIONS = 1 << 6;
        const VIEW_CHANNEL = 1 << 10;
        const SEND_MESSAGES = 1 << 11;
        const MANAGE_MESSAGES = 1 << 13;
        const EMBED_LINKS = 1 << 14;
        const ATTACH_FILES = 1 << 15;
        const READ_MESSAGE_HISTORY = 1 << 16;
        const ADMINISTRATOR = 1 << 3;

        const _ = !0;
    }
}

impl Permissions {
    /// Permissions the bot needs to work fully in a channel.
    #[must_use]
    pub const fn required() -> Self {
        Self::ATTACH_FILES
            .union(Self::EMBED_LINKS)
            .union(Self::SEND_MESSAGES)
            .union(Self::ADD_REACTIONS)
            .union(Self::MANAGE_MESSAGES)
    }

    /// Returns true if every required permission is present.
    #[must_use]
    pub const fn has_required(self) -> bool {
        self.contains(Self::required())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = crate::domain::serde_utils::permission_bits(deserializer)?;
        Ok(Self::from_bits_retain(bits))
    }
}

/// A guild role and the permissions it grants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[allow(missing_docs)]
pub struct Role {
    #[serde(with = "crate::domain::serde_utils::string_to_u64")]
    pub id: u64,
    pub permissions: Permissions,
}

/// Channel-level allow/deny override for a role or member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[allow(missing_docs)]
pub struct PermissionOverwrite {
    #[serde(with = "crate::domain::serde_utils::string_to_u64")]
    pub id: u64,
    pub allow: Permissions,
    pub deny: Permissions,
}

/// The bot's membership in a guild, reduced to what permission checks need.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct GuildMember {
    pub user_id: UserId,
    pub role_ids: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string_bits() {
        let role: Role = serde_json::from_str(r#"{"id":"1","permissions":"8192"}"#).unwrap();
        assert!(role.permissions.contains(Permissions::MANAGE_MESSAGES));
    }

    #[test]
    fn test_required_set() {
        assert!(!Permissions::SEND_MESSAGES.has_required());
        assert!(Permissions::all().has_required());
    }
}
