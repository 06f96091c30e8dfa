//! Discord channel and guild identifiers.

use serde::{Deserialize, Serialize};

/// Unique identifier for a Discord channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(#[serde(with = "crate::domain::serde_utils::string_to_u64")] pub u64);

impl ChannelId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChannelId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<&str> for ChannelId {
    fn from(value: &str) -> Self {
        Self(value.parse().unwrap_or(0))
    }
}

/// Unique identifier for a Discord guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(#[serde(with = "crate::domain::serde_utils::string_to_u64")] pub u64);

impl GuildId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GuildId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<&str> for GuildId {
    fn from(value: &str) -> Self {
        Self(value.parse().unwrap_or(0))
    }
}

/// Key under which per-destination settings are stored.
///
/// Settings follow the guild, so every channel of a server shares one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestinationId(u64);

impl DestinationId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Parses a destination from its stored string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        value.parse().ok().map(Self)
    }
}

impl From<GuildId> for DestinationId {
    fn from(value: GuildId) -> Self {
        Self(value.0)
    }
}

impl std::fmt::Display for DestinationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_from_str() {
        assert_eq!(ChannelId::from("42").as_u64(), 42);
        assert_eq!(GuildId::from("not-a-number").as_u64(), 0);
    }

    #[test]
    fn test_destination_round_trips_through_string() {
        let destination = DestinationId::from(GuildId(987_654_321));
        let parsed = DestinationId::parse(&destination.to_string());
        assert_eq!(parsed, Some(destination));
        assert_eq!(DestinationId::parse("abc"), None);
    }

    #[test]
    fn test_channel_id_deserializes_from_string() {
        let id: ChannelId = serde_json::from_str(r#""111""#).unwrap();
        assert_eq!(id, ChannelId(111));
    }
}
