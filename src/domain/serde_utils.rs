//! Serde helpers shared by the Discord and Reddit payloads.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;

/// Snowflake IDs that might arrive as strings or numbers.
pub mod string_to_u64 {
    use super::{Deserializer, Serializer, Visitor, de, fmt};

    /// Serializes a u64 as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    /// Deserializes a u64 from a string or number.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a string or integer, or if parsing fails.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrIntVisitor;

        impl Visitor<'_> for StringOrIntVisitor {
            type Value = u64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing a snowflake ID")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value)
            }

            #[allow(clippy::cast_sign_loss)]
            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value as u64)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value.parse::<u64>().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(StringOrIntVisitor)
    }
}

/// Reddit sends `""` where other APIs would send `null` (colors, icons, empty reply lists).
pub mod empty_string_as_none {
    use super::{Deserialize, Deserializer};

    /// Deserializes an optional string, mapping `""` and `null` to `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a string nor null.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.trim().is_empty()))
    }
}

/// Deserializes a Discord permission bitfield, which arrives as a decimal string.
///
/// # Errors
///
/// Returns an error if the string is not a valid integer.
pub fn permission_bits<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    string_to_u64::deserialize(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Snowflake {
        #[serde(with = "string_to_u64")]
        id: u64,
    }

    #[derive(Deserialize)]
    struct Colored {
        #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
        color: Option<String>,
    }

    #[test]
    fn test_snowflake_from_string_and_number() {
        let a: Snowflake = serde_json::from_str(r#"{"id":"1234"}"#).unwrap();
        let b: Snowflake = serde_json::from_str(r#"{"id":1234}"#).unwrap();
        assert_eq!(a.id, 1234);
        assert_eq!(b.id, 1234);
    }

    #[test]
    fn test_empty_string_is_none() {
        let empty: Colored = serde_json::from_str(r#"{"color":""}"#).unwrap();
        let null: Colored = serde_json::from_str(r#"{"color":null}"#).unwrap();
        let missing: Colored = serde_json::from_str("{}").unwrap();
        let set: Colored = serde_json::from_str(r##"{"color":"#ff4500"}"##).unwrap();

        assert_eq!(empty.color, None);
        assert_eq!(null.color, None);
        assert_eq!(missing.color, None);
        assert_eq!(set.color.as_deref(), Some("#ff4500"));
    }
}
