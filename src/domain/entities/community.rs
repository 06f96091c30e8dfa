//! Subreddit and author presentation metadata.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Color used when a subreddit exists but defines no colors.
pub const UNSET_COMMUNITY_COLOR: u32 = 0x11_ff_11;

/// Colors Reddit picks from for default avatars.
const DEFAULT_AVATAR_COLORS: [&str; 25] = [
    "A5A4A4", "545452", "A06A42", "C18D42", "FF4500", "FF8717", "FFB000", "FFD635", "DDBD37",
    "D4E815", "94E044", "46A508", "46D160", "0DD3BB", "25B79F", "008985", "24A0ED", "0079D3",
    "7193FF", "4856A3", "7E53C1", "FF66AC", "DB0064", "EA0027", "FF585B",
];

const DEFAULT_AVATAR_TEXTURES: u8 = 20;

/// Accent color of a subreddit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentColor {
    /// The subreddit's primary color.
    Primary(u32),
    /// The subreddit's key color, used when no primary color is set.
    Secondary(u32),
    /// Neither color is set.
    Default,
}

impl AccentColor {
    /// Picks the first color that is set and parses.
    #[must_use]
    pub fn from_hex_pair(primary: Option<&str>, secondary: Option<&str>) -> Self {
        if let Some(color) = primary.and_then(parse_hex_color) {
            Self::Primary(color)
        } else if let Some(color) = secondary.and_then(parse_hex_color) {
            Self::Secondary(color)
        } else {
            Self::Default
        }
    }

    /// RGB value to paint with.
    #[must_use]
    pub const fn rgb(self) -> u32 {
        match self {
            Self::Primary(color) | Self::Secondary(color) => color,
            Self::Default => UNSET_COMMUNITY_COLOR,
        }
    }
}

/// Subreddit metadata used to decorate a summary card.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct CommunityInfo {
    pub name: String,
    pub color: AccentColor,
    pub icon_url: Option<String>,
}

/// Reddit account metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct RedditUser {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Returns one of Reddit's stock avatars, chosen at random on every call.
#[must_use]
pub fn random_default_avatar() -> String {
    let mut rng = rand::rng();
    let texture = rng.random_range(1..=DEFAULT_AVATAR_TEXTURES);
    let color = DEFAULT_AVATAR_COLORS
        .choose(&mut rng)
        .copied()
        .unwrap_or(DEFAULT_AVATAR_COLORS[0]);
    format!("https://www.redditstatic.com/avatars/avatar_default_{texture:02}_{color}.png")
}

fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_accent_color_precedence() {
        assert_eq!(
            AccentColor::from_hex_pair(Some("#FF4500"), Some("#000000")),
            AccentColor::Primary(0xFF_45_00)
        );
        assert_eq!(
            AccentColor::from_hex_pair(None, Some("#0079d3")),
            AccentColor::Secondary(0x00_79_d3)
        );
        assert_eq!(
            AccentColor::from_hex_pair(Some("garbage"), None),
            AccentColor::Default
        );
        assert_eq!(AccentColor::Default.rgb(), UNSET_COMMUNITY_COLOR);
    }

    #[test]
    fn test_random_default_avatar_shape() {
        let re = Regex::new(
            r"^https://www\.redditstatic\.com/avatars/avatar_default_(\d{2})_([0-9A-F]{6})\.png$",
        )
        .unwrap();

        for _ in 0..200 {
            let url = random_default_avatar();
            let caps = re.captures(&url).expect("unexpected avatar url");
            let texture: u8 = caps[1].parse().unwrap();
            assert!((1..=20).contains(&texture));
            assert!(DEFAULT_AVATAR_COLORS.contains(&&caps[2]));
        }
    }
}
