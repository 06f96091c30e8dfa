//! Prefix commands users can send.

/// A parsed prefix command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Show the help card.
    Help,
    /// Show the current settings.
    ShowSettings,
    /// Turn the summary card on or off.
    SetSendSummary(bool),
    /// Turn the comment section on or off.
    SetIncludeComments(bool),
    /// Turn preview suppression on or off.
    SetSuppressPreview(bool),
    /// Anything else.
    Unknown(String),
}

impl BotCommand {
    /// Parses the text after the prefix.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let raw = input.trim().to_lowercase();
        let mut words = raw.split_whitespace();
        let name = words.next().unwrap_or_default();
        let toggle = words.next().and_then(parse_toggle);
        let trailing = words.next().is_some();

        match (name, toggle, trailing) {
            ("" | "help" | "h" | "?", None, false) => Self::Help,
            ("settings", None, false) => Self::ShowSettings,
            ("posts", Some(on), false) => Self::SetSendSummary(on),
            ("comments", Some(on), false) => Self::SetIncludeComments(on),
            ("clean", Some(on), false) => Self::SetSuppressPreview(on),
            _ => Self::Unknown(raw),
        }
    }

    /// Returns whether the command changes server settings.
    #[must_use]
    pub const fn is_settings_change(&self) -> bool {
        matches!(
            self,
            Self::SetSendSummary(_) | Self::SetIncludeComments(_) | Self::SetSuppressPreview(_)
        )
    }
}

fn parse_toggle(word: &str) -> Option<bool> {
    match word {
        "on" | "true" | "yes" | "enable" => Some(true),
        "off" | "false" | "no" | "disable" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", BotCommand::Help)]
    #[test_case(" help ", BotCommand::Help)]
    #[test_case("H", BotCommand::Help)]
    #[test_case("?", BotCommand::Help)]
    #[test_case("settings", BotCommand::ShowSettings)]
    #[test_case("posts off", BotCommand::SetSendSummary(false))]
    #[test_case("comments ON", BotCommand::SetIncludeComments(true))]
    #[test_case("clean disable", BotCommand::SetSuppressPreview(false))]
    #[test_case("posts maybe", BotCommand::Unknown("posts maybe".into()))]
    #[test_case("help me please", BotCommand::Unknown("help me please".into()))]
    fn test_parse(input: &str, expected: BotCommand) {
        assert_eq!(BotCommand::parse(input), expected);
    }
}
